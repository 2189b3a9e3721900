use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_gray(24)))
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            app.sync_viewport(canvas_rect, ctx.pixels_per_point());
            let response = ui.interact(canvas_rect, ui.id().with("canvas"), egui::Sense::click_and_drag());

            // Keyboard shortcuts and pointer events for the active tool
            app.handle_input(ctx, response.hovered());

            let painter = ui.painter_at(canvas_rect);
            app.paint_canvas(ctx, &painter, canvas_rect);
        });
}
