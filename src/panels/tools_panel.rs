use crate::SketchApp;
use crate::color::{Color, PALETTE};
use crate::config::{MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};
use crate::surface::background::PRESETS;
use crate::tools::{Tool, ToolId};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.session().tool_id();
            for tool in ToolId::ALL {
                let text = format!("{} ({})", tool.label(), tool.hotkey());
                if ui.selectable_label(active == tool, text).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    app.session_mut().set_tool(tool);
                }
            }
            ui.separator();

            ui.heading("Color");
            ui.horizontal_wrapped(|ui| {
                for hex in PALETTE {
                    let Some(swatch) = Color::parse_hex(hex) else {
                        continue;
                    };
                    let selected = app.session().color() == swatch;
                    let button = egui::Button::new("")
                        .fill(swatch.to_color32())
                        .min_size(egui::vec2(18.0, 18.0))
                        .selected(selected);
                    if ui.add(button).on_hover_text(hex).clicked() {
                        app.session_mut().set_color(hex);
                    }
                }
            });
            let current = app.session().color();
            let mut rgb = [current.r, current.g, current.b];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                app.session_mut().set_color(&Color::rgb(rgb[0], rgb[1], rgb[2]).to_hex());
            }
            ui.separator();

            let mut width = app.session().brush_width();
            if ui
                .add(egui::Slider::new(&mut width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).text("Width"))
                .changed()
            {
                app.session_mut().set_brush_width(width);
            }
            let mut filled = app.session().fill_mode();
            if ui.checkbox(&mut filled, "Fill shapes").changed() {
                app.session_mut().set_fill_mode(filled);
            }

            let mut background = app.session().background_id().to_owned();
            egui::ComboBox::from_label("Background")
                .selected_text(background.clone())
                .show_ui(ui, |ui| {
                    for id in PRESETS {
                        ui.selectable_value(&mut background, (*id).to_owned(), *id);
                    }
                });
            if background != app.session().background_id() {
                app.session_mut().set_background(&background);
            }
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.session().can_undo();
                let can_redo = app.session().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    app.clear();
                }
                if ui.button("Save").clicked() {
                    app.save_image();
                }
            });

            ui.separator();
            let history = app.session().history();
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_len()));
                ui.label(format!("Redo stack size: {}", history.redo_len()));
            });
            ui.label(format!("State: {}", app.session().tool().current_state_name()));
            if let Some(status) = app.status() {
                ui.label(status);
            }
        });
}
