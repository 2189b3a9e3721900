use crate::SketchApp;

/// Floating editor shown while the text tool waits for input.
pub fn text_entry_window(app: &mut SketchApp, ctx: &egui::Context) {
    let mut submit = false;
    let mut cancel = false;
    let Some(entry) = app.text_entry_mut() else {
        return;
    };

    egui::Window::new("Text")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let response = ui.text_edit_multiline(&mut entry.text);
            response.request_focus();
            ui.horizontal(|ui| {
                ui.label("Size");
                ui.add(egui::DragValue::new(&mut entry.font_size).range(6.0..=200.0));
                ui.label("Font");
                ui.text_edit_singleline(&mut entry.font_family);
            });
            ui.horizontal(|ui| {
                submit = ui.button("Place").clicked()
                    || ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);
                cancel = ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape));
            });
        });

    if submit {
        app.submit_text();
    } else if cancel {
        app.cancel_text();
    }
}
