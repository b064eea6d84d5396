use crate::SketchApp;
use crate::panels::TextPrompt;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both()
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let [width, height] = app.session.surface().size();
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(width as f32, height as f32),
                    egui::Sense::click_and_drag(),
                );
                app.input.set_canvas_rect(response.rect);

                // The text prompt is modal: the canvas ignores new presses while it is open
                let hovered = response.hovered() && app.text_prompt.is_none();
                for event in app.input.process_input(ctx, hovered) {
                    if let Some(request) = app.session.handle(event) {
                        app.text_prompt = Some(TextPrompt::new(request.at));
                    }
                }

                if let Some(renderer) = &mut app.renderer {
                    renderer.render(&painter, &app.input, &app.session);
                }
            });
    });
}
