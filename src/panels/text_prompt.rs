use egui::{Align2, Key, Pos2};

use crate::SketchApp;

/// Text entry opened after a text-tool click
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub at: Pos2,
    pub text: String,
}

impl TextPrompt {
    pub fn new(at: Pos2) -> Self {
        Self {
            at,
            text: String::new(),
        }
    }
}

pub fn text_prompt(app: &mut SketchApp, ctx: &egui::Context) {
    let Some(prompt) = &mut app.text_prompt else {
        return;
    };

    let mut submit = false;
    let mut cancel = false;
    egui::Window::new("Enter text")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let response = ui.text_edit_singleline(&mut prompt.text);
            if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                submit = true;
            } else {
                response.request_focus();
            }
            if ui.input(|i| i.key_pressed(Key::Escape)) {
                cancel = true;
            }
            ui.horizontal(|ui| {
                submit |= ui.button("OK").clicked();
                cancel |= ui.button("Cancel").clicked();
            });
        });

    if submit {
        if let Some(prompt) = app.text_prompt.take() {
            app.session.place_text(prompt.at, &prompt.text);
        }
    } else if cancel {
        log::debug!("Text entry cancelled");
        app.text_prompt = None;
    }
}
