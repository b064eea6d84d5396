use egui::color_picker::{self, Alpha};
use egui::{Button, DragValue, Slider};

use crate::SketchApp;
use crate::components::tool_button::ToolButton;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::settings::{EraseMode, Settings};
use crate::tools::{MAX_WIDTH, MIN_WIDTH, Tool};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            ui.horizontal_wrapped(|ui| {
                let active = app.session.tools().tool();
                for tool in Tool::ALL {
                    if ToolButton::new(tool, tool == active).show(ui).clicked() {
                        app.interrupt_gesture();
                        app.session.select_tool(tool);
                    }
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = app.session.tools().color();
                if color_picker::color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                    app.session.set_color(color);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Width:");
                let mut width = app.session.tools().width();
                if ui.add(Slider::new(&mut width, MIN_WIDTH..=MAX_WIDTH)).changed() {
                    app.session.set_width(width);
                }
            });

            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.session.history().can_undo();
                let can_redo = app.session.history().can_redo();

                if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
                    app.interrupt_gesture();
                    app.session.undo();
                }
                if ui.add_enabled(can_redo, Button::new("Redo")).clicked() {
                    app.interrupt_gesture();
                    app.session.redo();
                }
            });

            let history = app.session.history();
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_len()));
                ui.label(format!("Redo stack size: {}", history.redo_len()));
            });

            ui.separator();

            ui.horizontal_wrapped(|ui| {
                if ui.button("New canvas").clicked() {
                    app.interrupt_gesture();
                    app.session.new_canvas();
                }
                if ui.button("Open image…").clicked() {
                    app.files.open_image_dialog(ctx);
                }
                if ui.button("Save PNG").clicked() {
                    app.save_png();
                }
            });

            ui.separator();
            settings_section(ui, app.session.settings_mut());
        });
}

fn settings_section(ui: &mut egui::Ui, settings: &mut Settings) {
    ui.collapsing("Settings", |ui| {
        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([40.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Canvas width");
                ui.add(DragValue::new(&mut settings.canvas_width).range(1..=8192));
                ui.end_row();

                ui.label("Canvas height");
                ui.add(DragValue::new(&mut settings.canvas_height).range(1..=8192));
                ui.end_row();

                ui.label("History limit");
                let mut bounded = settings.history_limit.is_some();
                let mut limit = settings.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
                ui.horizontal(|ui| {
                    ui.checkbox(&mut bounded, "");
                    ui.add_enabled(bounded, DragValue::new(&mut limit).range(1..=500));
                });
                settings.history_limit = bounded.then_some(limit);
                ui.end_row();

                ui.label("Eraser");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut settings.erase_mode, EraseMode::Cutout, "Cut out");
                    ui.radio_value(&mut settings.erase_mode, EraseMode::Background, "Background");
                });
                ui.end_row();

                ui.label("Background");
                color_picker::color_edit_button_srgba(ui, &mut settings.background, Alpha::Opaque);
                ui.end_row();

                ui.label("Start color");
                color_picker::color_edit_button_srgba(ui, &mut settings.default_color, Alpha::Opaque);
                ui.end_row();

                ui.label("Start width");
                ui.add(Slider::new(&mut settings.default_width, MIN_WIDTH..=MAX_WIDTH));
                ui.end_row();
            });
        ui.small("Canvas size and history limit apply to the next new canvas.");
    });
}
