use egui::{Key, KeyboardShortcut, Modifiers};

use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels::{self, TextPrompt};
use crate::renderer::Renderer;
use crate::session::Session;
use crate::settings::Settings;

const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO_SHORTCUT: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const REDO_ALT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
/// Only the settings survive a restart; the drawing itself does not.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchApp {
    settings: Settings,
    #[serde(skip)]
    pub(crate) session: Session,
    // Skip serializing the renderer since it contains GPU resources
    #[serde(skip)]
    pub(crate) renderer: Option<Renderer>,
    #[serde(skip)]
    pub(crate) input: InputHandler,
    #[serde(skip)]
    pub(crate) files: FileHandler,
    #[serde(skip)]
    pub(crate) text_prompt: Option<TextPrompt>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: Settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .map(|app: SketchApp| app.settings)
            .unwrap_or_default();
        log::info!(
            "Starting with a {}x{} canvas",
            settings.canvas_width,
            settings.canvas_height
        );

        let mut app = Self::with_settings(settings);
        app.renderer = Some(Renderer::new(cc));
        app
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            session: Session::new(settings.clone()),
            settings,
            renderer: None,
            input: InputHandler::default(),
            files: FileHandler::new(),
            text_prompt: None,
        }
    }

    /// Encodes the canvas and offers it for download
    pub(crate) fn save_png(&self) {
        match self.session.export_png() {
            Ok(bytes) => self.files.save_png_dialog(bytes),
            Err(err) => log::error!("Export failed: {}", err),
        }
    }

    /// Applies images delivered by the open dialog or dropped onto the window
    fn import_pending_files(&mut self, ctx: &egui::Context) {
        let mut files = self.files.take_loaded();
        files.extend(self.files.take_dropped_files(ctx));
        for file in files {
            if let Err(err) = self.session.import_image(&file.bytes) {
                log::error!("Failed to import {}: {}", file.name, err);
            }
        }
    }

    /// Ends a drag that is still held when a button or shortcut acts on the session
    pub(crate) fn interrupt_gesture(&mut self) {
        if let Some(event) = self.input.cancel() {
            self.session.handle(event);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Redo first: Cmd+Z also matches Cmd+Shift+Z logically
        let (undo, redo) = ctx.input_mut(|i| {
            let redo = i.consume_shortcut(&REDO_SHORTCUT) || i.consume_shortcut(&REDO_ALT_SHORTCUT);
            let undo = i.consume_shortcut(&UNDO_SHORTCUT);
            (undo, redo)
        });
        if redo {
            self.interrupt_gesture();
            self.session.redo();
        } else if undo {
            self.interrupt_gesture();
            self.session.undo();
        }
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings = self.session.settings().clone();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.import_pending_files(ctx);

        if self.text_prompt.is_none() {
            self.handle_shortcuts(ctx);
        }

        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::text_prompt(self, ctx);

        self.files.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use egui::{Event, RawInput, pos2};

    fn press(app: &mut SketchApp, ctx: &egui::Context, key: Key, modifiers: Modifiers) {
        let input = RawInput {
            events: vec![Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers,
            }],
            modifiers,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| app.handle_shortcuts(ctx));
    }

    // One dab, so there is exactly one state to undo
    fn app_with_one_edit() -> SketchApp {
        let mut app = SketchApp::with_settings(Settings {
            canvas_width: 32,
            canvas_height: 32,
            ..Settings::default()
        });
        app.session.handle(InputEvent::PointerDown(pos2(8.0, 8.0)));
        app.session.handle(InputEvent::PointerUp(pos2(8.0, 8.0)));
        app
    }

    #[test]
    fn test_command_z_undoes() {
        let ctx = egui::Context::default();
        let mut app = app_with_one_edit();

        press(&mut app, &ctx, Key::Z, Modifiers::COMMAND);
        assert!(app.session.surface().is_blank());
        assert_eq!(app.session.history().undo_len(), 0);
        assert_eq!(app.session.history().redo_len(), 1);
    }

    #[test]
    fn test_command_shift_z_redoes_without_undoing() {
        let ctx = egui::Context::default();
        let mut app = app_with_one_edit();
        app.session.undo();

        press(&mut app, &ctx, Key::Z, Modifiers::COMMAND | Modifiers::SHIFT);
        assert!(!app.session.surface().is_blank());
        assert_eq!(app.session.history().undo_len(), 1);
        assert_eq!(app.session.history().redo_len(), 0);
    }

    #[test]
    fn test_command_y_redoes() {
        let ctx = egui::Context::default();
        let mut app = app_with_one_edit();
        app.session.undo();

        press(&mut app, &ctx, Key::Y, Modifiers::COMMAND);
        assert!(!app.session.surface().is_blank());
        assert_eq!(app.session.history().redo_len(), 0);
    }

    #[test]
    fn test_undo_shortcut_ends_held_drag() {
        let ctx = egui::Context::default();
        let mut app = app_with_one_edit();
        app.input.set_canvas_rect(egui::Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(32.0, 32.0)));
        for event in app.input.process_pointer(Some(pos2(4.0, 4.0)), true, false, true) {
            app.session.handle(event);
        }
        assert!(app.input.is_tracking());

        press(&mut app, &ctx, Key::Z, Modifiers::COMMAND);
        assert!(!app.input.is_tracking());
        assert!(!app.session.tools().is_drawing());
    }
}
