use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::error::SketchResult;
use crate::history::History;
use crate::input::InputEvent;
use crate::settings::Settings;
use crate::stroke::Pen;
use crate::surface::{Brush, Surface, decode_image};
use crate::text::TextRenderer;
use crate::tools::{Tool, ToolAction, ToolState};

/// The text tool was released here; the UI should ask the user for a string
/// and hand it to [`Session::place_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRequest {
    pub at: Pos2,
}

/// One editing session: the surface, its history and the tool state.
///
/// Every mutation of the surface goes through here, and every mutation is
/// preceded by a history commit of the pre-edit state.
#[derive(Debug)]
pub struct Session {
    surface: Surface,
    history: History,
    tools: ToolState,
    settings: Settings,
    text: Option<TextRenderer>,
    /// Bumped whenever the surface pixels change
    revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let [width, height] = settings.canvas_size();
        Self {
            surface: Surface::new(width, height),
            history: History::new(settings.history_limit()),
            tools: ToolState::new(Tool::default(), settings.default_color, settings.default_width),
            settings,
            text: None,
            revision: 0,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Canvas size and history limit changes apply on the next [`Self::new_canvas`]
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if tool != self.tools.tool() {
            log::info!("Tool selected: {}", tool.name());
        }
        let action = self.tools.set_tool(tool);
        self.apply(action);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.tools.set_color(color);
    }

    pub fn set_width(&mut self, width: f32) {
        self.tools.set_width(width);
    }

    /// Feeds one input event through the tool state and applies the result
    pub fn handle(&mut self, event: InputEvent) -> Option<TextRequest> {
        let action = self.tools.handle(event);
        self.apply(action)
    }

    fn apply(&mut self, action: ToolAction) -> Option<TextRequest> {
        match action {
            ToolAction::None => {}
            ToolAction::BeginStroke { at, pen } => {
                self.history.commit(&self.surface);
                let brush = self.brush_for(pen);
                self.surface.stroke_segment(at, at, &brush);
                self.touch();
            }
            ToolAction::ExtendStroke { from, to, pen } => {
                let brush = self.brush_for(pen);
                self.surface.stroke_segment(from, to, &brush);
                self.touch();
            }
            ToolAction::EndStroke => {
                log::debug!("Freehand stroke finished");
            }
            ToolAction::DrawShape { shape, pen } => {
                self.history.commit(&self.surface);
                let brush = self.brush_for(pen);
                shape.render(&mut self.surface, &brush);
                log::debug!("Drew {}: {:?}", shape.name(), shape);
                self.touch();
            }
            ToolAction::RequestText { at } => return Some(TextRequest { at }),
        }
        None
    }

    fn brush_for(&self, pen: Pen) -> Brush {
        if pen.eraser {
            self.settings.eraser_brush(pen.width)
        } else {
            Brush::new(pen.color, pen.width)
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Abandons the gesture in progress, if any
    pub fn cancel_gesture(&mut self) {
        let action = self.tools.handle(InputEvent::Cancel);
        self.apply(action);
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let restored = self.history.undo(&mut self.surface);
        if restored {
            self.touch();
        } else {
            log::debug!("Nothing to undo");
        }
        restored
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let restored = self.history.redo(&mut self.surface);
        if restored {
            self.touch();
        } else {
            log::debug!("Nothing to redo");
        }
        restored
    }

    /// Renders `text` at `at` in the current color, sized from the stroke width.
    ///
    /// Empty text is skipped without touching history. Returns whether the
    /// surface was edited.
    pub fn place_text(&mut self, at: Pos2, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if self.text.is_none() {
            match TextRenderer::from_egui_defaults() {
                Ok(renderer) => self.text = Some(renderer),
                Err(err) => {
                    log::error!("Text tool unavailable: {}", err);
                    return false;
                }
            }
        }
        let Some(renderer) = &self.text else {
            return false;
        };

        self.history.commit(&self.surface);
        let brush = Brush::new(self.tools.color(), self.tools.width());
        renderer.draw(&mut self.surface, text, at, self.tools.font_size(), &brush);
        self.touch();
        true
    }

    /// Decodes an image file and draws it at the origin over the current content
    pub fn import_image(&mut self, bytes: &[u8]) -> SketchResult<()> {
        let image = decode_image(bytes)?;
        self.import_decoded(&image);
        Ok(())
    }

    pub fn import_decoded(&mut self, image: &RgbaImage) {
        self.cancel_gesture();
        self.history.commit(&self.surface);
        self.surface.draw_image(image, [0, 0]);
        log::info!("Imported {}x{} image", image.width(), image.height());
        self.touch();
    }

    pub fn export_png(&self) -> SketchResult<Vec<u8>> {
        self.surface.encode_png()
    }

    /// Starts over with a blank canvas.
    ///
    /// Keeps history (the clear is undoable) unless the canvas size or the
    /// history limit changed in the settings.
    pub fn new_canvas(&mut self) {
        self.cancel_gesture();
        let [width, height] = self.settings.canvas_size();
        let resized = [self.surface.width(), self.surface.height()] != [width, height];

        if resized || self.history.limit() != self.settings.history_limit() {
            log::info!("New {}x{} canvas, history reset", width, height);
            self.surface = Surface::new(width, height);
            self.history = History::new(self.settings.history_limit());
        } else {
            self.history.commit(&self.surface);
            self.surface.clear(Color32::TRANSPARENT);
        }
        self.touch();
    }
}
