// src/renderer.rs
use eframe::egui::{self, Color32, Rect, TextureHandle, TextureOptions, pos2};

use crate::input::InputHandler;
use crate::session::Session;
use crate::shape::Shape;

/// Keeps the surface texture in sync and paints the canvas
pub struct Renderer {
    texture: Option<TextureHandle>,
    /// Session revision the texture was last uploaded for
    uploaded_revision: Option<u64>,
    ctx: egui::Context,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("uploaded_revision", &self.uploaded_revision)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_context(cc.egui_ctx.clone())
    }

    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            texture: None,
            uploaded_revision: None,
            ctx,
        }
    }

    /// Uploads the surface to the GPU if it changed since the last frame
    pub fn sync(&mut self, session: &Session) {
        if self.uploaded_revision == Some(session.revision()) && self.texture.is_some() {
            return;
        }
        let image = session.surface().to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(self.ctx.load_texture("surface", image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_revision = Some(session.revision());
    }

    /// Renders the surface plus the live preview of a pending shape
    ///
    /// Args:
    ///     painter (egui::Painter): The painter to draw with
    ///     input (InputHandler): Maps surface coordinates to the screen
    ///     session (Session): What to draw
    pub fn render(&mut self, painter: &egui::Painter, input: &InputHandler, session: &Session) {
        self.sync(session);

        let [width, height] = session.surface().size();
        let canvas_rect = Rect::from_min_size(
            input.to_screen(pos2(0.0, 0.0)),
            egui::vec2(width as f32, height as f32),
        );

        painter.rect_filled(canvas_rect, 0.0, session.settings().background);
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                canvas_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let tools = session.tools();
        if let Some(shape) = tools.preview() {
            let stroke = egui::Stroke::new(tools.width(), tools.color());
            match shape {
                Shape::Line { from, to } => {
                    painter.line_segment([input.to_screen(from), input.to_screen(to)], stroke);
                }
                Shape::Rect(rect) => {
                    let rect = Rect::from_min_max(input.to_screen(rect.min), input.to_screen(rect.max));
                    painter.rect_stroke(rect, 0.0, stroke);
                }
                Shape::Circle { center, radius } => {
                    painter.circle_stroke(input.to_screen(center), radius, stroke);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::tools::Tool;

    #[test]
    fn test_sync_uploads_only_on_change() {
        let mut renderer = Renderer::with_context(egui::Context::default());
        let mut session = Session::default();

        renderer.sync(&session);
        assert!(renderer.texture.is_some());
        assert_eq!(renderer.uploaded_revision, Some(session.revision()));

        session.handle(InputEvent::PointerDown(pos2(3.0, 3.0)));
        assert_ne!(renderer.uploaded_revision, Some(session.revision()));
        renderer.sync(&session);
        assert_eq!(renderer.uploaded_revision, Some(session.revision()));
    }

    #[test]
    fn test_render_with_preview() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::with_context(ctx.clone());
        let mut session = Session::default();
        session.select_tool(Tool::Circle);
        session.handle(InputEvent::PointerDown(pos2(30.0, 30.0)));
        session.handle(InputEvent::PointerMove(pos2(40.0, 30.0)));

        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);
        let input = InputHandler::new(rect);
        renderer.render(&painter, &input, &session);
        assert!(renderer.texture.is_some());
    }
}
