use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use egui::Pos2;

use crate::error::{SketchError, SketchResult};
use crate::surface::{Brush, Surface};

/// Rasterizes single-line text onto a surface
pub struct TextRenderer {
    font: FontVec,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}

impl TextRenderer {
    /// Uses the first proportional font bundled with egui
    pub fn from_egui_defaults() -> SketchResult<Self> {
        let definitions = egui::FontDefinitions::default();
        let name = definitions
            .families
            .get(&egui::FontFamily::Proportional)
            .and_then(|names| names.first())
            .ok_or_else(|| SketchError::Font("no proportional font configured".to_owned()))?;
        let data = definitions
            .font_data
            .get(name)
            .ok_or_else(|| SketchError::Font(format!("missing font data for {name}")))?;
        Self::from_bytes(data.font.to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> SketchResult<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|err| SketchError::Font(err.to_string()))?;
        Ok(Self { font })
    }

    /// Draws `text` with its baseline starting at `origin`.
    ///
    /// Returns `false` if no glyph produced any pixels.
    pub fn draw(&self, surface: &mut Surface, text: &str, origin: Pos2, size: f32, brush: &Brush) -> bool {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut caret = origin.x;
        let mut previous: Option<GlyphId> = None;
        let mut drawn = false;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, origin.y));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|x, y, coverage| {
                    surface.blend_pixel(left + x as i32, top + y as i32, coverage, brush);
                });
                drawn = true;
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    #[test]
    fn test_text_lands_above_baseline() {
        let renderer = TextRenderer::from_egui_defaults().unwrap();
        let mut surface = Surface::new(120, 60);
        let drawn = renderer.draw(
            &mut surface,
            "Hi",
            pos2(10.0, 40.0),
            20.0,
            &Brush::new(Color32::BLACK, 5.0),
        );

        assert!(drawn);
        assert!(!surface.is_blank());
        // Nothing below the baseline for these glyphs, nothing left of the origin
        for x in 0..120 {
            assert_eq!(surface.pixel(x, 45).a(), 0);
        }
        for y in 0..60 {
            assert_eq!(surface.pixel(5, y).a(), 0);
        }
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        let renderer = TextRenderer::from_egui_defaults().unwrap();
        let mut surface = Surface::new(40, 40);
        let brush = Brush::new(Color32::BLACK, 5.0);
        assert!(!renderer.draw(&mut surface, "", pos2(5.0, 20.0), 20.0, &brush));
        assert!(!renderer.draw(&mut surface, " ", pos2(5.0, 20.0), 20.0, &brush));
        assert!(surface.is_blank());
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(
            TextRenderer::from_bytes(vec![1, 2, 3]),
            Err(SketchError::Font(_))
        ));
    }
}
