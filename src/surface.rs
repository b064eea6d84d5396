use std::io::Cursor;

use egui::{Color32, Pos2, Rect, pos2};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{SketchError, SketchResult};

/// How a brush combines with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over existing content
    #[default]
    Over,
    /// Punch through existing content, leaving transparency behind
    Cutout,
}

/// Everything a rasterization primitive needs to know about the pen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color32,
    pub width: f32,
    pub blend: BlendMode,
}

impl Brush {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            blend: BlendMode::Over,
        }
    }

    pub fn cutout(width: f32) -> Self {
        Self {
            color: Color32::BLACK,
            width,
            blend: BlendMode::Cutout,
        }
    }

    fn half_width(&self) -> f32 {
        self.width.max(1.0) * 0.5
    }
}

/// Immutable capture of the whole surface.
///
/// Deliberately not `Clone`: a snapshot lives in exactly one history stack
/// and is moved between them.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    image: RgbaImage,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// The mutable raster canvas being edited
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.image.width() as usize, self.image.height() as usize]
    }

    /// Unmultiplied color of a single pixel, transparent when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Color32 {
        match self.image.get_pixel_checked(x, y) {
            Some(Rgba([r, g, b, a])) => Color32::from_rgba_unmultiplied(*r, *g, *b, *a),
            None => Color32::TRANSPARENT,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            image: self.image.clone(),
        }
    }

    /// Installs `snapshot` as the surface contents and hands back what was there
    pub(crate) fn swap(&mut self, snapshot: Snapshot) -> Snapshot {
        Snapshot {
            image: std::mem::replace(&mut self.image, snapshot.image),
        }
    }

    pub fn clear(&mut self, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([r, g, b, a]);
        }
    }

    /// Straight segment with round caps, `width` pixels thick
    pub fn stroke_segment(&mut self, a: Pos2, b: Pos2, brush: &Brush) {
        let half = brush.half_width();
        let bounds = Rect::from_two_pos(a, b).expand(half);
        self.fill_where(bounds, brush, |p| distance_to_segment(p, a, b) <= half);
    }

    /// Axis-aligned rectangle outline with square (mitered) corners
    pub fn stroke_rect(&mut self, rect: Rect, brush: &Brush) {
        let half = brush.half_width();
        let outer = rect.expand(half);
        let inner = rect.shrink(half);
        self.fill_where(outer, brush, |p| {
            let in_inner = p.x > inner.min.x
                && p.x < inner.max.x
                && p.y > inner.min.y
                && p.y < inner.max.y;
            outer.contains(p) && !in_inner
        });
    }

    pub fn stroke_circle(&mut self, center: Pos2, radius: f32, brush: &Brush) {
        let half = brush.half_width();
        let bounds = Rect::from_center_size(center, egui::Vec2::splat(2.0 * (radius + half)));
        self.fill_where(bounds, brush, |p| (p.distance(center) - radius).abs() <= half);
    }

    /// Blends a single pixel with partial coverage in `0.0..=1.0`
    pub fn blend_pixel(&mut self, x: i32, y: i32, coverage: f32, brush: &Brush) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(pixel) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
            blend(pixel, brush, coverage.clamp(0.0, 1.0));
        }
    }

    /// Draws `image` with its top-left corner at `origin`, clipped to the surface
    pub fn draw_image(&mut self, image: &RgbaImage, origin: [u32; 2]) {
        let [ox, oy] = origin;
        let width = image.width().min(self.image.width().saturating_sub(ox));
        let height = image.height().min(self.image.height().saturating_sub(oy));
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                let brush = Brush::new(Color32::from_rgba_unmultiplied(r, g, b, a), 1.0);
                blend(self.image.get_pixel_mut(ox + x, oy + y), &brush, 1.0);
            }
        }
    }

    pub fn encode_png(&self) -> SketchResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(SketchError::Encode)?;
        Ok(bytes)
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), self.image.as_raw())
    }

    /// Runs `inside` on every pixel center within `bounds` and paints the hits
    fn fill_where(&mut self, bounds: Rect, brush: &Brush, inside: impl Fn(Pos2) -> bool) {
        let max_x = self.image.width() as f32;
        let max_y = self.image.height() as f32;
        let x0 = bounds.min.x.floor().clamp(0.0, max_x) as u32;
        let y0 = bounds.min.y.floor().clamp(0.0, max_y) as u32;
        let x1 = bounds.max.x.ceil().clamp(0.0, max_x) as u32;
        let y1 = bounds.max.y.ceil().clamp(0.0, max_y) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                if inside(pos2(x as f32 + 0.5, y as f32 + 0.5)) {
                    blend(self.image.get_pixel_mut(x, y), brush, 1.0);
                }
            }
        }
    }
}

/// Decodes any supported image format into RGBA pixels
pub fn decode_image(bytes: &[u8]) -> SketchResult<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(SketchError::Decode)?;
    log::debug!("Decoded image: {}x{}", image.width(), image.height());
    Ok(image.to_rgba8())
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn blend(dst: &mut Rgba<u8>, brush: &Brush, coverage: f32) {
    let [sr, sg, sb, sa] = brush.color.to_srgba_unmultiplied();
    let src_alpha = sa as f32 / 255.0 * coverage;
    let dst_alpha = dst.0[3] as f32 / 255.0;

    match brush.blend {
        BlendMode::Over => {
            let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
            if out_alpha <= 0.0 {
                *dst = Rgba([0, 0, 0, 0]);
                return;
            }
            let mix = |s: u8, d: u8| {
                let c = (s as f32 * src_alpha + d as f32 * dst_alpha * (1.0 - src_alpha)) / out_alpha;
                c.round().clamp(0.0, 255.0) as u8
            };
            *dst = Rgba([
                mix(sr, dst.0[0]),
                mix(sg, dst.0[1]),
                mix(sb, dst.0[2]),
                (out_alpha * 255.0).round() as u8,
            ]);
        }
        BlendMode::Cutout => {
            let out_alpha = dst_alpha * (1.0 - src_alpha);
            if out_alpha <= 0.0 {
                *dst = Rgba([0, 0, 0, 0]);
            } else {
                dst.0[3] = (out_alpha * 255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(surface: &Surface, x: u32, y: u32) -> bool {
        surface.pixel(x, y).a() > 0
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(16, 8);
        assert_eq!(surface.size(), [16, 8]);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_segment_covers_endpoints_and_skips_far_pixels() {
        let mut surface = Surface::new(40, 40);
        let brush = Brush::new(Color32::RED, 2.0);
        surface.stroke_segment(pos2(5.0, 10.0), pos2(30.0, 10.0), &brush);

        assert!(painted(&surface, 5, 10));
        assert!(painted(&surface, 18, 9));
        assert!(painted(&surface, 29, 10));
        assert!(!painted(&surface, 18, 20));
        assert_eq!(surface.pixel(18, 10), Color32::RED);
    }

    #[test]
    fn test_single_point_segment_makes_a_dot() {
        let mut surface = Surface::new(20, 20);
        surface.stroke_segment(pos2(10.0, 10.0), pos2(10.0, 10.0), &Brush::new(Color32::BLUE, 4.0));
        assert!(painted(&surface, 10, 10));
        assert!(painted(&surface, 9, 9));
        assert!(!painted(&surface, 14, 14));
    }

    #[test]
    fn test_rect_outline_leaves_interior_untouched() {
        let mut surface = Surface::new(80, 80);
        let rect = Rect::from_min_max(pos2(20.0, 30.0), pos2(50.0, 50.0));
        surface.stroke_rect(rect, &Brush::new(Color32::BLACK, 2.0));

        assert!(painted(&surface, 20, 40));
        assert!(painted(&surface, 49, 40));
        assert!(painted(&surface, 35, 30));
        assert!(painted(&surface, 35, 49));
        assert!(!painted(&surface, 35, 40));
        assert!(!painted(&surface, 55, 40));
        assert!(!painted(&surface, 35, 55));
    }

    #[test]
    fn test_circle_outline_is_a_ring() {
        let mut surface = Surface::new(30, 30);
        surface.stroke_circle(pos2(10.0, 10.0), 5.0, &Brush::new(Color32::GREEN, 2.0));

        assert!(painted(&surface, 15, 9));
        assert!(painted(&surface, 4, 9));
        assert!(!painted(&surface, 10, 10));
        assert!(!painted(&surface, 25, 25));
    }

    #[test]
    fn test_cutout_clears_alpha() {
        let mut surface = Surface::new(10, 10);
        surface.clear(Color32::WHITE);
        surface.stroke_segment(pos2(0.0, 5.0), pos2(10.0, 5.0), &Brush::cutout(2.0));

        assert_eq!(surface.pixel(3, 5), Color32::TRANSPARENT);
        assert_eq!(surface.pixel(3, 0), Color32::WHITE);
    }

    #[test]
    fn test_draw_image_is_clipped() {
        let mut surface = Surface::new(4, 4);
        let image = RgbaImage::from_pixel(6, 2, Rgba([255, 0, 0, 255]));
        surface.draw_image(&image, [0, 0]);

        assert_eq!(surface.pixel(3, 1), Color32::RED);
        assert!(!painted(&surface, 0, 2));
    }

    #[test]
    fn test_draw_image_at_offset_only_touches_overlap() {
        let mut surface = Surface::new(4, 4);
        let image = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255]));
        surface.draw_image(&image, [2, 3]);

        assert_eq!(surface.pixel(2, 3), Color32::BLUE);
        assert_eq!(surface.pixel(3, 3), Color32::BLUE);
        assert!(!painted(&surface, 1, 3));
        assert!(!painted(&surface, 2, 2));

        surface.draw_image(&image, [u32::MAX, 0]);
        assert!(!painted(&surface, 0, 0));
    }

    #[test]
    fn test_swap_returns_previous_contents() {
        let mut surface = Surface::new(4, 4);
        let blank = surface.snapshot();
        surface.clear(Color32::WHITE);

        let white = surface.swap(blank);
        assert!(surface.is_blank());
        assert_eq!(white.width(), 4);

        surface.swap(white);
        assert_eq!(surface.pixel(0, 0), Color32::WHITE);
    }

    #[test]
    fn test_png_export_decodes_back() {
        let mut surface = Surface::new(12, 7);
        surface.stroke_segment(pos2(1.0, 1.0), pos2(10.0, 5.0), &Brush::new(Color32::RED, 3.0));

        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(decoded.as_raw(), surface.image.as_raw());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image"), Err(SketchError::Decode(_))));
    }
}
