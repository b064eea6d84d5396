use egui::{Color32, Pos2};

/// Color and width captured when a gesture starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color32,
    pub width: f32,
    /// Erase instead of paint
    pub eraser: bool,
}

/// In-progress pencil/eraser path.
///
/// Segments are rasterized as points arrive, so only the ends of the path
/// are tracked.
#[derive(Debug, Clone)]
pub struct FreehandStroke {
    start: Pos2,
    last: Pos2,
    pen: Pen,
}

impl FreehandStroke {
    pub fn new(pen: Pen, start: Pos2) -> Self {
        Self {
            start,
            last: start,
            pen,
        }
    }

    /// Moves the end of the path and returns the previous end
    pub fn add_point(&mut self, point: Pos2) -> Pos2 {
        std::mem::replace(&mut self.last, point)
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn last_point(&self) -> Pos2 {
        self.last
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }
}
