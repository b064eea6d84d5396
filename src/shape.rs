//! Turns a completed drag into exactly one primitive.

use egui::{Pos2, Rect};

use crate::surface::{Brush, Surface};
use crate::tools::Tool;

/// A primitive produced by a line, rect or circle drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line { from: Pos2, to: Pos2 },
    /// Always normalized: `min` is the top-left corner
    Rect(Rect),
    Circle { center: Pos2, radius: f32 },
}

impl Shape {
    /// Builds the shape for `tool` dragged from `anchor` to `release`.
    ///
    /// Returns `None` for tools that are not drag-to-shape tools (pencil and
    /// eraser paint incrementally, text asks for a string instead).
    pub fn from_drag(tool: Tool, anchor: Pos2, release: Pos2) -> Option<Self> {
        match tool {
            Tool::Line => Some(Self::Line {
                from: anchor,
                to: release,
            }),
            Tool::Rect => Some(Self::Rect(Rect::from_two_pos(anchor, release))),
            Tool::Circle => Some(Self::Circle {
                center: anchor,
                radius: anchor.distance(release),
            }),
            Tool::Pencil | Tool::Eraser | Tool::Text => None,
        }
    }

    /// Same as [`Self::from_drag`] but keyed by tool name; unknown names yield nothing.
    pub fn from_named_drag(tool: &str, anchor: Pos2, release: Pos2) -> Option<Self> {
        Tool::from_name(tool).and_then(|tool| Self::from_drag(tool, anchor, release))
    }

    pub fn render(&self, surface: &mut Surface, brush: &Brush) {
        match *self {
            Self::Line { from, to } => surface.stroke_segment(from, to, brush),
            Self::Rect(rect) => surface.stroke_rect(rect, brush),
            Self::Circle { center, radius } => surface.stroke_circle(center, radius, brush),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Rect(_) => "rect",
            Self::Circle { .. } => "circle",
        }
    }
}
