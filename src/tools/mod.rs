use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::input::InputEvent;
use crate::shape::Shape;
use crate::stroke::{FreehandStroke, Pen};

pub const MIN_WIDTH: f32 = 1.0;
pub const MAX_WIDTH: f32 = 50.0;

/// The active drawing mode, governing how pointer events are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Line,
    Rect,
    Circle,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pencil,
        Tool::Eraser,
        Tool::Line,
        Tool::Rect,
        Tool::Circle,
        Tool::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Eraser => "eraser",
            Self::Line => "line",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }

    /// Glyph shown on the toolbar button
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pencil => "✏",
            Self::Eraser => "⌫",
            Self::Line => "╱",
            Self::Rect => "◻",
            Self::Circle => "○",
            Self::Text => "T",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Pencil and eraser paint while the pointer moves
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pencil | Self::Eraser)
    }
}

/// What the session has to do to the surface after an input event
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    None,
    BeginStroke { at: Pos2, pen: Pen },
    ExtendStroke { from: Pos2, to: Pos2, pen: Pen },
    EndStroke,
    DrawShape { shape: Shape, pen: Pen },
    RequestText { at: Pos2 },
}

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Freehand(FreehandStroke),
    Drag {
        anchor: Pos2,
        current: Pos2,
    },
}

/// Current tool, color and width plus the gesture in progress
#[derive(Debug, Clone)]
pub struct ToolState {
    tool: Tool,
    color: Color32,
    width: f32,
    gesture: Gesture,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(Tool::default(), Color32::BLACK, 5.0)
    }
}

impl ToolState {
    pub fn new(tool: Tool, color: Color32, width: f32) -> Self {
        Self {
            tool,
            color,
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            gesture: Gesture::Idle,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Switches tools, abandoning any gesture of the previous tool
    pub fn set_tool(&mut self, tool: Tool) -> ToolAction {
        let action = if self.tool != tool {
            self.handle(InputEvent::Cancel)
        } else {
            ToolAction::None
        };
        self.tool = tool;
        action
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    }

    /// Where the current gesture started
    pub fn anchor(&self) -> Option<Pos2> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Freehand(stroke) => Some(stroke.start()),
            Gesture::Drag { anchor, .. } => Some(*anchor),
        }
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The shape that would be drawn if the pointer were released now
    pub fn preview(&self) -> Option<Shape> {
        match self.gesture {
            Gesture::Drag { anchor, current } => Shape::from_drag(self.tool, anchor, current),
            _ => None,
        }
    }

    pub fn pen(&self) -> Pen {
        Pen {
            color: self.color,
            width: self.width,
            eraser: self.tool == Tool::Eraser,
        }
    }

    /// Font size used by the text tool, in pixels
    pub fn font_size(&self) -> f32 {
        self.width * 4.0
    }

    /// Advances the gesture for one input event.
    ///
    /// This only updates tool state; applying the returned action to a
    /// surface is up to the caller.
    pub fn handle(&mut self, event: InputEvent) -> ToolAction {
        match event {
            InputEvent::PointerDown(pos) => {
                if self.tool.is_freehand() {
                    let pen = self.pen();
                    self.gesture = Gesture::Freehand(FreehandStroke::new(pen, pos));
                    ToolAction::BeginStroke { at: pos, pen }
                } else {
                    self.gesture = Gesture::Drag {
                        anchor: pos,
                        current: pos,
                    };
                    ToolAction::None
                }
            }
            InputEvent::PointerMove(pos) => match &mut self.gesture {
                Gesture::Freehand(stroke) => {
                    let from = stroke.add_point(pos);
                    ToolAction::ExtendStroke {
                        from,
                        to: pos,
                        pen: stroke.pen(),
                    }
                }
                Gesture::Drag { current, .. } => {
                    *current = pos;
                    ToolAction::None
                }
                Gesture::Idle => ToolAction::None,
            },
            InputEvent::PointerUp(pos) => match std::mem::take(&mut self.gesture) {
                Gesture::Freehand(_) => ToolAction::EndStroke,
                Gesture::Drag { anchor, .. } => {
                    if self.tool == Tool::Text {
                        ToolAction::RequestText { at: pos }
                    } else if let Some(shape) = Shape::from_drag(self.tool, anchor, pos) {
                        ToolAction::DrawShape {
                            shape,
                            pen: self.pen(),
                        }
                    } else {
                        ToolAction::None
                    }
                }
                Gesture::Idle => ToolAction::None,
            },
            InputEvent::Cancel => match std::mem::take(&mut self.gesture) {
                Gesture::Freehand(_) => ToolAction::EndStroke,
                Gesture::Drag { .. } | Gesture::Idle => ToolAction::None,
            },
        }
    }
}
