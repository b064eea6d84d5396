use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::surface::Brush;

/// How the eraser removes paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EraseMode {
    /// Cut through to transparency
    #[default]
    Cutout,
    /// Paint the background color
    Background,
}

/// User-tunable settings, persisted together with the app state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// `None` keeps every snapshot
    pub history_limit: Option<usize>,
    pub default_color: Color32,
    pub default_width: f32,
    pub erase_mode: EraseMode,
    /// Shown behind transparent pixels, and painted by the eraser in background mode
    pub background: Color32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            default_color: Color32::BLACK,
            default_width: 5.0,
            erase_mode: EraseMode::default(),
            background: Color32::WHITE,
        }
    }
}

impl Settings {
    pub fn canvas_size(&self) -> [u32; 2] {
        [self.canvas_width.max(1), self.canvas_height.max(1)]
    }

    /// The bound the history is built with. Every stack keeps at least one snapshot.
    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit.map(|limit| limit.max(1))
    }

    /// The brush the eraser uses for a given width
    pub fn eraser_brush(&self, width: f32) -> Brush {
        match self.erase_mode {
            EraseMode::Cutout => Brush::cutout(width),
            EraseMode::Background => Brush::new(self.background, width),
        }
    }
}
