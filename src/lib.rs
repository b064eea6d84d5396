#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod error;
pub mod file_handler;
pub mod history;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod shape;
pub mod stroke;
pub mod surface;
pub mod text;
pub mod tools;

pub use app::SketchApp;
pub use error::{SketchError, SketchResult};
pub use history::History;
pub use input::{InputEvent, InputHandler};
pub use renderer::Renderer;
pub use session::{Session, TextRequest};
pub use settings::{EraseMode, Settings};
pub use shape::Shape;
pub use surface::{Brush, Snapshot, Surface};
pub use tools::{Tool, ToolAction, ToolState};
