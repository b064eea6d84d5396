mod central_panel;
mod text_prompt;
mod tools_panel;

pub use central_panel::central_panel;
pub use text_prompt::{TextPrompt, text_prompt};
pub use tools_panel::tools_panel;
