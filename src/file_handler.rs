use std::future::Future;
use std::sync::Arc;

use eframe::egui;
use parking_lot::Mutex;

use crate::error::SketchResult;

/// Name offered when exporting the canvas
pub const EXPORT_FILE_NAME: &str = "drawing.png";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Raw bytes of a file the user picked or dropped
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Bridges file dialogs and drag-and-drop to the UI thread.
///
/// Dialogs run asynchronously; whatever they load lands in a shared slot
/// that the app drains at the start of each frame.
#[derive(Default)]
pub struct FileHandler {
    loaded: Arc<Mutex<Vec<LoadedFile>>>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an image picker. Cancelling the dialog does nothing.
    pub fn open_image_dialog(&self, ctx: &egui::Context) {
        let loaded = Arc::clone(&self.loaded);
        let ctx = ctx.clone();
        execute(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let name = file.file_name();
            let bytes = file.read().await;
            log::info!("Picked image: {} ({} bytes)", name, bytes.len());
            loaded.lock().push(LoadedFile { name, bytes });
            ctx.request_repaint();
        });
    }

    /// Offers the encoded PNG for saving as `drawing.png`
    pub fn save_png_dialog(&self, bytes: Vec<u8>) {
        execute(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("PNG image", &["png"])
                .set_file_name(EXPORT_FILE_NAME)
                .save_file()
                .await
            else {
                return;
            };
            match file.write(&bytes).await {
                Ok(()) => log::info!("Saved {} ({} bytes)", file.file_name(), bytes.len()),
                Err(err) => log::error!("Failed to save {}: {}", file.file_name(), err),
            }
        });
    }

    /// Files the dialogs finished loading since the last call
    pub fn take_loaded(&self) -> Vec<LoadedFile> {
        std::mem::take(&mut *self.loaded.lock())
    }

    /// Image files dropped onto the window this frame
    pub fn take_dropped_files(&self, ctx: &egui::Context) -> Vec<LoadedFile> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped.iter().filter_map(Self::load_dropped_file).collect()
    }

    fn load_dropped_file(file: &egui::DroppedFile) -> Option<LoadedFile> {
        let name = if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        };

        if !is_image_file(&file.mime, file.path.as_deref()) {
            log::warn!("Dropped file is not a supported type: {}", name);
            return None;
        }

        if let Some(bytes) = &file.bytes {
            log::info!("Processing image from memory: {} ({} bytes)", name, bytes.len());
            return Some(LoadedFile {
                name,
                bytes: bytes.to_vec(),
            });
        }

        // For native platforms, we can load the file from the path
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(path) = &file.path {
                log::info!("Processing image from path: {}", path.display());
                return match read_path(path) {
                    Ok(bytes) => Some(LoadedFile { name, bytes }),
                    Err(err) => {
                        log::error!("Failed to read {}: {}", path.display(), err);
                        None
                    }
                };
            }
        }

        log::warn!("Dropped file has no accessible data: {}", name);
        None
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to import:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(mime: &str, path: Option<&std::path::Path>) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    path.and_then(|path| path.extension())
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_path(path: &std::path::Path) -> SketchResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn execute<F: Future<Output = ()> + Send + 'static>(f: F) {
    std::thread::spawn(move || futures::executor::block_on(f));
}

#[cfg(target_arch = "wasm32")]
fn execute<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_image_detection() {
        assert!(is_image_file("image/png", None));
        assert!(!is_image_file("text/plain", Some(Path::new("a.png"))));
        assert!(is_image_file("", Some(Path::new("photo.JPG"))));
        assert!(!is_image_file("", Some(Path::new("notes.txt"))));
        assert!(!is_image_file("", None));
    }

    #[test]
    fn test_dropped_bytes_are_loaded() {
        let file = egui::DroppedFile {
            name: "dot.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(Arc::from(vec![1u8, 2, 3].into_boxed_slice())),
            ..Default::default()
        };
        let loaded = FileHandler::load_dropped_file(&file).unwrap();
        assert_eq!(loaded.name, "dot.png");
        assert_eq!(loaded.bytes, vec![1, 2, 3]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_unreadable_dropped_path_is_skipped() {
        let path = std::env::temp_dir().join("eframe_sketch_missing_drop.png");
        assert!(matches!(read_path(&path), Err(crate::error::SketchError::Io(_))));

        let file = egui::DroppedFile {
            path: Some(path),
            mime: "image/png".to_owned(),
            ..Default::default()
        };
        assert!(FileHandler::load_dropped_file(&file).is_none());
    }

    #[test]
    fn test_take_loaded_drains() {
        let handler = FileHandler::new();
        handler.loaded.lock().push(LoadedFile {
            name: "a.png".to_owned(),
            bytes: vec![0],
        });
        assert_eq!(handler.take_loaded().len(), 1);
        assert!(handler.take_loaded().is_empty());
    }
}
