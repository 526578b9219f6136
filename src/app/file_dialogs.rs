// file_dialogs.rs
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::{Path, PathBuf};

pub fn select_input_image() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Image Files", &["jpg", "jpeg", "png"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

pub fn select_output_path(current: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .add_filter("WebP Image", &["webp"])
        .add_filter("All Files", &["*"]);

    let current = Path::new(current);
    if let Some(dir) = current.parent().filter(|p| p.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    if let Some(name) = current.file_name().and_then(|n| n.to_str()) {
        dialog = dialog.set_file_name(name);
    }

    dialog.save_file()
}

/// Same folder and stem as the input, with a `.webp` extension.
pub fn suggest_output_path(input: &Path) -> PathBuf {
    input.with_extension("webp")
}

pub fn show_info(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn show_error(message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
