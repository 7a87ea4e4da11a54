// file_dialogs.rs
use crate::app::thumbnails::PREVIEW_EXTENSIONS;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

pub fn select_images(start: &Path) -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_directory(start)
        .add_filter("Image", &PREVIEW_EXTENSIONS[..])
        .pick_files()
}

pub fn select_directory(start: &Path) -> Option<PathBuf> {
    FileDialog::new().set_directory(start).pick_folder()
}
