// thumbnails.rs
use crate::conversion::frame_extractor::decode_frames;
use egui_extras::RetainedImage;
use image::imageops::FilterType;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub const THUMBNAIL_HEIGHT: u32 = 100;
pub const PREVIEW_EXTENSIONS: [&str; 4] = ["webp", "png", "jpg", "jpeg"];

pub fn is_previewable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .map_or(false, |ext| PREVIEW_EXTENSIONS.contains(&ext.as_str()))
}

pub fn previewable(selection: &[PathBuf]) -> Vec<PathBuf> {
    selection
        .iter()
        .filter(|path| is_previewable(path))
        .cloned()
        .collect()
}

/// Decodes `path` and scales it to `height`, keeping the aspect ratio.
pub fn load_preview(path: &Path, height: u32) -> Option<RgbaImage> {
    let image = if crate::conversion::is_convertible(path) {
        let bytes = std::fs::read(path).ok()?;
        decode_frames(&bytes).into_iter().next()?
    } else {
        image::open(path).ok()?.to_rgba8()
    };

    let (width, original_height) = image.dimensions();
    let scaled_width = (u64::from(width) * u64::from(height) / u64::from(original_height.max(1))).max(1);
    let scaled_width = u32::try_from(scaled_width).unwrap_or(u32::MAX);
    Some(image::imageops::resize(&image, scaled_width, height, FilterType::Triangle))
}

pub struct ThumbnailEntry {
    pub path: PathBuf,
    pub preview: Option<RetainedImage>,
    pub size: egui::Vec2,
}

#[derive(Default)]
pub struct ThumbnailGrid {
    entries: Vec<ThumbnailEntry>,
}

impl ThumbnailGrid {
    pub fn entries(&self) -> &[ThumbnailEntry] {
        &self.entries
    }

    /// Throws away every entry and builds one per previewable path, in
    /// selection order. Returns the paths whose preview failed to decode.
    pub fn rebuild(&mut self, selection: &[PathBuf]) -> Vec<PathBuf> {
        self.entries.clear();

        let paths = previewable(selection);
        let decoded: Vec<Option<RgbaImage>> = paths
            .par_iter()
            .map(|path| load_preview(path, THUMBNAIL_HEIGHT))
            .collect();

        let mut failed = Vec::new();
        for (path, preview) in paths.into_iter().zip(decoded) {
            let entry = match preview {
                Some(image) => {
                    let size = egui::vec2(image.width() as f32, image.height() as f32);
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width() as usize, image.height() as usize],
                        image.as_raw(),
                    );
                    ThumbnailEntry {
                        preview: Some(RetainedImage::from_color_image(
                            path.to_string_lossy(),
                            color_image,
                        )),
                        path,
                        size,
                    }
                }
                None => {
                    failed.push(path.clone());
                    ThumbnailEntry {
                        path,
                        preview: None,
                        size: egui::vec2(THUMBNAIL_HEIGHT as f32, THUMBNAIL_HEIGHT as f32),
                    }
                }
            };
            self.entries.push(entry);
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::frame_extractor::tests::write_webp;

    fn paths(entries: &[ThumbnailEntry]) -> Vec<PathBuf> {
        entries.iter().map(|entry| entry.path.clone()).collect()
    }

    #[test]
    fn preview_extensions_are_case_insensitive() {
        for name in ["a.webp", "b.PNG", "c.Jpg", "d.jpeg"] {
            assert!(is_previewable(Path::new(name)), "{name}");
        }
        for name in ["e.gif", "f.bmp", "jpeg", "g.jpeg.txt"] {
            assert!(!is_previewable(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn filter_preserves_selection_order() {
        let selection: Vec<PathBuf> = ["z.png", "notes.txt", "a.webp", "m.JPG"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(
            previewable(&selection),
            vec![
                PathBuf::from("z.png"),
                PathBuf::from("a.webp"),
                PathBuf::from("m.JPG")
            ]
        );
    }

    #[test]
    fn preview_keeps_aspect_ratio_at_fixed_height() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbaImage::from_pixel(400, 200, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let preview = load_preview(&path, THUMBNAIL_HEIGHT).unwrap();
        assert_eq!(preview.dimensions(), (200, 100));
    }

    #[test]
    fn webp_previews_use_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tall.webp");
        write_webp(&path, &RgbaImage::from_pixel(10, 40, image::Rgba([9, 9, 9, 255])));

        let preview = load_preview(&path, THUMBNAIL_HEIGHT).unwrap();
        assert_eq!(preview.dimensions(), (25, 100));
    }

    #[test]
    fn rebuild_replaces_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("b.png");
        let webp = dir.path().join("a.webp");
        RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]))
            .save(&png)
            .unwrap();
        write_webp(&webp, &RgbaImage::from_pixel(8, 4, image::Rgba([5, 5, 5, 255])));

        let mut grid = ThumbnailGrid::default();
        let failed = grid.rebuild(&[webp.clone(), dir.path().join("x.txt"), png.clone()]);
        assert!(failed.is_empty());
        assert_eq!(paths(grid.entries()), vec![webp.clone(), png.clone()]);
        assert!(grid.entries().iter().all(|entry| entry.preview.is_some()));

        grid.rebuild(&[png.clone()]);
        assert_eq!(paths(grid.entries()), vec![png]);

        grid.rebuild(&[]);
        assert!(grid.entries().is_empty());
    }

    #[test]
    fn undecodable_files_still_get_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not a jpeg").unwrap();

        let mut grid = ThumbnailGrid::default();
        let failed = grid.rebuild(&[broken.clone()]);
        assert_eq!(failed, vec![broken.clone()]);
        assert_eq!(paths(grid.entries()), vec![broken]);
        assert!(grid.entries()[0].preview.is_none());
    }
}
