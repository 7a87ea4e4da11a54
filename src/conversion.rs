// conversion.rs
pub mod frame_extractor;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use frame_extractor::convert_webp_to_gif;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Outcome of one attempted file. `output` is `None` when no frame could be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

pub fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.to_ascii_lowercase() == "webp")
}

pub fn gif_destination(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".gif");
    output_dir.join(name)
}

pub fn ensure_directory(dir: &Path) -> Result<(), ConversionError> {
    std::fs::create_dir_all(dir).map_err(|source| ConversionError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Converts every `.webp` path of `selection`, one at a time and in order.
///
/// `on_result` sees each result before the next file starts. Other extensions
/// are skipped without a result. The first directory or write failure aborts
/// the rest of the batch.
pub fn convert_selection<F>(
    selection: &[PathBuf],
    output_dir: &Path,
    mut on_result: F,
) -> Result<Vec<ConversionResult>, ConversionError>
where
    F: FnMut(&ConversionResult),
{
    ensure_directory(output_dir)?;

    let mut results = Vec::new();
    for source in selection.iter().filter(|path| is_convertible(path)) {
        let result = convert_webp_to_gif(source, output_dir)?;
        on_result(&result);
        results.push(result);
    }
    Ok(results)
}
