// file_browser.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Directory listing plus the user's ordered multi-selection.
///
/// The selection survives navigation, so files from several directories can
/// be picked together. Every mutation hands back the complete selection.
pub struct FileBrowser {
    current_dir: PathBuf,
    entries: Vec<BrowserEntry>,
    selection: Vec<PathBuf>,
}

impl FileBrowser {
    pub fn new(start_dir: PathBuf) -> Self {
        Self {
            current_dir: start_dir,
            entries: Vec::new(),
            selection: Vec::new(),
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &[PathBuf] {
        &self.selection
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selection.iter().any(|selected| selected == path)
    }

    /// Lists `dir`. On failure the previous directory stays on screen.
    pub fn open(&mut self, dir: PathBuf) -> Result<(), BrowserError> {
        self.entries = read_entries(&dir)?;
        self.current_dir = dir;
        Ok(())
    }

    pub fn go_up(&mut self) -> Result<(), BrowserError> {
        match self.current_dir.parent() {
            Some(parent) => self.open(parent.to_path_buf()),
            None => Ok(()),
        }
    }

    pub fn toggle(&mut self, path: &Path) -> &[PathBuf] {
        if let Some(index) = self.selection.iter().position(|selected| selected == path) {
            self.selection.remove(index);
        } else {
            self.selection.push(path.to_path_buf());
        }
        &self.selection
    }

    pub fn replace_selection(&mut self, paths: Vec<PathBuf>) -> &[PathBuf] {
        self.selection = paths;
        &self.selection
    }
}

fn read_entries(dir: &Path) -> Result<Vec<BrowserEntry>, BrowserError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| BrowserError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<BrowserEntry> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                return None;
            }
            let path = entry.path();
            Some(BrowserEntry {
                is_dir: path.is_dir(),
                path,
                name,
            })
        })
        .collect();

    // Directories first, then files, each alphabetical.
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}
