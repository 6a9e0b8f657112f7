//! Download fallback: one independent save per artifact

use super::ExportFile;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait Downloader {
    /// Saves one file and returns where it landed.
    fn download(&self, file: &ExportFile) -> Result<PathBuf>;
}

/// Writes files into a directory, overwriting same-named files
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, file: &ExportFile) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.name);
        std::fs::write(&path, &file.bytes)?;
        info!(path = %path.display(), bytes = file.bytes.len(), "export downloaded");
        Ok(path)
    }
}
