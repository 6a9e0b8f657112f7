//! Native share hand-off
//!
//! `share` reports whether the hand-off was accepted, not whether the user
//! finished sharing.

use super::ExportFile;
use crate::error::{Result, VitalsError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

#[allow(async_fn_in_trait)]
pub trait ShareTarget {
    /// Capability check, done before any hand-off attempt.
    fn is_available(&self) -> bool;

    /// Hands every file over as one action.
    async fn share(&self, files: &[ExportFile], title: &str) -> Result<bool>;
}

/// No share capability on this device
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _files: &[ExportFile], _title: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Hands files to an external program: `<program> <args..> <file paths..>`
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandShare {
    pub fn new(program: impl Into<String>, args: Vec<String>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            staging_dir: staging_dir.into(),
        }
    }

    fn resolve_program(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| candidate.is_file())
    }

    /// Writes the payloads into a fresh directory under `staging_dir`. The
    /// directory is removed when the returned `TempDir` drops.
    fn stage(&self, files: &[ExportFile]) -> Result<(TempDir, Vec<PathBuf>)> {
        std::fs::create_dir_all(&self.staging_dir)?;
        let dir = tempfile::Builder::new()
            .prefix("share-")
            .tempdir_in(&self.staging_dir)?;
        let paths = files
            .iter()
            .map(|file| {
                let path = dir.path().join(&file.name);
                std::fs::write(&path, &file.bytes)?;
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((dir, paths))
    }
}

impl ShareTarget for CommandShare {
    fn is_available(&self) -> bool {
        !self.program.trim().is_empty() && self.resolve_program().is_some()
    }

    async fn share(&self, files: &[ExportFile], title: &str) -> Result<bool> {
        let program = self
            .resolve_program()
            .ok_or_else(|| VitalsError::Share(format!("program not found: {}", self.program)))?;
        // held until the program exits
        let (_staged, paths) = self.stage(files)?;

        let args: Vec<String> = self.args.iter().map(|a| a.replace("{title}", title)).collect();
        debug!(program = %program.display(), files = paths.len(), "starting share hand-off");

        let status = Command::new(&program)
            .args(&args)
            .args(&paths)
            .status()
            .await
            .map_err(|e| VitalsError::Share(format!("{}: {}", program.display(), e)))?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_share_unavailable() {
        assert!(!NoShare.is_available());
    }

    #[test]
    fn test_missing_program_unavailable() {
        let dir = tempdir().expect("Failed to create temp dir");
        let share = CommandShare::new("definitely-not-a-real-share-tool-42", vec![], dir.path());
        assert!(!share.is_available());

        let share = CommandShare::new("", vec![], dir.path());
        assert!(!share.is_available());
    }

    #[test]
    fn test_stage_writes_files() {
        let dir = tempdir().expect("Failed to create temp dir");
        let share = CommandShare::new("true", vec![], dir.path().join("staging"));
        let files = vec![ExportFile::new("a.csv", "text/csv", b"x,y\n".to_vec())];

        let (staged, paths) = share.stage(&files).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with(dir.path().join("staging")));
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"x,y\n");

        drop(staged);
        assert!(!paths[0].exists());
        assert_eq!(std::fs::read_dir(dir.path().join("staging")).unwrap().count(), 0);
    }
}
