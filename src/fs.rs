//! Destination filesystem collaborator.
//!
//! The site builder only touches the disk through [`SiteFs`], so tests can
//! swap in an in-memory recorder.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

pub trait SiteFs {
    fn exists(&self, path: &Path) -> bool;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Copy every file under `src` into `dest`, keeping relative paths.
    /// Returns the number of files copied.
    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<usize>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl SiteFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to clear output directory: {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {}", path.display()))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<usize> {
        let mut copied = 0;
        for entry in WalkDir::new(src).min_depth(1) {
            let entry = entry.with_context(|| format!("Failed to read {}", src.display()))?;
            let rel = entry.path().strip_prefix(src)?;
            let target = dest.join(rel);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                self.create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
        Ok(copied)
    }
}
