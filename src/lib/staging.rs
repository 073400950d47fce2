//! Complete-or-absent outputs.
//!
//! Every file seedgrow produces is first written to a temporary file next to its
//! destination and renamed into place only once it has been fully written. Per-iteration
//! directories follow the same rule: work happens in a staging directory that is renamed
//! to its final name when the iteration's own outputs are complete. Dropping an
//! [`AtomicFile`] without committing it removes the temporary file.

use anyhow::{Context, Result};
use log::warn;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A file that only appears at its destination once [`AtomicFile::commit`] succeeds.
#[derive(Debug)]
pub struct AtomicFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl AtomicFile {
    /// Creates a temporary file in the destination's directory.
    ///
    /// # Errors
    /// Returns an error if the temporary file cannot be created.
    pub fn create<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!(
            ".{}.",
            destination.file_name().map_or_else(|| "output".into(), |n| n.to_string_lossy())
        );

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&parent)
            .with_context(|| {
                format!("Failed to create temporary file for: {}", destination.display())
            })?;

        Ok(Self { temp, destination })
    }

    /// The final path of this file.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// A handle for writing to the temporary file.
    ///
    /// # Errors
    /// Returns an error if the handle cannot be duplicated.
    pub fn file(&self) -> Result<File> {
        self.temp.as_file().try_clone().with_context(|| {
            format!("Failed to open temporary file for: {}", self.destination.display())
        })
    }

    /// Syncs the temporary file and renames it to its destination, replacing any
    /// existing file.
    ///
    /// # Errors
    /// Returns an error if syncing or renaming fails.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { temp, destination } = self;
        temp.as_file()
            .sync_all()
            .with_context(|| format!("Failed to sync output: {}", destination.display()))?;
        temp.persist(&destination)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move output into place: {}", destination.display()))?;
        Ok(destination)
    }
}

/// Prepares an empty staging directory, removing leftovers from an interrupted run.
///
/// # Errors
/// Returns an error if the directory cannot be removed or created.
pub fn prepare_staging_dir<P: AsRef<Path>>(staging: P) -> Result<()> {
    let staging = staging.as_ref();
    if staging.exists() {
        warn!("Removing stale staging directory: {}", staging.display());
        fs::remove_dir_all(staging)
            .with_context(|| format!("Failed to remove: {}", staging.display()))?;
    }
    fs::create_dir_all(staging)
        .with_context(|| format!("Failed to create directory: {}", staging.display()))
}

/// Renames a staging directory to its final name, replacing an existing directory
/// from a previous run.
///
/// # Errors
/// Returns an error if the existing directory cannot be removed or the rename fails.
pub fn promote_dir<P: AsRef<Path>, Q: AsRef<Path>>(staging: P, destination: Q) -> Result<()> {
    let (staging, destination) = (staging.as_ref(), destination.as_ref());
    if destination.exists() {
        warn!("Replacing output from a previous run: {}", destination.display());
        fs::remove_dir_all(destination)
            .with_context(|| format!("Failed to remove: {}", destination.display()))?;
    }
    fs::rename(staging, destination).with_context(|| {
        format!("Failed to rename {} to {}", staging.display(), destination.display())
    })
}
