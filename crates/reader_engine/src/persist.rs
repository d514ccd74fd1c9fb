use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory unusable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure `dir` exists and is a directory; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes whole files through a sibling temp file and a rename, so readers
/// never observe a partially written export.
#[derive(Debug, Clone, Default)]
pub struct AtomicFileWriter;

impl AtomicFileWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, target: &Path, content: &[u8]) -> Result<PathBuf, PersistError> {
        let dir = target.parent().unwrap_or_else(|| Path::new(""));
        ensure_output_dir(dir)?;

        let mut tmp = if dir.as_os_str().is_empty() {
            NamedTempFile::new_in(".")?
        } else {
            NamedTempFile::new_in(dir)?
        };
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Rename does not replace existing files on every platform.
        if target.exists() {
            fs::remove_file(target)?;
        }
        tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target.to_path_buf())
    }
}
