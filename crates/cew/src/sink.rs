//! Destinations for generated sources

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::trace;
use thiserror::Error;

use crate::types::UnitId;

#[derive(Debug, Error)]
#[error("cannot write file {}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Receives the generated text of a unit
pub trait TextSink: Send + Sync + fmt::Debug {
    /// Store `text` as `output`, creating whatever grouping it needs
    fn write(&self, output: &UnitId, text: &str) -> Result<(), WriteError>;
}

/// Writes `<root>/<output>.java`, creating package directories on demand
#[derive(Debug, Clone)]
pub struct FolderSink {
    root: PathBuf,
}

impl FolderSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `output` ends up
    pub fn path_for(&self, output: &UnitId) -> PathBuf {
        self.root.join(output.relative_path())
    }
}

impl TextSink for FolderSink {
    fn write(&self, output: &UnitId, text: &str) -> Result<(), WriteError> {
        let path = self.path_for(output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        trace!("Writing {}", path.display());
        fs::write(&path, text).map_err(|source| WriteError { path, source })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_creates_package_directories() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FolderSink::new(temp_dir.path().join("out"));
        let output = UnitId::new("a/b/UncheckedC");

        sink.write(&output, "class UncheckedC {}\n").unwrap();

        let written = fs::read_to_string(temp_dir.path().join("out/a/b/UncheckedC.java")).unwrap();
        assert_eq!(written, "class UncheckedC {}\n");
    }

    #[test]
    fn test_write_failure_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        // A file where the package directory should go
        fs::write(temp_dir.path().join("a"), "").unwrap();
        let sink = FolderSink::new(temp_dir.path());

        let err = sink.write(&UnitId::new("a/C"), "class C {}").unwrap_err();
        assert_eq!(err.path, temp_dir.path().join("a"));
    }
}
