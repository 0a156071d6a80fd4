//! Source lookup
//!
//! A unit's text is looked up in an ordered chain of locations: configured
//! source archives and directories first, then the JDK's `src.zip`. The
//! first location holding `<unit>.java` wins.

use std::{
    fmt,
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use log::{debug, trace, warn};
use thiserror::Error;
use zip::{ZipArchive, result::ZipError};

use crate::types::UnitId;

/// Archive names probed below a JDK home, in order
const JDK_SOURCE_ARCHIVES: [&str; 2] = ["src.zip", "lib/src.zip"];

/// A location exists but could not be read
#[derive(Debug, Error)]
#[error("cannot read {entry} in {}", location.display())]
pub struct SourceReadError {
    pub location: PathBuf,
    pub entry: String,
    #[source]
    pub source: io::Error,
}

/// Provides the source text of units
pub trait TextSource: Send + Sync + fmt::Debug {
    /// The unit's text, or `None` when this source does not have it
    fn read(&self, unit: &UnitId) -> Result<Option<String>, SourceReadError>;
}

/// Looks units up as files below a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextSource for DirectorySource {
    fn read(&self, unit: &UnitId) -> Result<Option<String>, SourceReadError> {
        let path = self.root.join(unit.relative_path());
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceReadError {
                location: self.root.clone(),
                entry: unit.file_name(),
                source,
            }),
        }
    }
}

/// Looks units up as entries of a zip archive (source jars, `src.zip`).
///
/// The archive is opened on first use and its central directory is kept for
/// later lookups. A failed open is retried on the next lookup.
pub struct ArchiveSource {
    path: PathBuf,
    archive: Mutex<Option<ZipArchive<File>>>,
}

impl fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ArchiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            archive: Mutex::new(None),
        }
    }

    fn open(&self) -> io::Result<ZipArchive<File>> {
        debug!("Opening source archive {}", self.path.display());
        let file = File::open(&self.path)?;
        ZipArchive::new(file).map_err(io::Error::other)
    }

    fn read_error(&self, unit: &UnitId, source: io::Error) -> SourceReadError {
        SourceReadError {
            location: self.path.clone(),
            entry: unit.file_name(),
            source,
        }
    }
}

impl TextSource for ArchiveSource {
    fn read(&self, unit: &UnitId) -> Result<Option<String>, SourceReadError> {
        let mut guard = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let archive = match guard.take() {
            Some(archive) => archive,
            None => self.open().map_err(|err| self.read_error(unit, err))?,
        };
        let archive = guard.insert(archive);

        let mut entry = match archive.by_name(&unit.file_name()) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(self.read_error(unit, io::Error::other(err))),
        };

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|err| self.read_error(unit, err))?;
        Ok(Some(text))
    }
}

/// Queries sources in order; the first one holding the unit wins
#[derive(Debug, Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn TextSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from paths, treating directories as source roots and
    /// everything else as a zip archive
    pub fn from_locations<P: AsRef<Path>>(locations: &[P]) -> Self {
        let mut chain = Self::new();
        for location in locations {
            let location = location.as_ref();
            if !location.exists() {
                warn!(
                    "Source location {} does not exist; every lookup through it will fail",
                    location.display()
                );
            }
            chain.push(open_location(location));
        }
        chain
    }

    pub fn push(&mut self, source: Box<dyn TextSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl TextSource for SourceChain {
    fn read(&self, unit: &UnitId) -> Result<Option<String>, SourceReadError> {
        for source in &self.sources {
            trace!("Looking for {unit} in {source:?}");
            if let Some(text) = source.read(unit)? {
                debug!("Found {unit} in {source:?}");
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

/// Open a single location as a text source
pub fn open_location(path: &Path) -> Box<dyn TextSource> {
    if path.is_dir() {
        Box::new(DirectorySource::new(path))
    } else {
        Box::new(ArchiveSource::new(path))
    }
}

/// Source archives shipped with the JDK at `jdk_home`, existing ones only
pub fn jdk_source_archives(jdk_home: &Path) -> Vec<PathBuf> {
    JDK_SOURCE_ARCHIVES
        .iter()
        .map(|relative| jdk_home.join(relative))
        .filter(|archive| archive.is_file())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use zip::{ZipWriter, write::SimpleFileOptions};

    use super::*;

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_directory_source() {
        let temp_dir = TempDir::new().unwrap();
        let package = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("C.java"), "class C {}").unwrap();

        let source = DirectorySource::new(temp_dir.path());
        assert_eq!(
            source.read(&UnitId::new("a/b/C")).unwrap(),
            Some("class C {}".to_owned())
        );
        assert_eq!(source.read(&UnitId::new("a/b/D")).unwrap(), None);
    }

    #[test]
    fn test_archive_source() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("sources.jar");
        write_archive(&archive, &[("a/C.java", "class C {}")]);

        let source = ArchiveSource::new(&archive);
        assert_eq!(
            source.read(&UnitId::new("a/C")).unwrap(),
            Some("class C {}".to_owned())
        );
        assert_eq!(source.read(&UnitId::new("a/Missing")).unwrap(), None);
    }

    #[test]
    fn test_unreadable_archive_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.zip");
        fs::write(&archive, "not a zip").unwrap();

        let err = ArchiveSource::new(&archive)
            .read(&UnitId::new("a/C"))
            .unwrap_err();
        assert_eq!(err.location, archive);
        assert_eq!(err.entry, "a/C.java");
    }

    #[test]
    fn test_archive_is_opened_once() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("sources.jar");
        write_archive(&archive, &[("a/C.java", "class C {}"), ("a/D.java", "class D {}")]);

        let source = ArchiveSource::new(&archive);
        assert!(source.read(&UnitId::new("a/C")).unwrap().is_some());

        // Later lookups go through the handle opened by the first one
        fs::remove_file(&archive).unwrap();
        assert_eq!(
            source.read(&UnitId::new("a/D")).unwrap(),
            Some("class D {}".to_owned())
        );
    }

    #[test]
    fn test_missing_location_fails_lookups() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.jar");

        let chain = SourceChain::from_locations(&[&missing]);
        let err = chain.read(&UnitId::new("a/C")).unwrap_err();
        assert_eq!(err.location, missing);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_chain_first_match_wins() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.zip");
        let second = temp_dir.path().join("second");
        write_archive(&first, &[("a/C.java", "class First {}")]);
        fs::create_dir_all(second.join("a")).unwrap();
        fs::write(second.join("a").join("C.java"), "class Second {}").unwrap();
        fs::write(second.join("a").join("D.java"), "class D {}").unwrap();

        let chain = SourceChain::from_locations(&[&first, &second]);
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.read(&UnitId::new("a/C")).unwrap(),
            Some("class First {}".to_owned())
        );
        assert_eq!(
            chain.read(&UnitId::new("a/D")).unwrap(),
            Some("class D {}".to_owned())
        );
        assert_eq!(chain.read(&UnitId::new("a/E")).unwrap(), None);
    }

    #[test]
    fn test_jdk_source_archives() {
        let temp_dir = TempDir::new().unwrap();
        assert!(jdk_source_archives(temp_dir.path()).is_empty());

        fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
        write_archive(&temp_dir.path().join("lib").join("src.zip"), &[]);
        assert_eq!(
            jdk_source_archives(temp_dir.path()),
            vec![temp_dir.path().join("lib/src.zip")]
        );
    }
}
