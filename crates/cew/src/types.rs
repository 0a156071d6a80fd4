//! Shared type definitions for the cew crate

use std::{fmt, path::PathBuf};

/// File extension of Java sources
pub const JAVA_EXTENSION: &str = ".java";

/// Slash-separated identifier of a source unit, e.g. `java/io/Reader`
///
/// The identifier doubles as the lookup key inside source archives and as
/// the relative output path, so it is never converted to a dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package path including the trailing slash, or `""` for the default package
    pub fn package_path(&self) -> &str {
        self.0.rfind('/').map_or("", |idx| &self.0[..=idx])
    }

    /// The class name without its package
    pub fn simple_name(&self) -> &str {
        self.0.rfind('/').map_or(self.0.as_str(), |idx| &self.0[idx + 1..])
    }

    /// Same package, different simple name
    pub fn with_simple_name(&self, simple_name: &str) -> Self {
        Self(format!("{}{simple_name}", self.package_path()))
    }

    /// `<id>.java`, the entry name inside archives and directories
    pub fn file_name(&self) -> String {
        format!("{}{JAVA_EXTENSION}", self.0)
    }

    /// Relative file path of the unit's source
    pub fn relative_path(&self) -> PathBuf {
        self.file_name().split('/').collect()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UnitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_package_and_simple_name() {
        let unit = UnitId::new("java/io/Reader");
        assert_eq!(unit.package_path(), "java/io/");
        assert_eq!(unit.simple_name(), "Reader");
        assert_eq!(unit.with_simple_name("UncheckedReader").as_str(), "java/io/UncheckedReader");
    }

    #[test]
    fn test_default_package() {
        let unit = UnitId::new("Reader");
        assert_eq!(unit.package_path(), "");
        assert_eq!(unit.simple_name(), "Reader");
        assert_eq!(unit.with_simple_name("R2").as_str(), "R2");
    }

    #[test]
    fn test_file_name_and_path() {
        let unit = UnitId::new("a/b/C");
        assert_eq!(unit.file_name(), "a/b/C.java");
        assert_eq!(unit.relative_path(), Path::new("a").join("b").join("C.java"));
    }
}
