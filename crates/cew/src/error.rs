//! Error taxonomy for unit transformations
//!
//! Every [`TransformError`] names the unit it belongs to. Component-level
//! errors carry no unit and are attached to one by the orchestrator.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Malformed Java source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

/// A constructor delegates to `this(...)`/`super(...)` and then runs more
/// statements; only whole bodies can be wrapped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "cannot (yet) handle constructor {constructor} with call to this or super with subsequent statements"
)]
pub struct UnsupportedDelegatingConstructor {
    pub constructor: String,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("cannot find source for {unit}")]
    SourceNotFound { unit: String },

    #[error("cannot read source for {unit} from {location}")]
    SourceRead {
        unit: String,
        location: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse source {unit}")]
    Syntax {
        unit: String,
        #[source]
        source: SyntaxError,
    },

    #[error("cannot transform {unit}")]
    UnsupportedDelegatingConstructor {
        unit: String,
        #[source]
        source: UnsupportedDelegatingConstructor,
    },

    #[error("cannot write file {} for {unit}", path.display())]
    Write {
        unit: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransformError {
    /// The unit identifier the error originated from
    pub fn unit(&self) -> &str {
        match self {
            Self::SourceNotFound { unit }
            | Self::SourceRead { unit, .. }
            | Self::Syntax { unit, .. }
            | Self::UnsupportedDelegatingConstructor { unit, .. }
            | Self::Write { unit, .. } => unit,
        }
    }
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
