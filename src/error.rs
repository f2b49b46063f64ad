//! Error types shared by the manifest parsers, registry client and validator.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for fallible `loglicense` operations.
pub type Result<T> = std::result::Result<T, LogLicenseError>;

#[derive(Error, Debug)]
pub enum LogLicenseError {
    #[error("dependency file {} does not exist or is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("unsupported dependency file `{name}` (expected one of: {expected})")]
    UnsupportedManifest { name: String, expected: String },

    #[error("no dependency file found in {} (looked for: {expected})", .dir.display())]
    NoManifestFound { dir: PathBuf, expected: String },

    #[error("package manager `{0}` is not supported (only `pypi` is available)")]
    UnsupportedPackageManager(String),

    #[error("info columns must start with `name`, got {0:?}")]
    InvalidColumns(Vec<String>),

    #[error("licenses for {} were already collected", .0.display())]
    AlreadyCollected(PathBuf),

    #[error("license table has no `license` column")]
    MissingLicenseColumn,

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    ParseManifest { path: PathBuf, message: String },

    #[error("invalid policy config: {0}")]
    Policy(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("registry lookup for `{package}` failed: {source}")]
    Registry {
        package: String,
        #[source]
        source: reqwest::Error,
    },
}

impl LogLicenseError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ParseManifest {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
