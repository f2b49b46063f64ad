//! Dependency manifest parsers.
//!
//! Each recognized file name maps to exactly one [`ManifestKind`]:
//! `poetry.lock`, `requirements.txt` and `pyproject.toml`.

use std::path::Path;

use crate::error::{LogLicenseError, Result};
use crate::models::PackageRef;

pub mod poetry;
pub mod pyproject;
pub mod requirements;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PoetryLock,
    RequirementsTxt,
    PyprojectToml,
}

impl ManifestKind {
    /// Recognized manifests, in directory-discovery priority order.
    pub const ALL: [ManifestKind; 3] = [
        ManifestKind::PoetryLock,
        ManifestKind::RequirementsTxt,
        ManifestKind::PyprojectToml,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ManifestKind::PoetryLock => "poetry.lock",
            ManifestKind::RequirementsTxt => "requirements.txt",
            ManifestKind::PyprojectToml => "pyproject.toml",
        }
    }

    /// Exact, case-sensitive file name lookup.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Self::from_file_name(name).ok_or_else(|| LogLicenseError::UnsupportedManifest {
            name: name.to_string(),
            expected: recognized_names(),
        })
    }

    /// Parse the manifest at `path`, keeping file order and duplicates.
    pub fn parse(self, path: &Path, include_dev: bool) -> Result<Vec<PackageRef>> {
        match self {
            ManifestKind::PoetryLock => poetry::parse(path, include_dev),
            ManifestKind::RequirementsTxt => requirements::parse(path, include_dev),
            ManifestKind::PyprojectToml => pyproject::parse(path, include_dev),
        }
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

pub fn recognized_names() -> String {
    ManifestKind::ALL
        .iter()
        .map(|kind| kind.file_name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LogLicenseError::read(path, source))
}
