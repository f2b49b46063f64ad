use std::path::{Path, PathBuf};

use crate::error::{LogLicenseError, Result};
use crate::manifest::{recognized_names, ManifestKind};

/// Find the first recognized manifest in `dir`.
///
/// Checked in order: `poetry.lock`, `requirements.txt`, `pyproject.toml`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    ManifestKind::ALL
        .iter()
        .map(|kind| dir.join(kind.file_name()))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| LogLicenseError::NoManifestFound {
            dir: dir.to_path_buf(),
            expected: recognized_names(),
        })
}
