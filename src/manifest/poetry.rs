use std::path::Path;

use serde::Deserialize;

use crate::error::{LogLicenseError, Result};
use crate::models::PackageRef;

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Vec<PoetryLockPackage>,
}

/// `category` is mandatory: a lock file without it is rejected rather than
/// silently treated as main or dev.
#[derive(Debug, Deserialize)]
struct PoetryLockPackage {
    name: String,
    version: Option<String>,
    category: String,
}

/// Parse `poetry.lock`: `main` packages always, `dev` packages on request.
pub fn parse(path: &Path, include_dev: bool) -> Result<Vec<PackageRef>> {
    let content = super::read(path)?;
    parse_str(&content, include_dev).map_err(|e| LogLicenseError::parse(path, e))
}

fn parse_str(content: &str, include_dev: bool) -> std::result::Result<Vec<PackageRef>, toml::de::Error> {
    let lock: PoetryLock = toml::from_str(content)?;

    let packages = lock
        .package
        .into_iter()
        .filter(|p| match p.category.as_str() {
            "main" => true,
            "dev" => include_dev,
            _ => false,
        })
        .map(|p| PackageRef {
            name: p.name,
            version: p.version,
        })
        .collect();

    Ok(packages)
}
