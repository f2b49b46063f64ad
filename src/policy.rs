use std::collections::BTreeSet;
use std::path::Path;

use configparser::ini::Ini;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LogLicenseError, Result};

/// INI section holding the policy.
pub const SECTION: &str = "loglicense";

/// License policy read from the `[loglicense]` section of an INI file.
///
/// ```ini
/// [loglicense]
/// allowed =
///     MIT,
///     BSD-3-Clause
/// banned = AGPL
/// validated = internal-package
/// coverage = 90
/// ```
///
/// Every entry is lower-cased and trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub allowed: BTreeSet<String>,
    pub banned: BTreeSet<String>,
    /// Package names accepted regardless of their license.
    pub validated: BTreeSet<String>,
    /// Minimum percentage of `Allowed` rows.
    pub coverage: Option<u8>,
}

impl Policy {
    pub fn is_validated(&self, package: &str) -> bool {
        self.validated.contains(&package.trim().to_lowercase())
    }
}

/// Load the policy from `path`.
///
/// A missing or invalid file yields an empty policy and a warning; it never
/// aborts a check.
pub fn load_policy(path: &Path) -> Policy {
    if !path.is_file() {
        warn!(path = %path.display(), "policy config not found, using an empty policy");
        return Policy::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|source| LogLicenseError::read(path, source))
        .and_then(|content| parse_policy(&content));

    match parsed {
        Ok(policy) => {
            debug!(?policy, path = %path.display(), "loaded policy");
            policy
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unusable policy config");
            Policy::default()
        }
    }
}

/// Parse INI text into a [`Policy`].
pub fn parse_policy(content: &str) -> Result<Policy> {
    let mut ini = Ini::new();
    ini.set_multiline(true);
    ini.read(content.to_string()).map_err(LogLicenseError::Policy)?;

    if !ini.sections().iter().any(|s| s == SECTION) {
        return Err(LogLicenseError::Policy(format!(
            "missing [{SECTION}] section"
        )));
    }

    let list = |keys: &[&str]| -> BTreeSet<String> {
        keys.iter()
            .filter_map(|key| ini.get(SECTION, key))
            .flat_map(|value| split_list(&value))
            .collect()
    };

    // A bad coverage value only disables the coverage gate; the lists still apply.
    let coverage = match ini.get(SECTION, "coverage") {
        Some(raw) if !raw.trim().is_empty() => match parse_coverage(&raw) {
            Ok(pct) => Some(pct),
            Err(e) => {
                warn!(error = %e, "ignoring coverage target");
                None
            }
        },
        _ => None,
    };

    Ok(Policy {
        allowed: list(&["allowed", "allow"]),
        banned: list(&["banned", "ban"]),
        validated: list(&["validated"]),
        coverage,
    })
}

/// Split a comma/newline separated value into normalized entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_coverage(raw: &str) -> Result<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or_else(|| {
            LogLicenseError::Policy(format!(
                "coverage must be an integer between 0 and 100, got `{}`",
                raw.trim()
            ))
        })
}
