//! Classifies each (package, license) pair of a [`LicenseTable`] against a
//! [`Policy`] and turns the result into a pass/fail gate.

use serde::Serialize;
use tracing::debug;

use crate::error::{LogLicenseError, Result};
use crate::license::matcher::is_near_match;
use crate::models::{LicenseTable, ReportRow, ValidationStatus};
use crate::policy::Policy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRow {
    pub name: String,
    pub license: String,
    pub status: ValidationStatus,
}

impl ValidatedRow {
    fn new(name: &str, license: &str, status: ValidationStatus) -> Self {
        Self {
            name: name.to_string(),
            license: license.to_string(),
            status,
        }
    }

    pub fn to_row(&self) -> ReportRow {
        vec![
            self.name.clone(),
            self.license.clone(),
            self.status.to_string(),
        ]
    }
}

/// Outcome of a check, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gate {
    Passed,
    /// At least one license is banned.
    PolicyViolation,
    /// Coverage is below the configured target.
    CoverageShortfall,
}

impl Gate {
    pub fn exit_code(self) -> i32 {
        match self {
            Gate::Passed => 0,
            Gate::PolicyViolation => 1,
            Gate::CoverageShortfall => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rows: Vec<ValidatedRow>,
}

impl ValidationReport {
    pub fn header() -> ReportRow {
        vec!["Name".into(), "License".into(), "Status".into()]
    }

    /// Header row followed by every classified row.
    pub fn to_rows(&self) -> Vec<ReportRow> {
        std::iter::once(Self::header())
            .chain(self.rows.iter().map(ValidatedRow::to_row))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn count(&self, status: ValidationStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    pub fn has_banned(&self) -> bool {
        self.rows.iter().any(|r| r.status == ValidationStatus::Banned)
    }

    /// Percentage of `Allowed` rows, rounded down; 100 when there are none.
    pub fn coverage(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 100;
        }
        (self.count(ValidationStatus::Allowed) * 100 / total) as u8
    }

    /// Banned rows fail regardless of coverage.
    pub fn gate(&self, coverage_target: Option<u8>) -> Gate {
        if self.has_banned() {
            return Gate::PolicyViolation;
        }
        match coverage_target {
            Some(target) if self.coverage() < target => Gate::CoverageShortfall,
            _ => Gate::Passed,
        }
    }
}

/// Classify every license of `table` against `policy`.
///
/// A multi-line license value yields one row per line. For each line:
///
/// 1. a package listed in `validated` is `ManuallyValidated` and reported with
///    its full license list (comma-joined), once per line;
/// 2. a near match in `banned` is `Banned`;
/// 3. with a non-empty `allowed`, a near match is `Allowed`, otherwise
///    `Unknown`;
/// 4. without an allow list everything left is `Allowed`.
pub fn validate(table: &LicenseTable, policy: &Policy) -> Result<ValidationReport> {
    let name_idx = table.column_index("name").unwrap_or(0);
    let license_idx = table
        .column_index("license")
        .ok_or(LogLicenseError::MissingLicenseColumn)?;

    let mut rows = Vec::new();
    for row in &table.rows {
        let name = row.get(name_idx).map(String::as_str).unwrap_or_default();
        let license = row.get(license_idx).map(String::as_str).unwrap_or_default();

        for sub_license in license.split('\n') {
            if policy.is_validated(name) {
                let joined = license.split('\n').collect::<Vec<_>>().join(", ");
                rows.push(ValidatedRow::new(name, &joined, ValidationStatus::ManuallyValidated));
                continue;
            }

            let status = classify(sub_license, policy);
            debug!(package = name, license = sub_license, %status, "classified");
            rows.push(ValidatedRow::new(name, sub_license, status));
        }
    }

    Ok(ValidationReport { rows })
}

fn classify(license: &str, policy: &Policy) -> ValidationStatus {
    if is_near_match(license, &policy.banned) {
        return ValidationStatus::Banned;
    }
    if policy.allowed.is_empty() {
        return ValidationStatus::Allowed;
    }
    if is_near_match(license, &policy.allowed) {
        ValidationStatus::Allowed
    } else {
        ValidationStatus::Unknown
    }
}
