use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder written into every non-name column when a package has no
/// registry metadata.
pub const NOT_FOUND: &str = "Not found";

/// A dependency as declared in a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
    pub version: Option<String>,
}

impl PackageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

impl std::fmt::Display for PackageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The registry's `info` object for one package, kept loosely typed so any
/// field can be requested as a report column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageMetadata(Map<String, Value>);

impl PackageMetadata {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render a metadata field as report text.
    ///
    /// Missing and `null` fields become `""`, arrays are joined by newlines and
    /// any other non-string value is rendered as its JSON text.
    pub fn field(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Some(other) => other.to_string(),
        }
    }

    /// Trove classifiers, e.g. `License :: OSI Approved :: MIT License`.
    pub fn classifiers(&self) -> Vec<&str> {
        self.0
            .get("classifiers")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl From<Map<String, Value>> for PackageMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One row of resolved column values.
pub type ReportRow = Vec<String>;

/// The collected report: requested columns plus one row per package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseTable {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl LicenseTable {
    /// Capitalized column names, e.g. `["Name", "License"]`.
    pub fn header(&self) -> ReportRow {
        self.columns.iter().map(|c| capitalize(c)).collect()
    }

    /// Header row followed by every data row.
    pub fn to_rows(&self) -> Vec<ReportRow> {
        std::iter::once(self.header())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(column))
    }
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    Allowed,
    Banned,
    Unknown,
    ManuallyValidated,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Allowed => write!(f, "Allowed"),
            ValidationStatus::Banned => write!(f, "Banned"),
            ValidationStatus::Unknown => write!(f, "Unknown"),
            ValidationStatus::ManuallyValidated => write!(f, "Manually validated"),
        }
    }
}

/// Whether a collector has produced its table yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    NotStarted,
    Completed,
}
