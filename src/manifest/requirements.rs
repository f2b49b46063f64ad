use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{LogLicenseError, Result};
use crate::models::PackageRef;

/// Extracts the bare package name (and an exact `==` pin) from a PEP 508
/// requirement such as `requests[socks]>=2.0 ; python_version >= "3.8"`.
pub(super) struct RequirementParser {
    re: Regex,
}

impl RequirementParser {
    pub(super) fn new() -> std::result::Result<Self, regex::Error> {
        let re = Regex::new(
            r"^([A-Za-z0-9][A-Za-z0-9._\-]*)\s*(?:\[[^\]]*\])?\s*(?:(===|==|~=|!=|>=|<=|>|<)\s*([^\s;,#]+))?",
        )?;
        Ok(Self { re })
    }

    pub(super) fn parse_line(&self, line: &str) -> Option<PackageRef> {
        let line = strip_comment(line).trim();
        if line.is_empty() || line.starts_with('-') {
            return None;
        }
        // Bare VCS / archive URLs carry no usable name
        if line.contains("://") && !line.contains('@') {
            return None;
        }

        let caps = self.re.captures(line)?;
        let name = &caps[1];
        let pinned = match caps.get(2).map(|m| m.as_str()) {
            Some("==") | Some("===") => caps.get(3),
            _ => None,
        };

        Some(match pinned {
            Some(version) => PackageRef::with_version(name, version.as_str()),
            None => PackageRef::new(name),
        })
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Parse `requirements.txt`; with `include_dev`, also append the entries of
/// the sibling `requirements_dev.txt` when it exists.
pub fn parse(path: &Path, include_dev: bool) -> Result<Vec<PackageRef>> {
    let parser = RequirementParser::new().map_err(|e| LogLicenseError::parse(path, e))?;
    let mut deps = parse_file(&parser, path)?;

    if include_dev {
        let dev_path = dev_sibling(path);
        if dev_path.is_file() {
            deps.extend(parse_file(&parser, &dev_path)?);
        }
    }

    Ok(deps)
}

fn parse_file(parser: &RequirementParser, path: &Path) -> Result<Vec<PackageRef>> {
    let content = super::read(path)?;
    Ok(content.lines().filter_map(|l| parser.parse_line(l)).collect())
}

/// `requirements.txt` → `requirements_dev.txt`, next to the original.
fn dev_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("requirements");
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_dev.{ext}"),
        None => format!("{stem}_dev"),
    };
    path.with_file_name(file_name)
}
