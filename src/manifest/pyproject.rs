use std::path::Path;

use toml::Value;

use super::requirements::RequirementParser;
use crate::error::{LogLicenseError, Result};
use crate::models::PackageRef;

/// Parse `pyproject.toml`.
///
/// A `[tool.poetry.dependencies]` table wins when present (minus the `python`
/// pseudo-dependency); dev tables are merged in with `include_dev`. Otherwise
/// the PEP 621 `[project].dependencies` list is used, plus every
/// `[project.optional-dependencies]` group with `include_dev`.
pub fn parse(path: &Path, include_dev: bool) -> Result<Vec<PackageRef>> {
    let content = super::read(path)?;
    let root: Value = toml::from_str(&content).map_err(|e| LogLicenseError::parse(path, e))?;
    let parser = RequirementParser::new().map_err(|e| LogLicenseError::parse(path, e))?;

    Ok(from_document(&root, &parser, include_dev))
}

fn from_document(root: &Value, parser: &RequirementParser, include_dev: bool) -> Vec<PackageRef> {
    let poetry = root.get("tool").and_then(|t| t.get("poetry"));

    if let Some(main) = poetry
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_table)
    {
        let mut deps = poetry_table(main);

        if include_dev {
            let poetry = poetry.and_then(Value::as_table);
            if let Some(dev) = poetry
                .and_then(|p| p.get("dev-dependencies"))
                .and_then(Value::as_table)
            {
                deps.extend(poetry_table(dev));
            }
            if let Some(groups) = poetry
                .and_then(|p| p.get("group"))
                .and_then(Value::as_table)
            {
                for group in groups.values() {
                    if let Some(table) = group.get("dependencies").and_then(Value::as_table) {
                        deps.extend(poetry_table(table));
                    }
                }
            }
        }

        return deps;
    }

    let project = root.get("project");
    let mut deps: Vec<PackageRef> = project
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_array)
        .map(|items| pep508_list(items, parser))
        .unwrap_or_default();

    if include_dev {
        if let Some(groups) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(Value::as_table)
        {
            for items in groups.values().filter_map(Value::as_array) {
                deps.extend(pep508_list(items, parser));
            }
        }
    }

    deps
}

fn poetry_table(table: &toml::map::Map<String, Value>) -> Vec<PackageRef> {
    table
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("python"))
        .map(|(name, spec)| PackageRef {
            name: name.clone(),
            version: exact_poetry_version(spec),
        })
        .collect()
}

/// Poetry treats a bare `"1.2.3"` (or `"==1.2.3"`) as an exact pin.
fn exact_poetry_version(spec: &Value) -> Option<String> {
    let raw = match spec {
        Value::String(s) => s.as_str(),
        Value::Table(t) => t.get("version").and_then(Value::as_str)?,
        _ => return None,
    };
    let raw = raw.trim().trim_start_matches("==").trim();
    let pinned = !raw.is_empty()
        && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
        && raw.starts_with(|c: char| c.is_ascii_digit());
    pinned.then(|| raw.to_string())
}

fn pep508_list(items: &[Value], parser: &RequirementParser) -> Vec<PackageRef> {
    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| parser.parse_line(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(content: &str, include_dev: bool) -> Vec<String> {
        let root: Value = toml::from_str(content).unwrap();
        let parser = RequirementParser::new().unwrap();
        from_document(&root, &parser, include_dev)
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    const POETRY: &str = r#"
[tool.poetry]
name = "demo"

[tool.poetry.dependencies]
python = "^3.8"
typer = "^0.4.0"
tabulate = { version = "0.8.9", optional = true }

[tool.poetry.dev-dependencies]
pytest = "^6.2.4"

[tool.poetry.group.docs.dependencies]
sphinx = "^4.0"
"#;

    #[test]
    fn test_poetry_tables_skip_python() {
        assert_eq!(names(POETRY, false), vec!["typer", "tabulate"]);
        assert_eq!(
            names(POETRY, true),
            vec!["typer", "tabulate", "pytest", "sphinx"]
        );
    }

    #[test]
    fn test_poetry_exact_versions() {
        let root: Value = toml::from_str(POETRY).unwrap();
        let parser = RequirementParser::new().unwrap();
        let deps = from_document(&root, &parser, false);
        assert_eq!(deps[0].version, None);
        assert_eq!(deps[1].version.as_deref(), Some("0.8.9"));
    }

    #[test]
    fn test_pep621_with_optional_groups() {
        let content = r#"
[project]
name = "demo"
dependencies = ["requests>=2.0", "click==8.1.3"]

[project.optional-dependencies]
test = ["pytest", "coverage[toml]>=6"]
docs = ["sphinx"]
"#;
        assert_eq!(names(content, false), vec!["requests", "click"]);
        assert_eq!(
            names(content, true),
            vec!["requests", "click", "pytest", "coverage", "sphinx"]
        );
    }

    #[test]
    fn test_no_dependency_tables() {
        assert!(names("[build-system]\nrequires = [\"setuptools\"]", true).is_empty());
    }
}
