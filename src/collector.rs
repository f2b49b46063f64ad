use std::path::PathBuf;
use std::time::Duration;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::error::{LogLicenseError, Result};
use crate::license::classifier::licenses_from_classifiers;
use crate::manifest::ManifestKind;
use crate::models::{
    CollectionState, LicenseTable, PackageMetadata, PackageRef, ReportRow, NOT_FOUND,
};
use crate::registry::{PackageManager, RegistryClient, RegistrySettings};

/// Options for a [`LicenseCollector`] run.
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub package_manager: String,
    /// Registry fields to report; the first must be `name`.
    pub info_columns: Vec<String>,
    /// Include development dependencies.
    pub develop: bool,
    /// Maximum number of registry requests in flight.
    pub jobs: usize,
    pub registry: RegistrySettings,
    pub show_progress: bool,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            package_manager: "pypi".to_string(),
            info_columns: default_columns(),
            develop: false,
            jobs: 8,
            registry: RegistrySettings::default(),
            show_progress: false,
        }
    }
}

pub fn default_columns() -> Vec<String> {
    vec!["name".to_string(), "license".to_string()]
}

/// Resolves the requested metadata columns for every package of a manifest.
pub struct LicenseCollector {
    dependency_file: PathBuf,
    manifest: ManifestKind,
    registry: RegistryClient,
    columns: Vec<String>,
    develop: bool,
    jobs: usize,
    show_progress: bool,
    state: CollectionState,
}

impl LicenseCollector {
    /// Validate the inputs and build the registry client.
    ///
    /// Fails if `dependency_file` is not a regular file, is not a recognized
    /// manifest, names an unsupported package manager, or if the column list
    /// does not start with `name`.
    pub fn new(dependency_file: impl Into<PathBuf>, options: CollectorOptions) -> Result<Self> {
        let dependency_file = dependency_file.into();
        if !dependency_file.is_file() {
            return Err(LogLicenseError::NotAFile(dependency_file));
        }

        let manifest = ManifestKind::from_path(&dependency_file)?;
        let manager: PackageManager = options.package_manager.parse()?;

        let columns: Vec<String> = options
            .info_columns
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        if columns.first().map(String::as_str) != Some("name") {
            return Err(LogLicenseError::InvalidColumns(options.info_columns));
        }

        let registry = RegistryClient::new(manager, options.registry)?;

        Ok(Self {
            dependency_file,
            manifest,
            registry,
            columns,
            develop: options.develop,
            jobs: options.jobs.max(1),
            show_progress: options.show_progress,
            state: CollectionState::NotStarted,
        })
    }

    pub fn is_collected(&self) -> bool {
        self.state == CollectionState::Completed
    }

    /// Parse the manifest and look every package up in the registry.
    ///
    /// Rows keep manifest order; a package that cannot be resolved gets
    /// `Not found` in every column but `name`. A collector runs once.
    pub async fn collect(&mut self) -> Result<LicenseTable> {
        if self.is_collected() {
            return Err(LogLicenseError::AlreadyCollected(self.dependency_file.clone()));
        }

        let packages = self.manifest.parse(&self.dependency_file, self.develop)?;
        info!(
            manifest = %self.manifest,
            packages = packages.len(),
            registry = %self.registry.package_manager(),
            "collecting licenses"
        );

        let metadata = self.fetch_all(&packages).await;

        let rows = packages
            .iter()
            .zip(&metadata)
            .map(|(pkg, meta)| build_row(pkg, meta.as_ref(), &self.columns))
            .collect();

        self.state = CollectionState::Completed;

        Ok(LicenseTable {
            columns: self.columns.clone(),
            rows,
        })
    }

    async fn fetch_all(&self, packages: &[PackageRef]) -> Vec<Option<PackageMetadata>> {
        let pb = self.progress_bar(packages.len());
        let mut results = Vec::with_capacity(packages.len());

        for batch in packages.chunks(self.jobs) {
            let fetched = join_all(batch.iter().map(|pkg| self.registry.fetch(pkg))).await;
            if let Some(pb) = &pb {
                pb.inc(fetched.len() as u64);
            }
            results.extend(fetched);
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        debug!(
            resolved = results.iter().filter(|m| m.is_some()).count(),
            total = results.len(),
            "registry lookups finished"
        );
        results
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress || len == 0 {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Shape one report row from a package and its (possibly missing) metadata.
pub fn build_row(
    package: &PackageRef,
    metadata: Option<&PackageMetadata>,
    columns: &[String],
) -> ReportRow {
    let Some(meta) = metadata else {
        return std::iter::once(package.name.clone())
            .chain(std::iter::repeat(NOT_FOUND.to_string()).take(columns.len().saturating_sub(1)))
            .collect();
    };

    columns
        .iter()
        .map(|column| {
            let value = meta.field(column);
            match column.as_str() {
                "license" if value.trim().is_empty() => {
                    licenses_from_classifiers(meta.classifiers())
                }
                "name" if value.trim().is_empty() => package.name.clone(),
                _ => value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::Write;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOCK: &str = r#"
[[package]]
name = "alabaster"
version = "0.7.12"
description = "A configurable sidebar-enabled Sphinx theme"
category = "dev"
optional = false
python-versions = "*"

[[package]]
name = "atomicwrites"
version = "1.4.0"
description = "Atomic file writes."
category = "dev"
optional = false

[[package]]
name = "SOMETGINF"
version = "1.4.0"
description = "Atomic file writes."
category = "dev"
"#;

    fn meta(value: Value) -> PackageMetadata {
        match value {
            Value::Object(map) => PackageMetadata::from(map),
            _ => unreachable!(),
        }
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn write_lock(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("poetry.lock");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(LOCK.as_bytes()).unwrap();
        path
    }

    async fn mock_pypi() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alabaster/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "info": {
                    "name": "alabaster",
                    "license": "",
                    "classifiers": [
                        "Intended Audience :: Developers",
                        "License :: OSI Approved :: BSD License"
                    ]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/atomicwrites/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "info": { "name": "atomicwrites", "license": "MIT", "classifiers": [] }
            })))
            .mount(&server)
            .await;
        server
    }

    fn options(base_url: &str) -> CollectorOptions {
        CollectorOptions {
            develop: true,
            registry: RegistrySettings {
                base_url: Some(base_url.to_string()),
                ..RegistrySettings::default()
            },
            ..CollectorOptions::default()
        }
    }

    #[test]
    fn test_missing_metadata_row() {
        let row = build_row(
            &PackageRef::new("SOMETGINF"),
            None,
            &cols(&["name", "license", "version"]),
        );
        assert_eq!(row, vec!["SOMETGINF", "Not found", "Not found"]);
    }

    #[test]
    fn test_empty_license_falls_back_to_classifiers() {
        let meta = meta(json!({
            "name": "dual",
            "license": "   ",
            "classifiers": [
                "License :: OSI Approved :: Apache Software License",
                "License :: OSI Approved :: MIT License"
            ]
        }));
        let row = build_row(&PackageRef::new("dual"), Some(&meta), &cols(&["name", "license"]));
        assert_eq!(row, vec!["dual", "Apache Software License\nMIT License"]);
    }

    #[test]
    fn test_other_columns_are_read_verbatim() {
        let meta = meta(json!({ "license": "MIT", "version": "1.4.0" }));
        let row = build_row(
            &PackageRef::new("atomicwrites"),
            Some(&meta),
            &cols(&["name", "license", "version", "home_page"]),
        );
        assert_eq!(row, vec!["atomicwrites", "MIT", "1.4.0", ""]);
    }

    #[tokio::test]
    async fn test_collect_scenario() {
        let server = mock_pypi().await;
        let dir = TempDir::new().unwrap();
        let lock = write_lock(&dir);

        let mut collector = LicenseCollector::new(&lock, options(&server.uri())).unwrap();
        assert!(!collector.is_collected());

        let table = collector.collect().await.unwrap();
        assert!(collector.is_collected());
        assert!(matches!(
            collector.collect().await,
            Err(LogLicenseError::AlreadyCollected(_))
        ));
        assert_eq!(
            table.to_rows(),
            vec![
                vec!["Name", "License"],
                vec!["alabaster", "BSD License"],
                vec!["atomicwrites", "MIT"],
                vec!["SOMETGINF", "Not found"],
            ]
        );
    }

    #[tokio::test]
    async fn test_order_is_kept_with_single_job() {
        let server = mock_pypi().await;
        let dir = TempDir::new().unwrap();
        let lock = write_lock(&dir);

        let mut opts = options(&server.uri());
        opts.jobs = 1;
        let table = LicenseCollector::new(&lock, opts)
            .unwrap()
            .collect()
            .await
            .unwrap();
        let names: Vec<_> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["alabaster", "atomicwrites", "SOMETGINF"]);
    }

    #[tokio::test]
    async fn test_dev_packages_excluded_by_default() {
        let server = mock_pypi().await;
        let dir = TempDir::new().unwrap();
        let lock = write_lock(&dir);

        let mut opts = options(&server.uri());
        opts.develop = false;
        let table = LicenseCollector::new(&lock, opts)
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_setup_errors() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("poetry.lock");
        assert!(matches!(
            LicenseCollector::new(&missing, CollectorOptions::default()),
            Err(LogLicenseError::NotAFile(_))
        ));

        let lock = write_lock(&dir);
        let npm = CollectorOptions {
            package_manager: "npm".to_string(),
            ..CollectorOptions::default()
        };
        assert!(matches!(
            LicenseCollector::new(&lock, npm),
            Err(LogLicenseError::UnsupportedPackageManager(_))
        ));

        let bad_columns = CollectorOptions {
            info_columns: cols(&["license", "name"]),
            ..CollectorOptions::default()
        };
        assert!(matches!(
            LicenseCollector::new(&lock, bad_columns),
            Err(LogLicenseError::InvalidColumns(_))
        ));

        let other = dir.path().join("Pipfile");
        std::fs::write(&other, "").unwrap();
        assert!(matches!(
            LicenseCollector::new(&other, CollectorOptions::default()),
            Err(LogLicenseError::UnsupportedManifest { .. })
        ));
    }
}
