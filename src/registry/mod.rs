//! HTTP client for package registry metadata.
//!
//! [`RegistryClient::fetch`] never fails: transport errors, error statuses and
//! unparseable bodies are logged and reported as missing metadata, exactly
//! like a package that does not exist.

pub mod pypi;

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::error::{LogLicenseError, Result};
use crate::models::{PackageMetadata, PackageRef};

const USER_AGENT: &str = concat!("loglicense/", env!("CARGO_PKG_VERSION"));

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pypi,
}

impl PackageManager {
    pub fn default_base_url(self) -> &'static str {
        match self {
            PackageManager::Pypi => pypi::DEFAULT_BASE_URL,
        }
    }
}

impl FromStr for PackageManager {
    type Err = LogLicenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pypi" => Ok(PackageManager::Pypi),
            other => Err(LogLicenseError::UnsupportedPackageManager(other.to_string())),
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageManager::Pypi => write!(f, "pypi"),
        }
    }
}

/// Connection settings for a [`RegistryClient`].
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Overrides the package manager's public endpoint (mirrors, tests).
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Query the exact release a manifest pins instead of the latest one.
    pub pin_versions: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(10),
            pin_versions: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    manager: PackageManager,
    base_url: String,
    pin_versions: bool,
}

impl RegistryClient {
    pub fn new(manager: PackageManager, settings: RegistrySettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(LogLicenseError::HttpClient)?;

        Ok(Self {
            http,
            manager,
            base_url: settings
                .base_url
                .unwrap_or_else(|| manager.default_base_url().to_string()),
            pin_versions: settings.pin_versions,
        })
    }

    pub fn package_manager(&self) -> PackageManager {
        self.manager
    }

    /// Fetch metadata for one package; `None` when it cannot be resolved.
    pub async fn fetch(&self, package: &PackageRef) -> Option<PackageMetadata> {
        let version = if self.pin_versions {
            package.version.as_deref()
        } else {
            None
        };

        let result = match self.manager {
            PackageManager::Pypi => {
                pypi::fetch_metadata(&self.http, &self.base_url, &package.name, version).await
            }
        };

        match result {
            Ok(meta) if meta.is_empty() => {
                warn!(%package, "{}: registry returned no metadata", package.name);
                None
            }
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!(%package, error = %e, "{}: error in fetching metadata", package.name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, pin_versions: bool) -> RegistryClient {
        RegistryClient::new(
            PackageManager::Pypi,
            RegistrySettings {
                base_url: Some(base_url.to_string()),
                pin_versions,
                ..RegistrySettings::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_only_pypi_is_supported() {
        assert_eq!("pypi".parse::<PackageManager>().unwrap(), PackageManager::Pypi);

        let err = "npm".parse::<PackageManager>().unwrap_err();
        assert!(matches!(err, LogLicenseError::UnsupportedPackageManager(ref m) if m == "npm"));
    }

    #[tokio::test]
    async fn test_failures_become_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky/json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"info": {}}"#, "application/json"))
            .mount(&server)
            .await;

        let client = client(&server.uri(), false);
        assert!(client.fetch(&PackageRef::new("flaky")).await.is_none());
        assert!(client.fetch(&PackageRef::new("empty")).await.is_none());
        assert!(client.fetch(&PackageRef::new("unmounted")).await.is_none());
    }

    #[tokio::test]
    async fn test_pinned_versions_use_release_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flask/2.0.1/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"info": {"name": "Flask", "license": "BSD-3-Clause"}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let pkg = PackageRef::with_version("flask", "2.0.1");
        let meta = client(&server.uri(), true).fetch(&pkg).await.unwrap();
        assert_eq!(meta.field("license"), "BSD-3-Clause");

        // without pinning, the latest endpoint is queried (and not mounted here)
        assert!(client(&server.uri(), false).fetch(&pkg).await.is_none());
    }
}
