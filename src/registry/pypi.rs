use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{LogLicenseError, Result};
use crate::models::PackageMetadata;

pub const DEFAULT_BASE_URL: &str = "https://pypi.org/pypi";

#[derive(Debug, Deserialize)]
struct PypiResponse {
    #[serde(default)]
    info: PackageMetadata,
}

/// `{base}/{name}/json`, or `{base}/{name}/{version}/json` for a pinned release.
pub fn package_url(base_url: &str, name: &str, version: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match version {
        Some(version) => format!("{}/{}/{}/json", base, name, version),
        None => format!("{}/{}/json", base, name),
    }
}

/// Fetch the `info` object of a PyPI package.
///
/// Any non-success status is an error, including 404.
pub async fn fetch_metadata(
    client: &Client,
    base_url: &str,
    name: &str,
    version: Option<&str>,
) -> Result<PackageMetadata> {
    let url = package_url(base_url, name, version);
    debug!(%url, "querying PyPI");

    let registry_err = |source| LogLicenseError::Registry {
        package: name.to_string(),
        source,
    };

    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(registry_err)?;

    let data: PypiResponse = response.json().await.map_err(registry_err)?;

    Ok(data.info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_package_url() {
        assert_eq!(
            package_url("https://pypi.org/pypi/", "flask", None),
            "https://pypi.org/pypi/flask/json"
        );
        assert_eq!(
            package_url("https://pypi.org/pypi", "flask", Some("2.0.1")),
            "https://pypi.org/pypi/flask/2.0.1/json"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_info_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/atomicwrites/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"info": {"name": "atomicwrites", "license": "MIT", "classifiers": []}, "releases": {}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let meta = fetch_metadata(&Client::new(), &server.uri(), "atomicwrites", None)
            .await
            .unwrap();
        assert_eq!(meta.field("license"), "MIT");
        assert_eq!(meta.field("name"), "atomicwrites");
    }

    #[tokio::test]
    async fn test_not_found_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/SOMETGINF/json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_metadata(&Client::new(), &server.uri(), "SOMETGINF", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LogLicenseError::Registry { ref package, .. } if package == "SOMETGINF"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
            .mount(&server)
            .await;

        assert!(fetch_metadata(&Client::new(), &server.uri(), "broken", None)
            .await
            .is_err());
    }
}
