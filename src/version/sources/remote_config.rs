//! Remote config source for latest and required versions
//!
//! Reads a flat JSON document of remote-config values such as:
//!
//! ```json
//! {
//!   "latest_version_ios": "2.4.0",
//!   "required_version_ios": "2.0.0",
//!   "latest_version_android": 2400,
//!   "required_version_android": 2000
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::version::error::SourceError;
use crate::version::source::RemoteVersionSource;
use crate::version::types::{Platform, RemoteVersions, VersionValue};

/// Remote version source backed by a remote-config JSON endpoint
pub struct RemoteConfigSource {
    client: reqwest::Client,
    url: String,
    platform: Platform,
}

impl RemoteConfigSource {
    pub fn new(url: &str, platform: Platform) -> Self {
        Self::with_timeout(url, platform, Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    pub fn with_timeout(url: &str, platform: Platform, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("update-checker")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
            platform,
        }
    }

    fn latest_key(&self) -> String {
        format!("latest_version_{}", self.platform.as_str())
    }

    fn required_key(&self) -> String {
        format!("required_version_{}", self.platform.as_str())
    }

    fn extract(
        values: &HashMap<String, Value>,
        key: &str,
    ) -> Result<Option<VersionValue>, SourceError> {
        match values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(VersionValue::Text(s.trim().to_string()))),
            Some(Value::Number(n)) => n.as_u64().map(VersionValue::Build).map(Some).ok_or_else(
                || SourceError::InvalidResponse(format!("{} is not a build number: {}", key, n)),
            ),
            Some(other) => Err(SourceError::InvalidResponse(format!(
                "{} has unexpected value: {}",
                key, other
            ))),
        }
    }
}

#[async_trait::async_trait]
impl RemoteVersionSource for RemoteConfigSource {
    async fn remote_versions(&self) -> Result<RemoteVersions, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Remote config returned status {}: {}", status, self.url);
            return Err(SourceError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let values: HashMap<String, Value> = response.json().await.map_err(|e| {
            warn!("Failed to parse remote config response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        let remote = RemoteVersions {
            latest: Self::extract(&values, &self.latest_key())?,
            required: Self::extract(&values, &self.required_key())?,
        };
        debug!("Remote versions for {}: {:?}", self.platform.as_str(), remote);

        Ok(remote)
    }
}

/// Turns every failure of the wrapped source into missing versions.
///
/// With missing versions the default comparator reports no update, so an
/// unreachable remote never blocks the user.
pub struct Lenient<R> {
    inner: R,
}

impl<R: RemoteVersionSource> Lenient<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl<R: RemoteVersionSource> RemoteVersionSource for Lenient<R> {
    async fn remote_versions(&self) -> Result<RemoteVersions, SourceError> {
        Ok(self.inner.remote_versions().await.unwrap_or_else(|e| {
            warn!("Ignoring remote version failure: {}", e);
            RemoteVersions::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::source::MockRemoteVersionSource;
    use mockito::Server;

    #[tokio::test]
    async fn remote_versions_reads_platform_keys() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "latest_version_ios": "2.4.0",
                    "required_version_ios": "2.0.0",
                    "latest_version_android": 2400,
                    "required_version_android": 2000
                }"#,
            )
            .expect(2)
            .create_async()
            .await;

        let url = format!("{}/config", server.url());
        let ios = RemoteConfigSource::new(&url, Platform::Ios)
            .remote_versions()
            .await
            .unwrap();
        let android = RemoteConfigSource::new(&url, Platform::Android)
            .remote_versions()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ios, RemoteVersions::new("2.4.0", "2.0.0"));
        assert_eq!(android, RemoteVersions::new(2400u64, 2000u64));
    }

    #[tokio::test]
    async fn remote_versions_treats_missing_and_empty_values_as_none() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"latest_version_desktop": ""}"#)
            .create_async()
            .await;

        let source = RemoteConfigSource::new(&format!("{}/config", server.url()), Platform::Desktop);
        let result = source.remote_versions().await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, RemoteVersions::default());
    }

    #[tokio::test]
    async fn remote_versions_returns_not_found_for_missing_document() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/config")
            .with_status(404)
            .create_async()
            .await;

        let source = RemoteConfigSource::new(&format!("{}/config", server.url()), Platform::Ios);
        let result = source.remote_versions().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn remote_versions_rejects_server_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/config")
            .with_status(503)
            .create_async()
            .await;

        let source = RemoteConfigSource::new(&format!("{}/config", server.url()), Platform::Ios);
        let result = source.remote_versions().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn remote_versions_rejects_non_version_values() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"latest_version_android": [1, 2]}"#)
            .create_async()
            .await;

        let source =
            RemoteConfigSource::new(&format!("{}/config", server.url()), Platform::Android);
        let result = source.remote_versions().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn lenient_turns_failures_into_missing_versions() {
        let mut inner = MockRemoteVersionSource::new();
        inner
            .expect_remote_versions()
            .times(1)
            .returning(|| Err(SourceError::Other("offline".to_string())));

        let result = Lenient::new(inner).remote_versions().await.unwrap();

        assert_eq!(result, RemoteVersions::default());
    }

    #[tokio::test]
    async fn lenient_passes_through_success() {
        let mut inner = MockRemoteVersionSource::new();
        inner
            .expect_remote_versions()
            .returning(|| Ok(RemoteVersions::new(4u64, 3u64)));

        let result = Lenient::new(inner).remote_versions().await.unwrap();

        assert_eq!(result, RemoteVersions::new(4u64, 3u64));
    }
}
