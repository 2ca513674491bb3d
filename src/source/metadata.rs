use anyhow::Context as _;

use crate::foundation::error::{EarthwallError, EarthwallResult};

/// Source of the newest available image date.
///
/// Implementations return the raw date string exactly as published; parsing and freshness
/// decisions belong to the caller.
pub trait MetadataSource: Send + Sync {
    fn latest_date(&self) -> EarthwallResult<String>;
}

/// Payload of the provider's `latest.json`.
///
/// Example: `{"date": "2026-01-11 16:10:00", "file": "PI_H09_20260111_1610_TRC_FLDK.png"}`
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct LatestImageInfo {
    /// Missing in the payload deserializes to `""`, which later fails timestamp parsing.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub file: String,
}

impl LatestImageInfo {
    pub fn from_slice(bytes: &[u8]) -> EarthwallResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| EarthwallError::metadata(format!("decode latest image info: {e}")))
    }
}

/// `latest.json` over HTTP.
pub struct HttpMetadataSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpMetadataSource {
    pub fn new(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl MetadataSource for HttpMetadataSource {
    fn latest_date(&self) -> EarthwallResult<String> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .with_context(|| format!("GET {}", self.url))?;
        let info = LatestImageInfo::from_slice(&body)?;
        tracing::info!(date = %info.date, file = %info.file, "latest image info");
        Ok(info.date)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/metadata.rs"]
mod tests;
