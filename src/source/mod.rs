//! Inbound providers: the `latest.json` metadata endpoint and the tile tree.

use std::time::Duration;

use crate::foundation::error::{EarthwallError, EarthwallResult};

pub(crate) mod metadata;
pub(crate) mod tile;

/// Blocking HTTP client shared by both providers.
pub fn http_client(timeout: Duration) -> EarthwallResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("earthwall/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EarthwallError::config(format!("failed to build HTTP client: {e}")))
}
