// src/version.rs

//! Release check against a published version manifest.
//!
//! The supervisor consults this at most once per calendar day. Failures are
//! logged by the caller and never stop the loop.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shape of the manifest served at the configured `version_url`.
#[derive(Debug, Deserialize)]
struct VersionManifest {
    version: String,
}

/// Once-a-day update check against a JSON endpoint.
pub struct UpdateChecker {
    url: String,
    client: reqwest::Client,
}

impl UpdateChecker {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building http client for version check")?;
        Ok(Self { url, client })
    }

    /// Fetch the published version and compare against this build.
    pub async fn check(&self) -> Result<()> {
        let manifest: VersionManifest = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("requesting version manifest")?
            .error_for_status()
            .context("version endpoint returned an error status")?
            .json()
            .await
            .context("decoding version manifest")?;

        let current = env!("CARGO_PKG_VERSION");
        if is_newer(&manifest.version, current) {
            info!(
                current,
                published = %manifest.version,
                "A newer release is available"
            );
        } else {
            debug!(
                current,
                published = %manifest.version,
                "Running the latest release"
            );
        }
        Ok(())
    }
}

/// Numeric dotted-version comparison. Missing segments count as 0 and
/// non-numeric segments compare as 0, so a malformed manifest never reports
/// a spurious upgrade over a well-formed local version.
pub fn is_newer(published: &str, current: &str) -> bool {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| part.parse::<u64>().unwrap_or(0))
            .collect()
    };

    let published = parse(published);
    let current = parse(current);
    let len = published.len().max(current.len());

    for i in 0..len {
        let p = published.get(i).copied().unwrap_or(0);
        let c = current.get(i).copied().unwrap_or(0);
        if p != c {
            return p > c;
        }
    }
    false
}
