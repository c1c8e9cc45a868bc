//! Fetch resources by URL.
//!
//! `file:` URLs short-circuit to the local path. Anything else is downloaded
//! into the [`ResourceCache`] on every call; the cache only fixes the name.

use crate::cache::ResourceCache;
use crate::error::ResolutionError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn user_agent() -> String {
    format!(
        "protoc-resolve/{} ({}; {}) reqwest",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

pub struct UrlFetchStrategy {
    client: Client,
    cache: ResourceCache,
}

impl UrlFetchStrategy {
    pub fn new(cache: ResourceCache) -> Result<Self, reqwest::Error> {
        Self::with_timeout(cache, DEFAULT_TIMEOUT)
    }

    /// `timeout` bounds connecting and each read.
    pub fn with_timeout(cache: ResourceCache, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self { client, cache })
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// `Ok(None)` means nothing lives at `url`; callers may try another source.
    pub fn fetch(&self, url: &Url, extension: &str) -> Result<Option<PathBuf>, ResolutionError> {
        if url.scheme().eq_ignore_ascii_case("file") {
            fetch_file_url(url)
        } else {
            self.fetch_remote(url, extension)
        }
    }

    fn fetch_remote(&self, url: &Url, extension: &str) -> Result<Option<PathBuf>, ResolutionError> {
        let target = self.cache.target_file(url, extension)?;
        let transport = |source: Box<dyn std::error::Error + Send + Sync>| ResolutionError::Transport {
            url: url.to_string(),
            destination: target.clone(),
            source,
        };

        debug!("Connecting to '{url}' to copy resources to '{}'", target.display());
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| transport(e.into()))?;

        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            debug!("Resource at {url} was not found");
            return Ok(None);
        }
        let mut response = response.error_for_status().map_err(|e| transport(e.into()))?;

        write_atomically(&target, &mut response).map_err(|e| transport(e.into()))?;
        info!("Copied {url} to {}", target.display());
        Ok(Some(target))
    }
}

fn fetch_file_url(url: &Url) -> Result<Option<PathBuf>, ResolutionError> {
    let path = url
        .to_file_path()
        .map_err(|()| ResolutionError::malformed(url.as_str(), "not a local file URL"))?;
    Ok(path.exists().then_some(path))
}

// Stream into a sibling temp file and rename it over `target` only once the
// body is fully written. A failed copy leaves nothing at `target`.
pub(crate) fn write_atomically(target: &Path, body: &mut impl io::Read) -> io::Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "cache path has no parent"))?;
    let staging = tempfile::Builder::new()
        .prefix(".download-")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(staging.as_file());
        io::copy(body, &mut writer)?;
        writer.flush()?;
    }
    staging.as_file().sync_all()?;
    staging.persist(target).map_err(|e| e.error)?;
    Ok(())
}
