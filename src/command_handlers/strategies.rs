use crate::config::ResolveConfig;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use protoc_resolve::cache::{DirectoryTemporarySpace, ResourceCache};
use protoc_resolve::platform::HostEnvironment;
use protoc_resolve::repository::{MavenRepositoryClient, RepositoryFetchStrategy};
use protoc_resolve::resolver::Strategies;
use protoc_resolve::url_fetch::UrlFetchStrategy;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Wire the live host, cache and repository client from config.
pub fn build(cfg: &ResolveConfig) -> Result<Strategies> {
    let host = HostEnvironment::live()?;
    let cache_root = cfg.cache_root();
    let local_repo = cfg.local_repository();
    debug!(
        cache = %cache_root.display(),
        repository = %local_repo.display(),
        "building resolution strategies"
    );

    let cache = ResourceCache::new(DirectoryTemporarySpace::new(cache_root));
    let urls = UrlFetchStrategy::with_timeout(cache, cfg.timeout())
        .context("creating HTTP client")?;
    let client = MavenRepositoryClient::new(local_repo, cfg.remotes(), cfg.timeout())
        .context("creating repository client")?;
    let repository = RepositoryFetchStrategy::new(client, host.clone());

    Ok(Strategies {
        host,
        urls: Arc::new(urls),
        repository: Arc::new(repository),
    })
}

pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
