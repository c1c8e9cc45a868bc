use anyhow::{Context, Result};
use protoc_resolve::cache::DirectoryTemporarySpace;
use protoc_resolve::repository::{MavenRepositoryClient, MAVEN_CENTRAL};
use protoc_resolve::url_fetch::DEFAULT_TIMEOUT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG: &str = "protoc-resolve.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    pub protoc: ProtocSection,
    pub cache: CacheSection,
    pub repository: RepositorySection,
    pub network: NetworkSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocSection {
    /// Version looked up in the repository.
    pub version: Option<String>,
    /// Remote or `file:` URL.
    pub url: Option<String>,
    pub path: Option<PathBuf>,
    /// Also search PATH for `protoc`.
    pub system_path: bool,
    /// Suffix for files downloaded from `url`.
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositorySection {
    pub local: Option<PathBuf>,
    pub remotes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSection {
    pub timeout_secs: Option<u64>,
}

impl ResolveConfig {
    /// A missing file is not an error; every setting has a default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs_err::read_to_string(path)?;
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn cache_root(&self) -> PathBuf {
        self.cache
            .dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(DirectoryTemporarySpace::default_root)
    }

    pub fn local_repository(&self) -> PathBuf {
        self.repository
            .local
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(MavenRepositoryClient::default_local_repository)
    }

    pub fn remotes(&self) -> Vec<String> {
        if self.repository.remotes.is_empty() {
            vec![MAVEN_CENTRAL.to_string()]
        } else {
            self.repository.remotes.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        self.network
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
