//! The uniform "give me a runnable path" capability and its composition.
//!
//! A resolver answers `Ok(Some(path))` when it found the executable,
//! `Ok(None)` when its source simply does not have it, and `Err` when checking
//! failed. [`ResolverChain`] tries resolvers in order, stops at the first
//! path, and propagates the first error without trying the rest.

use crate::error::ResolutionError;
use crate::platform::HostEnvironment;
use crate::reference::{ArtifactCoordinate, ResourceReference};
use crate::repository::RepositoryFetchStrategy;
use crate::url_fetch::UrlFetchStrategy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub trait Resolver: Send + Sync {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError>;

    /// Short human-readable label for logs.
    fn describe(&self) -> String;
}

/// A literal path; present iff it exists.
#[derive(Debug, Clone)]
pub struct PathResolver {
    path: PathBuf,
}

impl PathResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Resolver for PathResolver {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError> {
        Ok(self.path.exists().then(|| self.path.clone()))
    }

    fn describe(&self) -> String {
        format!("path {}", self.path.display())
    }
}

/// Looks `name` up on `PATH`. On Windows every `PATHEXT` suffix is tried and
/// no permission bits are checked.
#[derive(Debug, Clone)]
pub struct SystemPathResolver {
    host: HostEnvironment,
    name: String,
}

impl SystemPathResolver {
    pub fn new(host: HostEnvironment, name: impl Into<String>) -> Self {
        Self {
            host,
            name: name.into(),
        }
    }

    fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        if !self.host.is_windows() {
            return vec![dir.join(&self.name)];
        }
        let extensions = self.host.system_path_extensions();
        let has_known_extension = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&format!(".{e}")));
        let mut out = Vec::with_capacity(extensions.len() + 1);
        if has_known_extension {
            out.push(dir.join(&self.name));
        }
        out.extend(
            extensions
                .iter()
                .map(|ext| dir.join(format!("{}{ext}", self.name))),
        );
        out
    }
}

impl Resolver for SystemPathResolver {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError> {
        let windows = self.host.is_windows();
        for dir in self.host.system_path() {
            for candidate in self.candidates(&dir) {
                let usable = if windows {
                    candidate.is_file()
                } else {
                    is_executable(&candidate)
                };
                if usable {
                    debug!("Found {} on the system path", candidate.display());
                    return Ok(Some(candidate));
                }
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        format!("'{}' on PATH", self.name)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A URL fetched through [`UrlFetchStrategy`].
#[derive(Clone)]
pub struct UrlResolver {
    strategy: Arc<UrlFetchStrategy>,
    url: Url,
    extension: String,
}

impl UrlResolver {
    pub fn new(strategy: Arc<UrlFetchStrategy>, url: Url, extension: impl Into<String>) -> Self {
        Self {
            strategy,
            url,
            extension: extension.into(),
        }
    }
}

impl Resolver for UrlResolver {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError> {
        self.strategy.fetch(&self.url, &self.extension)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

#[derive(Debug, Clone)]
enum RepositoryTarget {
    Version(String),
    Coordinate(ArtifactCoordinate),
}

/// A protoc version or explicit coordinate resolved through the repository.
/// Never absent: the repository either produces a file or fails.
#[derive(Clone)]
pub struct RepositoryResolver {
    strategy: Arc<RepositoryFetchStrategy>,
    target: RepositoryTarget,
}

impl RepositoryResolver {
    pub fn for_version(strategy: Arc<RepositoryFetchStrategy>, version: impl Into<String>) -> Self {
        Self {
            strategy,
            target: RepositoryTarget::Version(version.into()),
        }
    }

    pub fn for_coordinate(strategy: Arc<RepositoryFetchStrategy>, coordinate: ArtifactCoordinate) -> Self {
        Self {
            strategy,
            target: RepositoryTarget::Coordinate(coordinate),
        }
    }
}

impl Resolver for RepositoryResolver {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError> {
        let path = match &self.target {
            RepositoryTarget::Version(v) => self.strategy.resolve_executable(v)?,
            RepositoryTarget::Coordinate(c) => self.strategy.resolve_coordinate(c)?,
        };
        Ok(Some(path))
    }

    fn describe(&self) -> String {
        match &self.target {
            RepositoryTarget::Version(v) => format!("protoc {v} from repository"),
            RepositoryTarget::Coordinate(c) => c.identifier(),
        }
    }
}

/// Ordered resolvers; first path wins, first error aborts.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.push(Box::new(resolver));
        self
    }

    pub fn with_boxed(mut self, resolver: Box<dyn Resolver>) -> Self {
        self.push(resolver);
        self
    }

    pub fn push(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Resolver for ResolverChain {
    fn resolve(&self) -> Result<Option<PathBuf>, ResolutionError> {
        for resolver in &self.resolvers {
            debug!("Trying {}", resolver.describe());
            if let Some(path) = resolver.resolve()? {
                return Ok(Some(path));
            }
            debug!("{} had nothing", resolver.describe());
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        self.resolvers
            .iter()
            .map(|r| r.describe())
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

/// The strategies a reference can be routed to.
#[derive(Clone)]
pub struct Strategies {
    pub host: HostEnvironment,
    pub urls: Arc<UrlFetchStrategy>,
    pub repository: Arc<RepositoryFetchStrategy>,
}

impl Strategies {
    /// Pick the resolver for a reference by its kind. `extension` only applies
    /// to remote URLs.
    pub fn resolver_for(&self, reference: ResourceReference, extension: &str) -> Box<dyn Resolver> {
        match reference {
            ResourceReference::FileSystemUrl(url) | ResourceReference::RemoteUrl(url) => {
                Box::new(UrlResolver::new(self.urls.clone(), url, extension))
            }
            ResourceReference::RepositoryCoordinate(c) => {
                Box::new(RepositoryResolver::for_coordinate(self.repository.clone(), c))
            }
            ResourceReference::LocalPath(path) => Box::new(PathResolver::new(path)),
        }
    }
}
