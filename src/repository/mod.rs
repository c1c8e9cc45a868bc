//! Resolve protoc through an artifact repository and make the result runnable.

mod coordinates;
mod maven;

pub use coordinates::{
    classifier, ProtocCoordinateFactory, PROTOBUF_GROUP_ID, PROTOC_ARTIFACT_ID, PROTOC_EXTENSION,
};
pub use maven::{relative_path, MavenRepositoryClient, MAVEN_CENTRAL};

use crate::error::{RepositoryError, ResolutionError};
use crate::platform::{self, HostEnvironment};
use crate::reference::ArtifactCoordinate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Looks an artifact up (local cache, then remote) and returns its local file.
pub trait RepositoryClient: Send + Sync {
    fn resolve_artifact(&self, coordinate: &ArtifactCoordinate) -> Result<PathBuf, RepositoryError>;
}

#[derive(Clone)]
pub struct RepositoryFetchStrategy {
    client: Arc<dyn RepositoryClient>,
    host: HostEnvironment,
    coordinates: ProtocCoordinateFactory,
}

impl RepositoryFetchStrategy {
    pub fn new(client: impl RepositoryClient + 'static, host: HostEnvironment) -> Self {
        Self {
            client: Arc::new(client),
            host,
            coordinates: ProtocCoordinateFactory,
        }
    }

    /// Resolve protoc `version` for this host.
    pub fn resolve_executable(&self, version: &str) -> Result<PathBuf, ResolutionError> {
        let coordinate = self.coordinates.create(version, &self.host)?;
        self.resolve_coordinate(&coordinate)
    }

    /// Resolve an explicit coordinate. The file gets owner-execute on
    /// non-Windows hosts.
    pub fn resolve_coordinate(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<PathBuf, ResolutionError> {
        let identifier = coordinate.identifier();
        info!("Resolving protoc '{identifier}' from local/remote repositories");

        let path = self
            .client
            .resolve_artifact(coordinate)
            .map_err(|source| ResolutionError::Repository {
                coordinate: identifier,
                source,
            })?;
        info!("Resolved protoc to local path '{}'", path.display());

        if !self.host.is_windows() {
            debug!("Ensuring '{}' is marked as executable", path.display());
            platform::make_owner_executable(&path).map_err(|source| {
                ResolutionError::PermissionRepair {
                    path: path.clone(),
                    source,
                }
            })?;
        }
        Ok(path)
    }
}
