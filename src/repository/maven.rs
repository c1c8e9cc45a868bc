//! Minimal Maven-layout repository client: local repository first, then each
//! remote in order.

use super::RepositoryClient;
use crate::error::RepositoryError;
use crate::reference::ArtifactCoordinate;
use crate::url_fetch::{user_agent, write_atomically};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";
const DEFAULT_EXTENSION: &str = "jar";

pub struct MavenRepositoryClient {
    client: Client,
    local: PathBuf,
    remotes: Vec<String>,
}

impl MavenRepositoryClient {
    pub fn new(
        local: impl Into<PathBuf>,
        remotes: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            client,
            local: local.into(),
            remotes: remotes
                .into_iter()
                .map(|r| r.trim_end_matches('/').to_string())
                .collect(),
        })
    }

    /// `~/.m2/repository`
    pub fn default_local_repository() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".m2")
            .join("repository")
    }

    pub fn local_repository(&self) -> &std::path::Path {
        &self.local
    }
}

/// `group/path/artifact/version/artifact-version[-classifier].ext`
pub fn relative_path(coordinate: &ArtifactCoordinate) -> Result<String, RepositoryError> {
    let group = coordinate
        .group_id
        .as_deref()
        .ok_or(RepositoryError::IncompleteCoordinate("group_id"))?;
    let artifact = coordinate
        .artifact_id
        .as_deref()
        .ok_or(RepositoryError::IncompleteCoordinate("artifact_id"))?;
    let version = coordinate
        .version
        .as_deref()
        .ok_or(RepositoryError::IncompleteCoordinate("version"))?;
    if is_version_range(version) {
        return Err(RepositoryError::UnsupportedVersionRange(version.to_string()));
    }
    let extension = coordinate.extension.as_deref().unwrap_or(DEFAULT_EXTENSION);

    if !group.split('.').all(is_plain_segment) {
        return Err(illegal("group_id", group));
    }
    for (field, value) in [
        ("artifact_id", Some(artifact)),
        ("version", Some(version)),
        ("classifier", coordinate.classifier.as_deref()),
        ("extension", Some(extension)),
    ] {
        if let Some(value) = value.filter(|v| !is_plain_segment(v)) {
            return Err(illegal(field, value));
        }
    }
    let file = match coordinate.classifier.as_deref() {
        Some(classifier) => format!("{artifact}-{version}-{classifier}.{extension}"),
        None => format!("{artifact}-{version}.{extension}"),
    };
    Ok(format!(
        "{}/{artifact}/{version}/{file}",
        group.replace('.', "/")
    ))
}

// Every field ends up as one path component under the local repository.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

fn illegal(field: &'static str, value: &str) -> RepositoryError {
    RepositoryError::IllegalSegment {
        field,
        value: value.to_string(),
    }
}

fn is_version_range(version: &str) -> bool {
    let v = version.trim();
    v.starts_with('[') || v.starts_with('(') || v.contains(',')
}

impl RepositoryClient for MavenRepositoryClient {
    fn resolve_artifact(&self, coordinate: &ArtifactCoordinate) -> Result<PathBuf, RepositoryError> {
        let relative = relative_path(coordinate)?;
        let local = self.local.join(&relative);
        if local.is_file() {
            debug!("Found {} in local repository", local.display());
            return Ok(local);
        }

        let mut tried = Vec::with_capacity(self.remotes.len());
        for remote in &self.remotes {
            let url = format!("{remote}/{relative}");
            debug!("Trying {url}");
            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|source| RepositoryError::Download {
                    url: url.clone(),
                    source,
                })?;
            if response.status() == StatusCode::NOT_FOUND {
                tried.push(url);
                continue;
            }
            let mut response = response
                .error_for_status()
                .map_err(|source| RepositoryError::Download {
                    url: url.clone(),
                    source,
                })?;
            let store = |source| RepositoryError::Store {
                url: url.clone(),
                destination: local.clone(),
                source,
            };
            if let Some(parent) = local.parent() {
                fs_err::create_dir_all(parent).map_err(store)?;
            }
            write_atomically(&local, &mut response).map_err(store)?;
            info!("Downloaded {url} to {}", local.display());
            return Ok(local);
        }
        Err(RepositoryError::NotFound { tried })
    }
}
