use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stable discriminant for [`ResolutionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedReference,
    TransportFailure,
    RepositoryFailure,
    PermissionRepairFailure,
}

/// Failure to produce a runnable path. "Not found" is never one of these:
/// strategies report absence as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Failed to resolve '{reference}' due to malformed syntax: {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("Failed to copy '{url}' to '{}'", .destination.display())]
    Transport {
        url: String,
        destination: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to prepare cache directory '{}'", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resolve artifact '{coordinate}' from repository")]
    Repository {
        coordinate: String,
        #[source]
        source: RepositoryError,
    },

    #[error("Setting executable bit for '{}' failed", .path.display())]
    PermissionRepair {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No protoc build is published for os '{os}' and arch '{arch}'")]
    UnsupportedPlatform { os: String, arch: String },
}

impl ResolutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedReference { .. } | Self::UnsupportedPlatform { .. } => {
                ErrorKind::MalformedReference
            }
            Self::Transport { .. } | Self::Cache { .. } => ErrorKind::TransportFailure,
            Self::Repository { .. } => ErrorKind::RepositoryFailure,
            Self::PermissionRepair { .. } => ErrorKind::PermissionRepairFailure,
        }
    }

    pub(crate) fn malformed(reference: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedReference {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures raised by a [`crate::repository::RepositoryClient`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("artifact not found in any repository (tried {})", .tried.join(", "))]
    NotFound { tried: Vec<String> },

    #[error("coordinate is missing required field '{0}'")]
    IncompleteCoordinate(&'static str),

    #[error("version range '{0}' is not supported; pin an exact version")]
    UnsupportedVersionRange(String),

    #[error("coordinate field '{field}' has illegal value '{value}'")]
    IllegalSegment { field: &'static str, value: String },

    #[error("download of '{url}' failed")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to copy '{url}' to '{}'", .destination.display())]
    Store {
        url: String,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The process environment is missing a property every query depends on.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("No '{0}' system property is set")]
    MissingProperty(&'static str),
}
