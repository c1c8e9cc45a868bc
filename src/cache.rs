use crate::error::ResolutionError;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Hands out writable directories for a category and sub-key.
pub trait TemporarySpace: Send + Sync {
    /// Returns `<root>/<category>/<key>`, created if missing. Failures name
    /// the full directory that could not be created.
    fn create_temporary_space(&self, category: &str, key: &str)
        -> Result<PathBuf, ResolutionError>;
}

/// [`TemporarySpace`] rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemporarySpace {
    root: PathBuf,
}

impl DirectoryTemporarySpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<user cache dir>/protoc-resolve`, or the system temp dir when the
    /// platform has no cache dir.
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("protoc-resolve")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemporarySpace for DirectoryTemporarySpace {
    fn create_temporary_space(
        &self,
        category: &str,
        key: &str,
    ) -> Result<PathBuf, ResolutionError> {
        let dir = self.root.join(category).join(key);
        match fs_err::create_dir_all(&dir) {
            Ok(()) => Ok(dir),
            Err(source) => Err(ResolutionError::Cache { path: dir, source }),
        }
    }
}

/// Hex SHA-1 of the input text.
pub fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derives stable cache paths for URLs.
#[derive(Clone)]
pub struct ResourceCache {
    space: Arc<dyn TemporarySpace>,
}

impl ResourceCache {
    pub fn new(space: impl TemporarySpace + 'static) -> Self {
        Self {
            space: Arc::new(space),
        }
    }

    /// File name for a URL: `<last segment>-<sha1(url)><extension>`, or just
    /// `<sha1(url)><extension>` when the path has no slash.
    pub fn file_name(url: &Url, extension: &str) -> String {
        let digest = sha1_hex(url.as_str());
        let path = url.path();
        match path.rfind('/') {
            Some(slash) => format!("{}-{digest}{extension}", &path[slash + 1..]),
            None => format!("{digest}{extension}"),
        }
    }

    /// `<space>/url/<scheme>/<file name>`. Creates the directory, not the file.
    pub fn target_file(&self, url: &Url, extension: &str) -> Result<PathBuf, ResolutionError> {
        let dir = self.space.create_temporary_space("url", url.scheme())?;
        Ok(dir.join(Self::file_name(url, extension)))
    }
}
