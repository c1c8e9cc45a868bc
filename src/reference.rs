use crate::error::ResolutionError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

pub const COORDINATE_PREFIX: &str = "mvn:";

/// Flat artifact descriptor. Absent fields are distinct from empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub classifier: Option<String>,
    /// Maven "type", e.g. `exe` or `jar`.
    pub extension: Option<String>,
}

impl ArtifactCoordinate {
    /// `mvn:group/artifact/version/classifier/extension`, used in logs and errors.
    pub fn identifier(&self) -> String {
        format!(
            "{COORDINATE_PREFIX}{}/{}/{}/{}/{}",
            field(&self.group_id),
            field(&self.artifact_id),
            field(&self.version),
            field(&self.classifier),
            field(&self.extension),
        )
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            field(&self.group_id),
            field(&self.artifact_id),
            field(&self.version),
            field(&self.classifier),
            field(&self.extension),
        )
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = ResolutionError;

    /// `group:artifact:version[:classifier[:type]]`; empty segments are absent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 3 || parts.len() > 5 {
            return Err(ResolutionError::malformed(
                s,
                "expected group:artifact:version[:classifier[:type]]",
            ));
        }
        let segment = |i: usize| {
            parts
                .get(i)
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
        };
        let coordinate = ArtifactCoordinate {
            group_id: segment(0),
            artifact_id: segment(1),
            version: segment(2),
            classifier: segment(3),
            extension: segment(4),
        };
        if coordinate.version.is_none() {
            return Err(ResolutionError::malformed(s, "coordinate has no version"));
        }
        Ok(coordinate)
    }
}

/// What a caller holds when it asks for an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceReference {
    FileSystemUrl(Url),
    RemoteUrl(Url),
    RepositoryCoordinate(ArtifactCoordinate),
    LocalPath(PathBuf),
}

impl ResourceReference {
    /// Classify raw text. `mvn:` introduces a coordinate, anything with a URL
    /// scheme is a URL, and the rest is a literal path.
    pub fn parse(raw: &str) -> Result<Self, ResolutionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ResolutionError::malformed(raw, "reference is empty"));
        }
        if let Some(coordinate) = raw.strip_prefix(COORDINATE_PREFIX) {
            return coordinate.parse().map(Self::RepositoryCoordinate);
        }
        let Some(scheme) = url_scheme(raw) else {
            return Ok(Self::LocalPath(PathBuf::from(raw)));
        };
        if !SUPPORTED_SCHEMES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
        {
            let reason = format!(
                "unsupported URL scheme '{scheme}'; expected http, https or file \
                 (coordinates take a '{COORDINATE_PREFIX}' prefix)"
            );
            return Err(ResolutionError::malformed(raw, reason));
        }
        // The URL parser percent-encodes these silently; a file URI must not
        // carry them unescaped.
        if scheme.eq_ignore_ascii_case("file") {
            if let Some(c) = raw.chars().find(|&c| is_illegal_uri_char(c)) {
                return Err(ResolutionError::malformed(
                    raw,
                    format!("illegal character {c:?} in file URI"),
                ));
            }
            if has_broken_escape(raw) {
                return Err(ResolutionError::malformed(raw, "malformed escape in file URI"));
            }
        }
        let url = Url::parse(raw).map_err(|e| ResolutionError::malformed(raw, e))?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        if url.scheme().eq_ignore_ascii_case("file") {
            Self::FileSystemUrl(url)
        } else {
            Self::RemoteUrl(url)
        }
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSystemUrl(url) | Self::RemoteUrl(url) => write!(f, "{url}"),
            Self::RepositoryCoordinate(c) => write!(f, "{}", c.identifier()),
            Self::LocalPath(p) => write!(f, "{}", p.display()),
        }
    }
}

const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

// A single letter before ':' is a Windows drive, not a scheme.
fn url_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once(':')?;
    let valid = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

// Characters RFC 3986 never allows unescaped anywhere in a URI.
fn is_illegal_uri_char(c: char) -> bool {
    c.is_control()
        || c.is_whitespace()
        || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
}

fn has_broken_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}
