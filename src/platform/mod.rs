//! Host environment inspection.
//!
//! Every query goes through an [`EnvironmentReader`] so tests can swap the live
//! process environment for a fixed snapshot. `PATH` and `PATHEXT` are re-read on
//! each call; the OS name and architecture are read once, when the
//! [`HostEnvironment`] is built, and a missing value is a startup error.

use crate::error::EnvironmentError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::make_owner_executable;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::make_owner_executable;

pub const OS_NAME: &str = "os.name";
pub const OS_ARCH: &str = "os.arch";
pub const PATH_SEPARATOR: &str = "path.separator";

/// Read-only access to environment variables and system properties.
pub trait EnvironmentReader: Send + Sync {
    fn variable(&self, name: &str) -> Option<String>;
    fn property(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveEnvironment;

impl EnvironmentReader for LiveEnvironment {
    fn variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn property(&self, name: &str) -> Option<String> {
        let value = match name {
            OS_NAME => match std::env::consts::OS {
                "linux" => "Linux",
                "macos" => "Mac OS X",
                "windows" => "Windows",
                "freebsd" => "FreeBSD",
                other => other,
            },
            OS_ARCH => std::env::consts::ARCH,
            PATH_SEPARATOR => {
                if cfg!(windows) {
                    ";"
                } else {
                    ":"
                }
            }
            _ => return None,
        };
        Some(value.to_string())
    }
}

/// A frozen snapshot, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    variables: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl FixedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for the given OS name and architecture, with the path
    /// separator that OS uses.
    pub fn for_os(os_name: &str, arch: &str) -> Self {
        let separator = if os_name.to_lowercase().starts_with("windows") {
            ";"
        } else {
            ":"
        };
        Self::new()
            .with_property(OS_NAME, os_name)
            .with_property(OS_ARCH, arch)
            .with_property(PATH_SEPARATOR, separator)
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvironmentReader for FixedEnvironment {
    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

/// Ordered set of strings compared without regard to case. The first spelling
/// inserted is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    entries: BTreeMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn insert(&mut self, value: &str) -> bool {
        let key = value.to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(&value.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Platform queries used by the resolvers.
#[derive(Clone)]
pub struct HostEnvironment {
    reader: Arc<dyn EnvironmentReader>,
    os_name: String,
    arch: String,
}

impl std::fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("os_name", &self.os_name)
            .field("arch", &self.arch)
            .finish_non_exhaustive()
    }
}

impl HostEnvironment {
    pub fn new(reader: impl EnvironmentReader + 'static) -> Result<Self, EnvironmentError> {
        let os_name = reader
            .property(OS_NAME)
            .ok_or(EnvironmentError::MissingProperty(OS_NAME))?;
        let arch = reader
            .property(OS_ARCH)
            .ok_or(EnvironmentError::MissingProperty(OS_ARCH))?;
        Ok(Self {
            reader: Arc::new(reader),
            os_name,
            arch,
        })
    }

    pub fn live() -> Result<Self, EnvironmentError> {
        Self::new(LiveEnvironment)
    }

    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    pub fn is_windows(&self) -> bool {
        self.os_starts_with("windows")
    }

    pub fn is_mac_os(&self) -> bool {
        self.os_starts_with("mac os")
    }

    pub fn is_linux(&self) -> bool {
        self.os_starts_with("linux")
    }

    /// The raw architecture string, e.g. `x86_64` or `amd64`.
    pub fn cpu_architecture(&self) -> &str {
        &self.arch
    }

    pub fn path_separator(&self) -> String {
        self.reader
            .property(PATH_SEPARATOR)
            .unwrap_or_else(|| if self.is_windows() { ";" } else { ":" }.to_string())
    }

    /// Entries of `PATH`, blank segments dropped and duplicates removed in
    /// first-seen order. Entries need not exist.
    pub fn system_path(&self) -> Vec<PathBuf> {
        let raw = self.reader.variable("PATH").unwrap_or_default();
        let separator = self.path_separator();
        let mut seen = HashSet::new();
        raw.split(separator.as_str())
            .filter(|segment| !segment.trim().is_empty())
            .filter(|segment| seen.insert(*segment))
            .map(PathBuf::from)
            .collect()
    }

    /// Entries of `PATHEXT`, compared case-insensitively. Empty when unset.
    pub fn system_path_extensions(&self) -> CaseInsensitiveSet {
        let raw = self.reader.variable("PATHEXT").unwrap_or_default();
        let separator = self.path_separator();
        raw.split(separator.as_str())
            .filter(|segment| !segment.trim().is_empty())
            .collect()
    }

    pub fn report(&self) -> PlatformReport {
        PlatformReport {
            os_name: self.os_name.clone(),
            cpu_architecture: self.arch.clone(),
            windows: self.is_windows(),
            mac_os: self.is_mac_os(),
            linux: self.is_linux(),
            path: self.system_path(),
            path_extensions: self.system_path_extensions().iter().map(String::from).collect(),
        }
    }

    fn os_starts_with(&self, prefix: &str) -> bool {
        self.os_name.to_lowercase().starts_with(prefix)
    }
}

/// Serializable snapshot printed by the `env` command.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformReport {
    pub os_name: String,
    pub cpu_architecture: String,
    pub windows: bool,
    pub mac_os: bool,
    pub linux: bool,
    pub path: Vec<PathBuf>,
    pub path_extensions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(env: FixedEnvironment) -> HostEnvironment {
        HostEnvironment::new(env).unwrap()
    }

    #[test]
    fn os_flags_follow_os_name_prefix() {
        let windows = host(FixedEnvironment::for_os("Windows 11", "amd64"));
        assert!(windows.is_windows());
        assert!(!windows.is_linux());
        assert!(!windows.is_mac_os());

        let mac = host(FixedEnvironment::for_os("Mac OS X", "aarch64"));
        assert!(mac.is_mac_os());
        assert!(!mac.is_windows());

        let linux = host(FixedEnvironment::for_os("LINUX", "x86_64"));
        assert!(linux.is_linux());
    }

    #[test]
    fn unknown_os_matches_nothing() {
        let env = host(FixedEnvironment::for_os("Plan 9", "mips"));
        assert!(!env.is_windows());
        assert!(!env.is_mac_os());
        assert!(!env.is_linux());
    }

    #[test]
    fn missing_properties_fail_construction() {
        let err = HostEnvironment::new(FixedEnvironment::new().with_property(OS_ARCH, "x86_64"))
            .unwrap_err();
        assert!(err.to_string().contains("os.name"));

        let err = HostEnvironment::new(FixedEnvironment::new().with_property(OS_NAME, "Linux"))
            .unwrap_err();
        assert!(err.to_string().contains("os.arch"));
    }

    #[test]
    fn cpu_architecture_is_raw() {
        let env = host(FixedEnvironment::for_os("Linux", "ppc64le"));
        assert_eq!(env.cpu_architecture(), "ppc64le");
    }

    #[test]
    fn system_path_drops_blanks_and_duplicates() {
        let env = host(FixedEnvironment::for_os("Linux", "x86_64").with_variable("PATH", "/a:/b:/a:"));
        assert_eq!(env.system_path(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn system_path_is_empty_when_unset() {
        let env = host(FixedEnvironment::for_os("Linux", "x86_64"));
        assert!(env.system_path().is_empty());
    }

    #[test]
    fn system_path_uses_windows_separator() {
        let env = host(
            FixedEnvironment::for_os("Windows 10", "amd64")
                .with_variable("PATH", r"C:\bin; ;C:\tools;C:\bin"),
        );
        assert_eq!(
            env.system_path(),
            vec![PathBuf::from(r"C:\bin"), PathBuf::from(r"C:\tools")]
        );
    }

    #[test]
    fn path_extensions_collapse_case() {
        let env = host(
            FixedEnvironment::for_os("Windows 10", "amd64")
                .with_variable("PATHEXT", ".EXE;.exe;.BAT"),
        );
        let exts = env.system_path_extensions();
        assert_eq!(exts.len(), 2);
        assert!(exts.contains(".exe"));
        assert!(exts.contains(".bat"));
        assert_eq!(exts.iter().collect::<Vec<_>>(), vec![".BAT", ".EXE"]);
    }

    #[test]
    fn path_extensions_empty_when_unset() {
        let env = host(FixedEnvironment::for_os("Linux", "x86_64"));
        assert!(env.system_path_extensions().is_empty());
    }

    #[test]
    fn environment_is_reread_on_each_call() {
        temp_env::with_var("PATH", Some("/first"), || {
            let env = HostEnvironment::live().unwrap();
            assert!(env.system_path().contains(&PathBuf::from("/first")));
            temp_env::with_var("PATH", Some("/second"), || {
                assert_eq!(env.system_path(), vec![PathBuf::from("/second")]);
            });
        });
    }

    #[test]
    fn live_environment_answers_core_properties() {
        let live = LiveEnvironment;
        assert!(live.property(OS_NAME).is_some());
        assert_eq!(live.property(OS_ARCH).as_deref(), Some(std::env::consts::ARCH));
        assert!(live.property("user.home").is_none());
    }
}
