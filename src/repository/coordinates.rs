use crate::error::ResolutionError;
use crate::platform::HostEnvironment;
use crate::reference::ArtifactCoordinate;

pub const PROTOBUF_GROUP_ID: &str = "com.google.protobuf";
pub const PROTOC_ARTIFACT_ID: &str = "protoc";
pub const PROTOC_EXTENSION: &str = "exe";

/// Builds the full protoc coordinate for a bare version on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocCoordinateFactory;

impl ProtocCoordinateFactory {
    pub fn create(
        &self,
        version: &str,
        host: &HostEnvironment,
    ) -> Result<ArtifactCoordinate, ResolutionError> {
        let version = version.trim();
        if version.is_empty() {
            return Err(ResolutionError::malformed(version, "protoc version is blank"));
        }
        Ok(ArtifactCoordinate {
            group_id: Some(PROTOBUF_GROUP_ID.to_string()),
            artifact_id: Some(PROTOC_ARTIFACT_ID.to_string()),
            version: Some(version.to_string()),
            classifier: Some(classifier(host)?),
            extension: Some(PROTOC_EXTENSION.to_string()),
        })
    }
}

/// `<os>-<arch>` in the naming protoc releases use, e.g. `linux-aarch_64`.
pub fn classifier(host: &HostEnvironment) -> Result<String, ResolutionError> {
    let unsupported = || ResolutionError::UnsupportedPlatform {
        os: host.os_name().to_string(),
        arch: host.cpu_architecture().to_string(),
    };
    let os = if host.is_linux() {
        "linux"
    } else if host.is_mac_os() {
        "osx"
    } else if host.is_windows() {
        "windows"
    } else {
        return Err(unsupported());
    };
    let arch = match host.cpu_architecture().to_lowercase().as_str() {
        "amd64" | "x86_64" | "x64" => "x86_64",
        "x86" | "i386" | "i486" | "i586" | "i686" => "x86_32",
        "aarch64" | "arm64" => "aarch_64",
        "ppc64le" => "ppcle_64",
        "s390x" => "s390_64",
        _ => return Err(unsupported()),
    };
    Ok(format!("{os}-{arch}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::platform::FixedEnvironment;

    fn host(os: &str, arch: &str) -> HostEnvironment {
        HostEnvironment::new(FixedEnvironment::for_os(os, arch)).unwrap()
    }

    #[test]
    fn maps_common_platforms() {
        assert_eq!(classifier(&host("Linux", "amd64")).unwrap(), "linux-x86_64");
        assert_eq!(classifier(&host("Linux", "aarch64")).unwrap(), "linux-aarch_64");
        assert_eq!(classifier(&host("Mac OS X", "arm64")).unwrap(), "osx-aarch_64");
        assert_eq!(classifier(&host("Windows 11", "x86")).unwrap(), "windows-x86_32");
        assert_eq!(classifier(&host("Linux", "s390x")).unwrap(), "linux-s390_64");
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = classifier(&host("Plan 9", "amd64")).unwrap_err();
        assert!(matches!(err, ResolutionError::UnsupportedPlatform { .. }));
        assert!(classifier(&host("Linux", "riscv64")).is_err());
    }

    #[test]
    fn create_fills_every_field() {
        let c = ProtocCoordinateFactory
            .create(" 3.25.1 ", &host("Linux", "x86_64"))
            .unwrap();
        assert_eq!(c.to_string(), "com.google.protobuf:protoc:3.25.1:linux-x86_64:exe");
    }

    #[test]
    fn blank_version_is_malformed() {
        let err = ProtocCoordinateFactory
            .create("  ", &host("Linux", "x86_64"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedReference);
    }
}
