use std::io;
use std::path::Path;

/// Windows has no POSIX permission bits; callers skip repair on Windows hosts,
/// so reaching this means the host was misreported.
pub fn make_owner_executable(path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("POSIX permissions are not available for '{}'", path.display()),
    ))
}
