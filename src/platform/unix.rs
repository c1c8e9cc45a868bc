use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const OWNER_EXECUTE: u32 = 0o100;

/// Add owner-execute to the file's mode, leaving every other bit untouched.
pub fn make_owner_executable(path: &Path) -> io::Result<()> {
    let mut perms = fs_err::metadata(path)?.permissions();
    let mode = perms.mode();
    if mode & OWNER_EXECUTE == OWNER_EXECUTE {
        return Ok(());
    }
    perms.set_mode(mode | OWNER_EXECUTE);
    fs_err::set_permissions(path, perms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_only_owner_execute() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("protoc");
        std::fs::write(&file, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        make_owner_executable(&file).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o744);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = make_owner_executable(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
