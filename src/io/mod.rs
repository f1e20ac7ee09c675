//! Reading and writing the files of a conversion run.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{GeoShardError, Result};

pub mod geojson;

/// Replace the file at `path` with `contents` by writing a sibling temporary file and
/// renaming it into place, so readers see either the old or the new file.
///
/// The permissions of an existing file are carried over. New files are made world-readable
/// on unix instead of keeping the owner-only mode of the temporary file.
pub(crate) fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(GeoShardError::io_at(dir))?;
    file.write_all(contents)
        .map_err(GeoShardError::io_at(path))?;
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(GeoShardError::io_at(path))?;
    }
    file.as_file().sync_all().map_err(GeoShardError::io_at(path))?;
    file.persist(path).map_err(|err| GeoShardError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn replaces_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, b"{}").unwrap();

        replace_file(&path, br#"{"a":1}"#).unwrap();
        assert_eq!(fs::read(&path).unwrap(), br#"{"a":1}"#);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn new_files_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Chile.json");
        replace_file(&path, b"{}").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);
    }
}
