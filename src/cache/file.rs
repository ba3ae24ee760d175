//! Cache file persistence.
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed over the target, so a concurrent reader sees either the old or the
//! new content, never a partial write.

use crate::errors::CacheError;
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

fn io_error(path: &Path, source: io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Ensures the directory holding the cache file exists. Every directory
/// created along the way gets owner-only access; existing ones are left alone.
fn ensure_parent_directory(path: &Path) -> Result<(), CacheError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    if !parent.exists() {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
        builder.create(parent).map_err(|e| io_error(parent, e))?;

        // The builder mode is filtered through the umask.
        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(parent, permissions).map_err(|e| io_error(parent, e))?;
            debug!("Set 0o700 permissions on cache directory");
        }
    }
    Ok(())
}

/// Atomically replaces the file at `path` with `contents`, readable only by the owner.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), CacheError> {
    ensure_parent_directory(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Owner-only before any secret bytes are written.
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| io_error(path, e))?;

    #[cfg(unix)]
    {
        let permissions = Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| io_error(path, e))?;
    }

    temp.write_all(contents.as_bytes())
        .map_err(|e| io_error(path, e))?;
    temp.as_file().sync_all().map_err(|e| io_error(path, e))?;

    temp.persist(path).map_err(|e| io_error(path, e.error))?;
    debug!("Replaced cache file {:?}", path);
    Ok(())
}

/// Reads the cache file, mapping a missing file to `CacheError::NotFound`.
pub(crate) fn read(path: &Path) -> Result<String, CacheError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CacheError::NotFound {
            path: path.to_path_buf(),
        },
        // A binary blob is as untrustworthy as a bad base64 string.
        io::ErrorKind::InvalidData => CacheError::Integrity,
        _ => io_error(path, e),
    })
}

/// Removes the cache file. Returns `false` if there was nothing to remove.
pub(crate) fn remove(path: &Path) -> Result<bool, CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passphrase.cache");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passphrase.cache");

        write_atomic(&path, "content").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("passphrase.cache");

        write_atomic(&path, "content").unwrap();
        assert!(path.exists());

        #[cfg(unix)]
        {
            let mode = fs::metadata(path.parent().unwrap())
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_restricts_every_created_ancestor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c.cache");

        write_atomic(&path, "content").unwrap();

        for ancestor in [dir.path().join("a"), dir.path().join("a").join("b")] {
            let mode = fs::metadata(&ancestor).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700, "{:?}", ancestor);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_directory_mode() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("shared");
        fs::create_dir(&existing).unwrap();
        fs::set_permissions(&existing, Permissions::from_mode(0o755)).unwrap();

        write_atomic(&existing.join("inner").join("c.cache"), "content").unwrap();

        let mode = fs::metadata(&existing).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_sets_owner_only_permissions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passphrase.cache");

        write_atomic(&path, "content").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let result = read(&dir.path().join("absent.cache"));
        assert!(matches!(result, Err(CacheError::NotFound { .. })));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passphrase.cache");
        fs::write(&path, "content").unwrap();

        assert!(remove(&path).unwrap());
        assert!(!remove(&path).unwrap());
    }
}
