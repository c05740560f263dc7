//! Filesystem primitives used by path detection and the install pipeline.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem operations the installer needs. Implemented by [`LocalFs`] and
/// by in-memory fakes in tests.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Recursively copy the contents of `src` into `dst`, creating `dst` and
    /// any intermediate directories. Existing files are overwritten.
    fn copy_dir(&self, src: &Path, dst: &Path) -> io::Result<()>;

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        !path.as_os_str().is_empty() && path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_dir(&self, src: &Path, dst: &Path) -> io::Result<()> {
        if !src.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("source directory {} does not exist", src.display()),
            ));
        }

        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            let rel = entry
                .path()
                .strip_prefix(src)
                .map_err(io::Error::other)?;
            let target = dst.join(rel);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                debug!("Copied {:?} -> {:?}", entry.path(), target);
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
