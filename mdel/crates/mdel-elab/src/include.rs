//! Source loading for `include` resolution.
//!
//! The elaborator never touches the filesystem directly; it asks a
//! [`SourceLoader`] for bytes. The default loader reads real files, and
//! tests substitute an in-memory map so include behavior is exercised
//! without temp directories.

use std::io;
use std::path::Path;

/// Pluggable path-to-text loader consumed by the elaborator.
pub trait SourceLoader {
    /// Reads a source file as UTF-8 text.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Loads sources from the filesystem.
#[derive(Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use mdel_util::FxHashMap;
    use std::path::PathBuf;

    /// In-memory loader for include tests.
    #[derive(Default)]
    pub struct MemLoader {
        files: FxHashMap<PathBuf, String>,
    }

    impl MemLoader {
        pub fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                    .collect(),
            }
        }
    }

    impl SourceLoader for MemLoader {
        fn load(&self, path: &Path) -> io::Result<String> {
            self.files.get(path).cloned().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
        }
    }
}
