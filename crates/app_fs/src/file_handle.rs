//! FileHandle - the path the panel currently refers to

use std::path::{Component, Path, PathBuf};

/// The mutable record of the file being managed.
///
/// Only rename and move replace the path; everything else derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    /// Create a handle holding the absolute form of `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Self::normalize_path(path.as_ref()),
        }
    }

    /// Get the path for file system operations
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path as a UTF-8 string (lossy), used for display and matching
    pub fn display(&self) -> String {
        let display = self.path.to_string_lossy();
        // Windows canonical paths carry the verbatim prefix
        display.strip_prefix(r"\\?\").unwrap_or(&display).to_string()
    }

    /// File name component, or an empty string for paths like `/`
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Containing directory. A bare file name lives in `.`
    pub fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `{directory}/{name}`
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.directory().join(name)
    }

    /// Replace the held path after a successful rename or move
    pub fn replace(&mut self, path: PathBuf) {
        tracing::debug!("Handle path: {} -> {}", self.path.display(), path.display());
        self.path = path;
    }

    /// Absolute form of `path` without resolving symlinks.
    ///
    /// A symlinked input stays the link: rename and move act on it, not on its target.
    fn normalize_path(path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        };

        // Resolve . and .. without touching the disk
        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                _ => normalized.push(component),
            }
        }
        normalized
    }
}

impl std::fmt::Display for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
