//! Base file handling shared by every variant

use app_fs::{validate_file_name, DefaultFileOperations, FileHandle, FileOpError, FileOperations};
use std::path::{Path, PathBuf};

/// Display strings for the file section of the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub basename: String,
    pub directory: String,
    pub path: String,
    /// Image variant only: "<width>x<height>" or "unknown"
    pub size: Option<String>,
}

/// Holds the file handle and performs the operations every file supports
pub struct FileInspector {
    handle: FileHandle,
    ops: Box<dyn FileOperations>,
}

impl FileInspector {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_operations(path, Box::new(DefaultFileOperations::new()))
    }

    pub fn with_operations<P: AsRef<Path>>(path: P, ops: Box<dyn FileOperations>) -> Self {
        Self {
            handle: FileHandle::new(path),
            ops,
        }
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    pub fn describe(&self) -> Description {
        Description {
            basename: self.handle.basename(),
            directory: self.handle.directory().display().to_string(),
            path: self.handle.display(),
            size: None,
        }
    }

    /// Rename within the current directory; the held path follows on success
    pub fn rename(&mut self, new_name: &str) -> Result<(), FileOpError> {
        validate_file_name(new_name)?;
        let target = self.handle.sibling(new_name);
        self.ops.rename(self.handle.path(), &target)?;
        self.handle.replace(target);
        Ok(())
    }

    /// Move into `new_directory`; the held path follows on success
    pub fn move_to(&mut self, new_directory: &Path) -> Result<PathBuf, FileOpError> {
        let target = self.ops.move_to(self.handle.path(), new_directory)?;
        self.handle.replace(target.clone());
        Ok(target)
    }

    /// Copy into `new_directory`; the held path is untouched
    pub fn copy_to(&self, new_directory: &Path) -> Result<PathBuf, FileOpError> {
        self.ops.copy_to(self.handle.path(), new_directory)
    }

    pub fn open_with_default_app(&self) -> Result<(), FileOpError> {
        self.ops.open_external(self.handle.path())
    }
}

impl std::fmt::Debug for FileInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileInspector")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
