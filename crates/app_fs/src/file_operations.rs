//! File operations module
//! Provides rename, copy, move and open-with-default-app

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation errors
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid file name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl FileOpError {
    /// Attach the offending path to the I/O kinds the user can act on
    fn from_io(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FileOpError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                FileOpError::PermissionDenied(path.to_path_buf())
            }
            std::io::ErrorKind::AlreadyExists => FileOpError::AlreadyExists(path.to_path_buf()),
            _ => FileOpError::Io(err),
        }
    }
}

type Result<T> = std::result::Result<T, FileOpError>;

/// File operations on a single file
pub trait FileOperations {
    /// Rename `from` to `to`; fails if `to` exists
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a file into `target_dir`, keeping its name. Returns the new path
    fn copy_to(&self, source: &Path, target_dir: &Path) -> Result<PathBuf>;

    /// Move a file into `target_dir`, keeping its name. Returns the new path
    fn move_to(&self, source: &Path, target_dir: &Path) -> Result<PathBuf>;

    /// Open file with default application
    fn open_external(&self, path: &Path) -> Result<()>;
}

/// Default implementation of file operations
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileOperations;

impl DefaultFileOperations {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `{target_dir}/{file name of source}` and check both ends
    fn prepare_target(source: &Path, target_dir: &Path) -> Result<PathBuf> {
        if !entry_exists(source) {
            return Err(FileOpError::NotFound(source.to_path_buf()));
        }

        if !target_dir.exists() {
            return Err(FileOpError::NotFound(target_dir.to_path_buf()));
        }

        if !target_dir.is_dir() {
            return Err(FileOpError::InvalidOperation(format!(
                "Target must be a directory: {}",
                target_dir.display()
            )));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| FileOpError::InvalidOperation("Invalid file name".to_string()))?;
        let target = target_dir.join(file_name);

        // Also catches copying or moving a file onto itself
        if entry_exists(&target) {
            return Err(FileOpError::AlreadyExists(target));
        }

        Ok(target)
    }
}

impl FileOperations for DefaultFileOperations {
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if !entry_exists(from) {
            return Err(FileOpError::NotFound(from.to_path_buf()));
        }

        if entry_exists(to) {
            return Err(FileOpError::AlreadyExists(to.to_path_buf()));
        }

        rename_no_replace(from, to)?;
        tracing::info!("Renamed: {} -> {}", from.display(), to.display());

        Ok(())
    }

    fn copy_to(&self, source: &Path, target_dir: &Path) -> Result<PathBuf> {
        let target = Self::prepare_target(source, target_dir)?;

        copy_with_metadata(source, &target)?;
        tracing::info!("Copied: {} -> {}", source.display(), target.display());

        Ok(target)
    }

    fn move_to(&self, source: &Path, target_dir: &Path) -> Result<PathBuf> {
        let target = Self::prepare_target(source, target_dir)?;

        // Try rename first (fast, same filesystem)
        match rename_no_replace(source, &target) {
            Ok(()) => {
                tracing::info!("Moved: {} -> {}", source.display(), target.display());
            }
            Err(FileOpError::Io(e)) if is_cross_device(&e) => {
                tracing::info!(
                    "Cross-filesystem move, using copy+delete: {} -> {}",
                    source.display(),
                    target.display()
                );
                copy_with_metadata(source, &target)?;
                if let Err(e) = std::fs::remove_file(source) {
                    // Leave no half-finished move behind
                    if let Err(cleanup) = std::fs::remove_file(&target) {
                        tracing::warn!(
                            "Could not remove copy {} after failed move: {}",
                            target.display(),
                            cleanup
                        );
                    }
                    return Err(FileOpError::from_io(e, source));
                }
                tracing::info!("Moved (copy+delete): {} -> {}", source.display(), target.display());
            }
            Err(e) => return Err(e),
        }

        Ok(target)
    }

    #[cfg(feature = "open-external")]
    fn open_external(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileOpError::NotFound(path.to_path_buf()));
        }

        open::that(path).map_err(|e| FileOpError::from_io(e, path))?;

        tracing::info!("Opened externally: {}", path.display());
        Ok(())
    }

    #[cfg(not(feature = "open-external"))]
    fn open_external(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileOpError::NotFound(path.to_path_buf()));
        }

        let status = launcher_command(path)
            .status()
            .map_err(|e| FileOpError::from_io(e, path))?;

        if !status.success() {
            return Err(FileOpError::InvalidOperation(format!(
                "Launcher exited with {} for {}",
                status,
                path.display()
            )));
        }

        tracing::info!("Opened externally: {}", path.display());
        Ok(())
    }
}

#[cfg(all(not(feature = "open-external"), target_os = "windows"))]
fn launcher_command(path: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd");
    cmd.arg("/C").arg("start").arg("").arg(path);
    cmd
}

#[cfg(all(not(feature = "open-external"), target_os = "macos"))]
fn launcher_command(path: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(all(
    not(feature = "open-external"),
    not(any(target_os = "windows", target_os = "macos"))
))]
fn launcher_command(path: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

/// True for anything at `path`, including a dangling symlink
fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Unix: EXDEV = 18, Windows: ERROR_NOT_SAME_DEVICE = 0x11 (17)
fn is_cross_device(e: &std::io::Error) -> bool {
    match e.raw_os_error() {
        Some(18) => cfg!(unix),
        Some(17) => cfg!(windows),
        _ => false,
    }
}

/// Rename that refuses to replace an existing `to`.
///
/// A hard link fails atomically when `to` exists; the link is the new name
/// once the old one is removed. Filesystems without hard links fall back to a
/// plain rename, which can still replace a file created after the caller's
/// existence check.
#[cfg(unix)]
fn rename_no_replace(from: &Path, to: &Path) -> Result<()> {
    // Whether hard_link follows a symlink is platform-specific
    let is_symlink = from
        .symlink_metadata()
        .map_or(false, |m| m.file_type().is_symlink());
    if is_symlink {
        return std::fs::rename(from, to).map_err(|e| map_rename_error(e, to));
    }

    match std::fs::hard_link(from, to) {
        Ok(()) => {
            if let Err(e) = std::fs::remove_file(from) {
                let _ = std::fs::remove_file(to);
                return Err(FileOpError::from_io(e, from));
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(FileOpError::AlreadyExists(to.to_path_buf()))
        }
        // Cross-device errors surface unchanged so move can copy instead
        Err(e) if is_cross_device(&e) => Err(FileOpError::Io(e)),
        Err(e) => {
            tracing::debug!("Hard link unavailable ({}), using rename", e);
            std::fs::rename(from, to).map_err(|e| map_rename_error(e, to))
        }
    }
}

/// Plain rename; a target created after the caller's existence check is replaced
#[cfg(not(unix))]
fn rename_no_replace(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| map_rename_error(e, to))
}

fn map_rename_error(e: std::io::Error, to: &Path) -> FileOpError {
    if is_cross_device(&e) {
        FileOpError::Io(e)
    } else {
        FileOpError::from_io(e, to)
    }
}

/// Copy contents and permissions, then carry the modification time over
fn copy_with_metadata(source: &Path, target: &Path) -> Result<()> {
    let modified = std::fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| FileOpError::from_io(e, source))?;

    std::fs::copy(source, target).map_err(|e| FileOpError::from_io(e, target))?;

    // A read-only source yields a read-only copy we can't reopen for writing
    let stamped = std::fs::File::options()
        .write(true)
        .open(target)
        .and_then(|f| f.set_modified(modified));
    if let Err(e) = stamped {
        tracing::warn!("Could not preserve modification time on {}: {}", target.display(), e);
    }

    Ok(())
}
