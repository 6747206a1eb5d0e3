//! Archive variant: unpacking

use super::inspector::FileInspector;
use crate::action::Effect;
use app_fs::{archive, ArchiveError, ArchiveFormat};
use std::path::Path;

#[derive(Debug)]
pub struct ArchiveFile {
    inspector: FileInspector,
}

impl ArchiveFile {
    pub fn new(inspector: FileInspector) -> Self {
        Self { inspector }
    }

    pub fn inspector(&self) -> &FileInspector {
        &self.inspector
    }

    pub fn inspector_mut(&mut self) -> &mut FileInspector {
        &mut self.inspector
    }

    pub fn extra_actions(&self) -> Vec<Effect> {
        vec![Effect::Unpack]
    }

    /// Extract into `destination`; the format comes from the file's contents
    pub fn unpack(&self, destination: &Path) -> Result<ArchiveFormat, ArchiveError> {
        archive::extract(self.inspector.path(), destination)
    }
}
