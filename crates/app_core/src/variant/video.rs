//! Video variant. Behaves like a plain file for now.

use super::inspector::FileInspector;

#[derive(Debug)]
pub struct VideoFile {
    inspector: FileInspector,
}

impl VideoFile {
    pub fn new(inspector: FileInspector) -> Self {
        Self { inspector }
    }

    pub fn inspector(&self) -> &FileInspector {
        &self.inspector
    }

    pub fn inspector_mut(&mut self) -> &mut FileInspector {
        &mut self.inspector
    }
}
