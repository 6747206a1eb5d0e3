//! File type dispatch by path pattern

use crate::config::MatchMode;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "tiff", "raw", "psd", "eps", "ai", "indd",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "tar", "bz2", "gz", "7z", "arc", "ark", "jar", "rar", "tar.gz", "tgz", "tar.Z", "tar.bz2",
    "tbz2", "tar.lz", "tlz", "tar.xz", "txz", "zip", "zipx",
];

pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "avi", "mp4"];

/// Which variant handles a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Generic,
    Image,
    Archive,
    Video,
}

impl FileKind {
    pub const fn name(self) -> &'static str {
        match self {
            FileKind::Generic => "file",
            FileKind::Image => "image",
            FileKind::Archive => "archive",
            FileKind::Video => "video",
        }
    }
}

/// Pick the variant for `path`. Case-sensitive; image beats archive beats video.
pub fn classify(path: &str, mode: MatchMode) -> FileKind {
    let table: [(FileKind, &[&str]); 3] = [
        (FileKind::Image, IMAGE_EXTENSIONS),
        (FileKind::Archive, ARCHIVE_EXTENSIONS),
        (FileKind::Video, VIDEO_EXTENSIONS),
    ];

    let kind = table
        .iter()
        .find(|(_, extensions)| extensions.iter().any(|ext| matches(path, ext, mode)))
        .map(|(kind, _)| *kind)
        .unwrap_or(FileKind::Generic);

    tracing::debug!("Classified {:?} as {} ({:?})", path, kind.name(), mode);
    kind
}

fn matches(path: &str, extension: &str, mode: MatchMode) -> bool {
    match mode {
        // Any one character followed by the extension, anywhere in the path
        MatchMode::Loose => path.match_indices(extension).any(|(i, _)| i > 0),
        MatchMode::Extension => path
            .strip_suffix(extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .map_or(false, |stem| !stem.is_empty() && !stem.ends_with(['/', '\\'])),
    }
}
