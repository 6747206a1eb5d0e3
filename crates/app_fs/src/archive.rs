//! Archive format sniffing and extraction

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use xz2::read::XzDecoder;

/// Error type for archive operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Unrecognized archive format: {}", .0.display())]
    UnrecognizedFormat(PathBuf),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(&'static str),

    #[error("Archive corrupted: {0}")]
    Corrupted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Containers we can extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZip,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
}

/// Single-stream compressors that count as archives only around a tar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
}

impl Compression {
    fn tar_format(self) -> ArchiveFormat {
        match self {
            Compression::Gzip => ArchiveFormat::TarGz,
            Compression::Bzip2 => ArchiveFormat::TarBz2,
            Compression::Xz => ArchiveFormat::TarXz,
        }
    }

    fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
            Compression::Xz => Box::new(XzDecoder::new(reader)),
        }
    }
}

/// What the leading bytes of a file say about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniffed {
    Archive(ArchiveFormat),
    Compressed(Compression),
    /// A known container without an extractor
    Unsupported(&'static str),
    Unknown,
}

type Matcher = fn(&[u8]) -> bool;

/// Checked in order; zip first so zip-based formats stay zip
const MATCHERS: &[(Matcher, Sniffed)] = &[
    (infer::archive::is_zip, Sniffed::Archive(ArchiveFormat::Zip)),
    (infer::archive::is_7z, Sniffed::Archive(ArchiveFormat::SevenZip)),
    (infer::archive::is_tar, Sniffed::Archive(ArchiveFormat::Tar)),
    (infer::archive::is_gz, Sniffed::Compressed(Compression::Gzip)),
    (infer::archive::is_bz2, Sniffed::Compressed(Compression::Bzip2)),
    (infer::archive::is_xz, Sniffed::Compressed(Compression::Xz)),
    (infer::archive::is_rar, Sniffed::Unsupported("rar")),
    (infer::archive::is_zst, Sniffed::Unsupported("zstd")),
    (infer::archive::is_lz, Sniffed::Unsupported("lzip")),
    (infer::archive::is_z, Sniffed::Unsupported("compress (.Z)")),
];

/// Bytes needed to see the ustar magic of a tar header
const TAR_BLOCK: usize = 512;

/// Classify a header buffer (at least one tar block when available)
pub fn sniff(header: &[u8]) -> Sniffed {
    MATCHERS
        .iter()
        .find(|(matches, _)| matches(header))
        .map(|&(_, sniffed)| sniffed)
        .unwrap_or(Sniffed::Unknown)
}

/// Read up to `limit` bytes, stopping early at end of stream
fn read_prefix<R: Read>(reader: R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(limit);
    reader.take(limit as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Determine the container format from the file's contents
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let header = read_prefix(File::open(path)?, TAR_BLOCK)?;

    match sniff(&header) {
        Sniffed::Archive(format) => Ok(format),
        Sniffed::Unsupported(name) => Err(ArchiveError::UnsupportedFormat(name)),
        Sniffed::Compressed(compression) => {
            let decoder = compression.decoder(open_buffered(path)?);
            // A broken stream is as good as unknown here
            match read_prefix(decoder, TAR_BLOCK) {
                Ok(inner) if infer::archive::is_tar(&inner) => Ok(compression.tar_format()),
                Ok(_) => Err(ArchiveError::UnrecognizedFormat(path.to_path_buf())),
                Err(e) => {
                    tracing::debug!("{:?} stream unreadable in {}: {}", compression, path.display(), e);
                    Err(ArchiveError::UnrecognizedFormat(path.to_path_buf()))
                }
            }
        }
        Sniffed::Unknown => Err(ArchiveError::UnrecognizedFormat(path.to_path_buf())),
    }
}

/// Extract `archive` into `destination`, creating it if needed.
///
/// The format is sniffed first, so an unrecognized file writes nothing.
pub fn extract(archive: &Path, destination: &Path) -> Result<ArchiveFormat> {
    let format = detect_format(archive)?;
    tracing::debug!("Detected {:?} in {}", format, archive.display());

    std::fs::create_dir_all(destination)?;

    match format {
        ArchiveFormat::Zip => extract_zip(archive, destination)?,
        ArchiveFormat::SevenZip => extract_7z(archive, destination)?,
        ArchiveFormat::Tar => extract_tar(open_buffered(archive)?, destination)?,
        ArchiveFormat::TarGz => {
            extract_tar(Compression::Gzip.decoder(open_buffered(archive)?), destination)?
        }
        ArchiveFormat::TarBz2 => {
            extract_tar(Compression::Bzip2.decoder(open_buffered(archive)?), destination)?
        }
        ArchiveFormat::TarXz => {
            extract_tar(Compression::Xz.decoder(open_buffered(archive)?), destination)?
        }
    }

    tracing::info!("Unpacked {} -> {}", archive.display(), destination.display());
    Ok(format)
}

fn extract_zip(archive: &Path, destination: &Path) -> Result<()> {
    let mut zip = zip::ZipArchive::new(open_buffered(archive)?).map_err(zip_error)?;
    zip.extract(destination).map_err(zip_error)
}

fn zip_error(e: zip::result::ZipError) -> ArchiveError {
    match e {
        zip::result::ZipError::Io(io) => ArchiveError::Io(io),
        other => ArchiveError::Corrupted(other.to_string()),
    }
}

fn extract_7z(archive: &Path, destination: &Path) -> Result<()> {
    sevenz_rust::decompress_file(archive, destination)
        .map_err(|e| ArchiveError::Corrupted(e.to_string()))
}

fn extract_tar<R: Read>(reader: R, destination: &Path) -> Result<()> {
    let mut tar = tar::Archive::new(reader);
    tar.unpack(destination).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof => {
            ArchiveError::Corrupted(e.to_string())
        }
        _ => ArchiveError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::fs;
    use std::io::Write;

    fn write_zip(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("docs/readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello from zip").unwrap();
        writer.finish().unwrap();
    }

    fn tar_bytes() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let data = b"hello from tar";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, "inner/a.txt", &data[..]).unwrap();
        builder.into_inner().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn bzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn xz(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_sniff_magics() {
        assert_eq!(sniff(b"PK\x03\x04rest"), Sniffed::Archive(ArchiveFormat::Zip));
        assert_eq!(
            sniff(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00, 0x04]),
            Sniffed::Archive(ArchiveFormat::SevenZip)
        );
        assert_eq!(sniff(&gzip(b"x")), Sniffed::Compressed(Compression::Gzip));
        assert_eq!(sniff(&bzip(b"x")), Sniffed::Compressed(Compression::Bzip2));
        assert_eq!(sniff(&xz(b"x")), Sniffed::Compressed(Compression::Xz));
        assert_eq!(sniff(b"Rar!\x1A\x07\x00rest"), Sniffed::Unsupported("rar"));
        assert_eq!(sniff(b"just some text"), Sniffed::Unknown);
        assert_eq!(sniff(b""), Sniffed::Unknown);
        assert_eq!(sniff(&tar_bytes()), Sniffed::Archive(ArchiveFormat::Tar));
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.zip");
        write_zip(&archive);
        let out = dir.path().join("out");

        assert_eq!(extract(&archive, &out).unwrap(), ArchiveFormat::Zip);
        assert_eq!(fs::read(out.join("docs/readme.txt")).unwrap(), b"hello from zip");
    }

    #[test]
    fn test_format_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.dat");
        write_zip(&archive);

        assert_eq!(detect_format(&archive).unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.tgz");
        fs::write(&archive, gzip(&tar_bytes())).unwrap();
        let out = dir.path().join("out");

        assert_eq!(extract(&archive, &out).unwrap(), ArchiveFormat::TarGz);
        assert_eq!(fs::read(out.join("inner/a.txt")).unwrap(), b"hello from tar");
    }

    #[test]
    fn test_extract_tar_bz2() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.tar.bz2");
        fs::write(&archive, bzip(&tar_bytes())).unwrap();
        let out = dir.path().join("out");

        assert_eq!(extract(&archive, &out).unwrap(), ArchiveFormat::TarBz2);
        assert_eq!(fs::read(out.join("inner/a.txt")).unwrap(), b"hello from tar");
    }

    #[test]
    fn test_extract_tar_xz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.txz");
        fs::write(&archive, xz(&tar_bytes())).unwrap();
        let out = dir.path().join("out");

        assert_eq!(extract(&archive, &out).unwrap(), ArchiveFormat::TarXz);
        assert_eq!(fs::read(out.join("inner/a.txt")).unwrap(), b"hello from tar");
    }

    #[test]
    fn test_extract_plain_tar() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.tar");
        fs::write(&archive, tar_bytes()).unwrap();
        let out = dir.path().join("out");

        assert_eq!(extract(&archive, &out).unwrap(), ArchiveFormat::Tar);
        assert!(out.join("inner/a.txt").exists());
    }

    #[test]
    fn test_unrecognized_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("fake.zip");
        fs::write(&archive, b"this is not an archive").unwrap();
        let out = dir.path().join("out");

        let err = extract(&archive, &out).unwrap_err();
        assert!(matches!(err, ArchiveError::UnrecognizedFormat(p) if p == archive));
        assert!(!out.exists());
    }

    #[test]
    fn test_compressed_without_tar_is_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        for (name, bytes) in [
            ("notes.gz", gzip(b"plain text, no tar here")),
            ("notes.bz2", bzip(b"plain text, no tar here")),
            ("notes.xz", xz(b"plain text, no tar here")),
        ] {
            let archive = dir.path().join(name);
            fs::write(&archive, bytes).unwrap();

            let err = detect_format(&archive).unwrap_err();
            assert!(matches!(err, ArchiveError::UnrecognizedFormat(_)), "{}", name);
        }
    }

    #[test]
    fn test_unsupported_container() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.rar");
        fs::write(&archive, b"Rar!\x1A\x07\x01\x00....").unwrap();
        let out = dir.path().join("out");

        let err = extract(&archive, &out).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedFormat("rar")));
        assert!(!out.exists());
    }

    #[test]
    fn test_truncated_zip_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"PK\x03\x04 truncated").unwrap();

        let err = extract(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupted(_) | ArchiveError::Io(_)));
    }
}
