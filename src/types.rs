use serde::Serialize;
use std::fmt;
use std::io;
use thiserror::Error;

/// Type used for archive format version numbers: (major, minor, revision).
pub type Version = (u8, u8, u8);

/// Combine a version into a single ordering key.
pub const fn version_key(v: Version) -> u32 {
    ((v.0 as u32) << 16) | ((v.1 as u32) << 8) | v.2 as u32
}

/// First format version storing the compression setting as a specification string.
pub const K_VERS_1_15: u32 = version_key((1, 15, 0));
/// First format version storing the compression setting as an algorithm byte.
pub const K_VERS_1_16: u32 = version_key((1, 16, 0));

/// Error type used for header decoding errors.
///
/// Every error is terminal for the decode attempt it was returned from. Errors
/// carry the offending value so callers can build their own diagnostics.
#[derive(Error, Debug)]
pub enum HeaderError {
    /// The stream does not start with the `PGDMP` tag.
    #[error("magic bytes not detected, expected=PGDMP, got={}", String::from_utf8_lossy(.0))]
    NotAnArchive(Vec<u8>),
    /// The stream ended before a field was completely read.
    #[error("unexpected end of data")]
    NeedMoreData,
    /// An IO error other than running out of data.
    #[error("IO error reading data: {0}")]
    IOError(#[source] io::Error),
    /// The archive file could not be opened.
    #[error("err opening file {}: {source}", .path.display())]
    OpenFile {
        path: std::path::PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid integer size {0}, must be between 1 and 8")]
    InvalidIntegerWidth(usize),
    #[error("invalid offset size {0}, must be between 1 and 8")]
    InvalidOffsetWidth(usize),
    /// A fixed width primitive was asked to read a different width.
    #[error("invalid read width {0}")]
    InvalidReadWidth(usize),
    #[error("unknown archive format {0}")]
    InvalidFormatKind(u8),
    #[error("integer overflow: magnitude {magnitude} (negative={negative}) does not fit in 64 bits")]
    IntegerOverflow { negative: bool, magnitude: u64 },
    #[error("string length {0} exceeds the maximum of {max}", max = crate::io::MAX_STRING_LENGTH)]
    StringTooLarge(i64),
    /// The decoded header could not be rendered.
    #[error("error rendering header: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Invalid input selection.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<io::Error> for HeaderError {
    fn from(e: io::Error) -> HeaderError {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => HeaderError::NeedMoreData,
            _ => HeaderError::IOError(e),
        }
    }
}

/// Archive formats, in the order pg_dump numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ArchiveFormat {
    Unknown = 0,
    Custom,
    File,
    Tar,
    Null,
    Directory,
}

impl TryFrom<u8> for ArchiveFormat {
    type Error = HeaderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ArchiveFormat::Unknown),
            1 => Ok(ArchiveFormat::Custom),
            2 => Ok(ArchiveFormat::File),
            3 => Ok(ArchiveFormat::Tar),
            4 => Ok(ArchiveFormat::Null),
            5 => Ok(ArchiveFormat::Directory),
            x => Err(HeaderError::InvalidFormatKind(x)),
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveFormat::Unknown => "UNKNOWN",
            ArchiveFormat::Custom => "CUSTOM",
            ArchiveFormat::File => "FILE",
            ArchiveFormat::Tar => "TAR",
            ArchiveFormat::Null => "NULL",
            ArchiveFormat::Directory => "DIRECTORY",
        };
        f.write_str(name)
    }
}

/// Compression setting recorded in the header.
///
/// The shape depends on the archive format version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compression {
    /// zlib compression level, used before format 1.15. `-1` is the zlib
    /// default level and `0` means no compression.
    Level(i64),
    /// Compression specification such as `gzip:9`, used by format 1.15.
    Spec(Option<String>),
    /// Compression algorithm identifier, used from format 1.16 on.
    Algorithm(u8),
}

impl Compression {
    pub fn is_compressed(&self) -> bool {
        match self {
            Compression::Level(level) => *level != 0,
            Compression::Spec(spec) => spec.as_deref().is_some_and(|s| !s.is_empty() && s != "none"),
            Compression::Algorithm(algorithm) => *algorithm != 0,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Level(level) => write!(f, "level {}", level),
            Compression::Spec(Some(spec)) => write!(f, "spec {}", spec),
            Compression::Spec(None) => write!(f, "spec (null)"),
            Compression::Algorithm(algorithm) => write!(f, "algorithm {}", algorithm),
        }
    }
}
