//! JSON rendering of a decoded [`Header`].
//!
//! The output is a flat object with fixed key names. Downstream tools read
//! these keys, so they never change. Exactly one of the compression keys is
//! present, depending on the archive format version. Optional strings that
//! were NULL in the archive are written as `null`.
use crate::header::{Header, MAGIC};
use crate::types::{Compression, HeaderError};
use serde::ser::{Serialize, SerializeStruct, Serializer};

pub const KEY_MAGIC: &str = "magic";
pub const KEY_FORMAT: &str = "format";
pub const KEY_PGDUMP_VERSION: &str = "pgDumpVersion";
pub const KEY_REMOTE_VERSION: &str = "remoteVersion";
pub const KEY_DATABASE: &str = "database";
pub const KEY_TIME_YEAR: &str = "timeYear";
pub const KEY_TIME_MONTH: &str = "timeMonth";
pub const KEY_TIME_DAY: &str = "timeDay";
pub const KEY_TIME_HOUR: &str = "timeHour";
pub const KEY_TIME_MIN: &str = "timeMin";
pub const KEY_TIME_SEC: &str = "timeSec";
pub const KEY_TIME_IS_DST: &str = "timeIsDst";
pub const KEY_COMPRESSION_LEVEL: &str = "compression";
pub const KEY_COMPRESSION_SPEC: &str = "compressionSpec";
pub const KEY_COMPRESSION_ALGORITHM: &str = "compressionAlgorithm";
pub const KEY_TOC_COUNT: &str = "toccount";
pub const KEY_INT_SIZE: &str = "intsize";
pub const KEY_VERSION_REV: &str = "vrev";
pub const KEY_VERSION_MINOR: &str = "vmin";
pub const KEY_VERSION_MAJOR: &str = "vmain";
pub const KEY_OFFSET_SIZE: &str = "offsize";

const FIELD_COUNT: usize = 19;

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Header", FIELD_COUNT)?;
        // MAGIC is ASCII
        s.serialize_field(KEY_MAGIC, &String::from_utf8_lossy(MAGIC))?;
        s.serialize_field(KEY_FORMAT, &self.format)?;
        s.serialize_field(KEY_PGDUMP_VERSION, &self.pgdump_version)?;
        s.serialize_field(KEY_REMOTE_VERSION, &self.server_version)?;
        s.serialize_field(KEY_DATABASE, &self.database_name)?;
        s.serialize_field(KEY_TIME_YEAR, &self.create_date.year)?;
        s.serialize_field(KEY_TIME_MONTH, &self.create_date.month)?;
        s.serialize_field(KEY_TIME_DAY, &self.create_date.day)?;
        s.serialize_field(KEY_TIME_HOUR, &self.create_date.hour)?;
        s.serialize_field(KEY_TIME_MIN, &self.create_date.min)?;
        s.serialize_field(KEY_TIME_SEC, &self.create_date.sec)?;
        s.serialize_field(KEY_TIME_IS_DST, &self.create_date.is_dst)?;
        match &self.compression {
            Compression::Level(level) => s.serialize_field(KEY_COMPRESSION_LEVEL, level)?,
            Compression::Spec(spec) => s.serialize_field(KEY_COMPRESSION_SPEC, spec)?,
            Compression::Algorithm(algorithm) => {
                s.serialize_field(KEY_COMPRESSION_ALGORITHM, algorithm)?
            }
        }
        s.serialize_field(KEY_TOC_COUNT, &self.toc_count)?;
        s.serialize_field(KEY_INT_SIZE, &self.int_size)?;
        s.serialize_field(KEY_VERSION_REV, &self.version.2)?;
        s.serialize_field(KEY_VERSION_MINOR, &self.version.1)?;
        s.serialize_field(KEY_VERSION_MAJOR, &self.version.0)?;
        s.serialize_field(KEY_OFFSET_SIZE, &self.offset_size)?;
        s.end()
    }
}

/// Render a header as compact, single line JSON.
pub fn to_json(header: &Header) -> Result<Vec<u8>, HeaderError> {
    Ok(serde_json::to_vec(header)?)
}

pub fn to_json_pretty(header: &Header) -> Result<Vec<u8>, HeaderError> {
    Ok(serde_json::to_vec_pretty(header)?)
}
