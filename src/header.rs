use crate::io::{read_exact_bytes, ReadConfig, MAX_INT_SIZE};
use crate::types::{
    version_key, ArchiveFormat, Compression, HeaderError, Version, K_VERS_1_15, K_VERS_1_16,
};
use chrono::prelude::*;
use std::fmt;
use std::io;
use std::string::String;
use tracing::{debug, trace};

/// Tag every archive starts with.
pub const MAGIC: &[u8; 5] = b"PGDMP";

/// Timestamps store the year as an offset from this year.
const YEAR_BASE: i64 = 1900;

/// Archive creation time, as recorded by pg_dump.
///
/// The fields are stored as found in the archive. No calendar validation is
/// done; use [`CreationTime::to_naive_datetime`] for that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationTime {
    pub sec: i64,
    pub min: i64,
    pub hour: i64,
    pub day: i64,
    pub month: i64,
    /// Absolute year.
    pub year: i64,
    pub is_dst: i64,
}

impl CreationTime {
    /// Convert to a date and time, if the fields form a valid one.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::try_from(self.year).ok()?,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
        )?
        .and_hms_opt(
            u32::try_from(self.hour).ok()?,
            u32::try_from(self.min).ok()?,
            u32::try_from(self.sec).ok()?,
        )
    }
}

/// Decoded archive header.
///
/// String fields are `None` when the archive stores a NULL string. Their
/// bytes are not validated: sequences that are not valid UTF-8 are replaced
/// with U+FFFD, so such strings are a lossy copy of the archive contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    pub int_size: u8,
    pub offset_size: u8,
    pub format: ArchiveFormat,
    pub compression: Compression,
    pub create_date: CreationTime,
    pub database_name: Option<String>,
    pub server_version: Option<String>,
    pub pgdump_version: Option<String>,
    pub toc_count: i64,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version={}.{}.{} format={} compression={}",
            self.version.0, self.version.1, self.version.2, self.format, self.compression
        )
    }
}

impl Header {
    /// Decode a header from the start of an archive.
    ///
    /// Exactly the bytes making up the header are consumed. The table of
    /// contents that follows is not read.
    pub fn parse(f: &mut (impl io::Read + ?Sized)) -> Result<Header, HeaderError> {
        let magic = read_exact_bytes(f, MAGIC.len())?;
        if magic != MAGIC {
            return Err(HeaderError::NotAnArchive(magic));
        }

        let mut cfg = ReadConfig::new();
        let version: Version = (cfg.read_byte(f)?, cfg.read_byte(f)?, cfg.read_byte(f)?);
        debug!("archive format version {}.{}.{}", version.0, version.1, version.2);

        let int_size = cfg.read_byte(f)?;
        if !valid_size(int_size) {
            return Err(HeaderError::InvalidIntegerWidth(int_size as usize));
        }
        let offset_size = cfg.read_byte(f)?;
        if !valid_size(offset_size) {
            return Err(HeaderError::InvalidOffsetWidth(offset_size as usize));
        }
        cfg.int_size = int_size as usize;
        cfg.offset_size = offset_size as usize;
        debug!(int_size, offset_size, "field sizes");

        let format = ArchiveFormat::try_from(cfg.read_byte(f)?)?;
        trace!(%format, "archive format");

        let compression = read_compression(f, &cfg, version)?;
        debug!(%compression, "compression");

        let sec = cfg.read_int(f)?;
        let min = cfg.read_int(f)?;
        let hour = cfg.read_int(f)?;
        let day = cfg.read_int(f)?;
        let month = cfg.read_int(f)?;
        let year = cfg.read_int(f)?;
        let is_dst = cfg.read_int(f)?;
        let create_date = CreationTime {
            sec,
            min,
            hour,
            day,
            month,
            year: YEAR_BASE.saturating_add(year),
            is_dst,
        };

        let database_name = cfg.read_string(f)?;
        let server_version = cfg.read_string(f)?;
        let pgdump_version = cfg.read_string(f)?;
        trace!(?database_name, ?server_version, ?pgdump_version, "provenance");

        let toc_count = cfg.read_int(f)?;
        trace!(toc_count, "table of contents size");

        Ok(Header {
            version,
            int_size,
            offset_size,
            format,
            compression,
            create_date,
            database_name,
            server_version,
            pgdump_version,
            toc_count,
        })
    }

    pub fn version_key(&self) -> u32 {
        version_key(self.version)
    }

    pub fn is_version_at_least(&self, v: Version) -> bool {
        self.version >= v
    }
}

fn valid_size(size: u8) -> bool {
    (1..=MAX_INT_SIZE).contains(&(size as usize))
}

fn read_compression(
    f: &mut (impl io::Read + ?Sized),
    cfg: &ReadConfig,
    version: Version,
) -> Result<Compression, HeaderError> {
    // Newest layout first: every 1.16 archive also satisfies the 1.15 check.
    let key = version_key(version);
    if key >= K_VERS_1_16 {
        Ok(Compression::Algorithm(cfg.read_byte(f)?))
    } else if key >= K_VERS_1_15 {
        Ok(Compression::Spec(cfg.read_string(f)?))
    } else {
        Ok(Compression::Level(cfg.read_int(f)?))
    }
}
