use crate::types::HeaderError;
use std::io::prelude::*;
use std::string::String;
use tracing::trace;

/// Upper bound for the length of a string stored in an archive header.
pub const MAX_STRING_LENGTH: i64 = 1024 * 1024;

/// Largest integer or offset size an archive can declare.
pub const MAX_INT_SIZE: usize = 8;

/// Field widths declared by the archive itself.
///
/// Both sizes start out as 0 and are filled in once the header has been read
/// far enough to know them.
#[derive(Debug, PartialEq)]
pub struct ReadConfig {
    pub int_size: usize,
    pub offset_size: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadConfig {
    pub fn new() -> ReadConfig {
        ReadConfig {
            int_size: 0,
            offset_size: 0,
        }
    }

    pub fn read_byte(&self, f: &mut (impl Read + ?Sized)) -> Result<u8, HeaderError> {
        read_exact_int(f, 1)
    }

    pub fn read_int(&self, f: &mut (impl Read + ?Sized)) -> Result<i64, HeaderError> {
        read_int(f, self.int_size)
    }

    /// Read a length prefixed string.
    ///
    /// A negative length denotes a NULL string and gives `None`, which is
    /// different from an empty string. Invalid UTF-8 is replaced with U+FFFD.
    pub fn read_string(&self, f: &mut (impl Read + ?Sized)) -> Result<Option<String>, HeaderError> {
        let length = self.read_int(f)?;
        if length < 0 {
            return Ok(None);
        }
        if length == 0 {
            return Ok(Some(String::new()));
        }
        if length > MAX_STRING_LENGTH {
            return Err(HeaderError::StringTooLarge(length));
        }
        let length = usize::try_from(length).map_err(|_| HeaderError::IntegerOverflow {
            negative: false,
            magnitude: length.unsigned_abs(),
        })?;
        let buffer = read_exact_bytes(f, length)?;
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }
}

/// Read exactly `n` bytes.
pub fn read_exact_bytes(f: &mut (impl Read + ?Sized), n: usize) -> Result<Vec<u8>, HeaderError> {
    let mut buffer = vec![0; n];
    f.read_exact(buffer.as_mut_slice())?;
    Ok(buffer)
}

/// Read a single unsigned byte. Only a width of 1 is valid.
pub fn read_exact_int(f: &mut (impl Read + ?Sized), width: usize) -> Result<u8, HeaderError> {
    if width != 1 {
        return Err(HeaderError::InvalidReadWidth(width));
    }
    let mut buffer: [u8; 1] = [0];
    f.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

/// Read a signed integer: a sign byte followed by `int_size` magnitude bytes,
/// least significant byte first.
fn read_int(f: &mut (impl Read + ?Sized), int_size: usize) -> Result<i64, HeaderError> {
    if int_size == 0 || int_size > MAX_INT_SIZE {
        return Err(HeaderError::InvalidIntegerWidth(int_size));
    }

    let mut buffer = [0u8; MAX_INT_SIZE + 1];
    f.read_exact(&mut buffer[..int_size + 1])?;
    let negative = buffer[0] != 0;
    let mut magnitude: u64 = 0;

    for i in 0..int_size {
        magnitude |= (buffer[i + 1] as u64) << (i * 8);
    }

    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    let value = value.ok_or(HeaderError::IntegerOverflow {
        negative,
        magnitude,
    })?;
    trace!(value, int_size, "read integer");
    Ok(value)
}
