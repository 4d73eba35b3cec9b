use crate::header::Header;
use crate::render::to_json;
use crate::types::HeaderError;
use std::fs::File;
use std::io;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use tracing::debug;

/// Where to read an archive from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Stdin,
}

impl Input {
    /// Open the input for buffered reading.
    pub fn open(&self) -> Result<Box<dyn Read>, HeaderError> {
        match self {
            Input::Stdin => Ok(Box::new(BufReader::new(io::stdin().lock()))),
            Input::File(path) => {
                let file = File::open(path).map_err(|source| HeaderError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// Input selection as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub filename: Option<PathBuf>,
    pub stdin: bool,
}

impl Config {
    /// Check that exactly one input was selected.
    pub fn validate(&self) -> Result<Input, HeaderError> {
        match (&self.filename, self.stdin) {
            (None, false) => Err(HeaderError::InvalidConfig(
                "file not specified and stdin mode not enabled".into(),
            )),
            (Some(_), true) => Err(HeaderError::InvalidConfig(
                "can't provide file and read from stdin".into(),
            )),
            (Some(path), false) => Ok(Input::File(path.clone())),
            (None, true) => Ok(Input::Stdin),
        }
    }
}

/// Decode the header at the start of `f` and render it as compact JSON.
pub fn extract(f: &mut (impl io::Read + ?Sized)) -> Result<Vec<u8>, HeaderError> {
    let header = Header::parse(f)?;
    debug!("decoded header: {}", header);
    to_json(&header)
}
