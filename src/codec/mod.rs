//! Artifact payload codec (bincode)
//!
//! `dump` / `load` treat the encoding as a black box. The only thing added on
//! top of bincode is a 6-byte header:
//!
//! ```text
//! +------+------+---------+-------------+-------------------------+
//! | magic (4)   | format  | compression | bincode payload ...     |
//! | b"TRAF"     | u8 = 1  | u8 tag      | (optionally compressed) |
//! +------+------+---------+-------------+-------------------------+
//! ```

mod compression;

pub use compression::{Compression, DEFAULT_ZSTD_LEVEL};

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Name of the serialization library.
pub const SERIALIZER_NAME: &str = "bincode";

/// Version of the serialization library recorded with every artifact.
pub const SERIALIZER_VERSION: &str = "1.3";

/// Payload magic bytes.
pub const MAGIC: [u8; 4] = *b"TRAF";

/// Payload framing version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 6;
const MAX_ZSTD_LEVEL: i64 = 22;

/// Writer options as logged by the caller, replayed verbatim on write.
///
/// A `BTreeMap` keeps the ordering stable for metadata comparison.
pub type WriterKwargs = BTreeMap<String, Value>;

/// Options understood by [`dump`], parsed from [`WriterKwargs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterOptions {
    /// Compression applied to the bincode payload
    pub compression: Compression,
}

impl WriterOptions {
    /// Parse writer kwargs.
    ///
    /// Recognized keys:
    /// - `compress`: `false` / `0` / `"none"`, `true` (LZ4), an integer ZSTD
    ///   level `1..=22`, `"lz4"`, `"zstd"`, or `["zstd", level]` (a level is
    ///   rejected for any other algorithm)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown keys or malformed values.
    pub fn from_kwargs(kwargs: Option<&WriterKwargs>) -> Result<Self> {
        let mut options = Self::default();
        let Some(kwargs) = kwargs else {
            return Ok(options);
        };

        for (key, value) in kwargs {
            match key.as_str() {
                "compress" => options.compression = parse_compress(value)?,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "unsupported writer option '{other}'"
                    )))
                }
            }
        }

        Ok(options)
    }
}

fn parse_compress(value: &Value) -> Result<Compression> {
    let invalid = || {
        Error::InvalidInput(format!(
            "invalid value for writer option 'compress': {value}"
        ))
    };

    match value {
        Value::Bool(false) | Value::Null => Ok(Compression::None),
        Value::Bool(true) => Ok(Compression::Lz4),
        Value::Number(n) => zstd_level(n.as_i64().ok_or_else(invalid)?).ok_or_else(invalid),
        Value::String(name) => by_name(name, DEFAULT_ZSTD_LEVEL).ok_or_else(invalid),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(name), Value::Number(level)] => {
                let level = level.as_i64().ok_or_else(invalid)?;
                if !(1..=MAX_ZSTD_LEVEL).contains(&level) {
                    return Err(invalid());
                }
                // Only ZSTD takes a level
                match by_name(name, i32::try_from(level).map_err(|_| invalid())?) {
                    Some(zstd @ Compression::Zstd(_)) => Ok(zstd),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        },
        Value::Object(_) => Err(invalid()),
    }
}

fn zstd_level(level: i64) -> Option<Compression> {
    match level {
        0 => Some(Compression::None),
        1..=MAX_ZSTD_LEVEL => i32::try_from(level).ok().map(Compression::Zstd),
        _ => None,
    }
}

fn by_name(name: &str, level: i32) -> Option<Compression> {
    match name.to_ascii_lowercase().as_str() {
        "none" => Some(Compression::None),
        "lz4" => Some(Compression::Lz4),
        "zstd" => Some(Compression::Zstd(level)),
        _ => None,
    }
}

/// Encode `value` into `writer`.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if bincode cannot encode the value, or an
/// IO error if the channel fails.
pub fn dump<T, W>(value: &T, mut writer: W, options: &WriterOptions) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let payload = bincode::serialize(value).map_err(|e| Error::Serialization(e.to_string()))?;
    let body = options.compression.compress(&payload)?;

    writer.write_all(&MAGIC)?;
    writer.write_all(&[FORMAT_VERSION, options.compression.tag()])?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Decode one value from `reader`.
///
/// Compression is detected from the header.
///
/// # Errors
///
/// Returns [`Error::Deserialization`] for a missing or foreign header, a
/// corrupt compressed body, or a payload bincode cannot decode as `T`.
pub fn load<T, R>(mut reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::Deserialization("payload header truncated".into()),
        _ => Error::Io(e),
    })?;

    if header[..4] != MAGIC {
        return Err(Error::Deserialization(
            "not an artifact payload (bad magic)".into(),
        ));
    }
    if header[4] != FORMAT_VERSION {
        return Err(Error::Deserialization(format!(
            "unsupported payload format version {}",
            header[4]
        )));
    }
    let compression = Compression::from_tag(header[5])?;

    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    let payload = compression.decompress(&body)?;

    bincode::deserialize(&payload).map_err(|e| Error::Deserialization(e.to_string()))
}
