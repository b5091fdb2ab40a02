//! Payload compression (writer option `compress`)
//!
//! LZ4 for speed, ZSTD for ratio. The algorithm is recorded in the payload
//! header, so readers never need the writer's options.

use crate::{Error, Result};

/// Default ZSTD level when only the algorithm name is given.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Upper bound on the LZ4 expansion ratio; a size prefix beyond
/// `body * ratio` cannot come from a real LZ4 block.
const MAX_LZ4_RATIO: usize = 255;

/// Compression algorithm applied to an encoded artifact payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw bincode bytes (default)
    #[default]
    None,
    /// LZ4 - Fast compression
    Lz4,
    /// ZSTD at the given level (1..=22) - Better ratio, slower
    Zstd(i32),
}

impl Compression {
    /// Get algorithm name as string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lz4 => "lz4",
            Self::Zstd(_) => "zstd",
        }
    }

    /// Header tag for this algorithm
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Lz4 => 1,
            Self::Zstd(_) => 2,
        }
    }

    /// Decode a header tag.
    ///
    /// The ZSTD level is not stored; decompression does not need it.
    ///
    /// # Errors
    /// Returns [`Error::Deserialization`] for an unknown tag
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Lz4),
            2 => Ok(Self::Zstd(DEFAULT_ZSTD_LEVEL)),
            other => Err(Error::Deserialization(format!(
                "unknown compression tag {other}"
            ))),
        }
    }

    /// Compress data using this algorithm
    ///
    /// # Errors
    /// Returns error if compression fails (e.g., ZSTD internal error)
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
            Self::Zstd(level) => zstd::encode_all(data, *level)
                .map_err(|e| Error::Serialization(format!("ZSTD compression failed: {e}"))),
        }
    }

    /// Decompress data using this algorithm
    ///
    /// # Errors
    /// Returns error if decompression fails (e.g., corrupted data)
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => {
                check_lz4_size_prefix(data)?;
                lz4_flex::decompress_size_prepended(data)
                    .map_err(|e| Error::Deserialization(format!("LZ4 decompression failed: {e}")))
            }
            Self::Zstd(_) => zstd::decode_all(data)
                .map_err(|e| Error::Deserialization(format!("ZSTD decompression failed: {e}"))),
        }
    }
}

/// Reject a size prefix that no LZ4 block of this length could decompress to,
/// before anything is allocated for it.
fn check_lz4_size_prefix(data: &[u8]) -> Result<()> {
    if data.len() < 4 {
        return Err(Error::Deserialization(
            "LZ4 decompression failed: missing size prefix".into(),
        ));
    }
    let (prefix, body) = data.split_at(4);
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    let declared = usize::try_from(declared).unwrap_or(usize::MAX);
    let limit = body.len().saturating_mul(MAX_LZ4_RATIO);
    if declared > limit {
        return Err(Error::Deserialization(format!(
            "LZ4 decompression failed: declared size {declared} exceeds {limit} for a {} byte block",
            body.len()
        )));
    }
    Ok(())
}
