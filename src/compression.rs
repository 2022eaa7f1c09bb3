//! Posting list compression codecs.
//!
//! A posting list is a strictly ascending list of [`Position`]s. Two codecs
//! are provided:
//!
//! - [`FixedWidthCodec`]: every position as 4 little-endian bytes. Large, but
//!   any element can be located without decoding the rest.
//! - [`DeltaVarintCodec`]: an element count followed by varint encoded gaps
//!   between consecutive positions. Sorted, clustered ids shrink to one or
//!   two bytes each.
//!
//! The payload carries no codec tag: the [`Codec`] used for writing must be
//! supplied again for reading.
//!
//! # Example
//!
//! ```
//! use ngram_suggest::compression::Codec;
//!
//! # fn main() -> ngram_suggest::error::Result<()> {
//! let codec = Codec::DeltaVarint;
//! let bytes = codec.encode(&[5, 5]);
//! assert_eq!(bytes, vec![2, 0, 0, 0, 5, 0]);
//! assert_eq!(codec.decode(&bytes)?, vec![5, 5]);
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SuggestError};

pub mod delta_varint;
pub mod fixed_width;

pub use delta_varint::DeltaVarintCodec;
pub use fixed_width::FixedWidthCodec;

/// A document identifier stored in a posting list.
pub type Position = u32;

/// A sorted, duplicate-free list of positions.
pub type PostingList = Vec<Position>;

/// Payloads shorter than this decode to an empty list.
pub const MIN_PAYLOAD_LEN: usize = 4;

/// Reversible binary encoding of a posting list.
pub trait PostingCodec: Send + Sync + Debug {
    /// Encode a list of positions.
    fn encode(&self, list: &[Position]) -> Vec<u8>;

    /// Decode a payload produced by [`PostingCodec::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<PostingList>;

    /// Name of the codec, used in log output.
    fn name(&self) -> &'static str;
}

/// Codec selection, chosen by the caller for both writing and reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    /// 4 raw little-endian bytes per position.
    FixedWidth,
    /// Count prefix plus varint encoded deltas.
    #[default]
    DeltaVarint,
}

impl Codec {
    /// The codec implementation behind this selection.
    pub fn codec(self) -> &'static dyn PostingCodec {
        match self {
            Codec::FixedWidth => &FixedWidthCodec,
            Codec::DeltaVarint => &DeltaVarintCodec,
        }
    }

    /// Encode a list with the selected codec.
    pub fn encode(self, list: &[Position]) -> Vec<u8> {
        match self {
            Codec::FixedWidth => FixedWidthCodec.encode(list),
            Codec::DeltaVarint => DeltaVarintCodec.encode(list),
        }
    }

    /// Decode a payload with the selected codec.
    pub fn decode(self, bytes: &[u8]) -> Result<PostingList> {
        match self {
            Codec::FixedWidth => FixedWidthCodec.decode(bytes),
            Codec::DeltaVarint => DeltaVarintCodec.decode(bytes),
        }
    }
}

impl FromStr for Codec {
    type Err = SuggestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed_width" | "binary" => Ok(Codec::FixedWidth),
            "delta_varint" | "vbyte" => Ok(Codec::DeltaVarint),
            other => Err(SuggestError::config(format!("Unknown codec: {other}"))),
        }
    }
}
