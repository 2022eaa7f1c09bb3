//! Fixed-width posting list codec.

use byteorder::{ByteOrder, LittleEndian};

use crate::compression::{MIN_PAYLOAD_LEN, Position, PostingCodec, PostingList};
use crate::error::Result;

/// Stores each position as 4 little-endian bytes with no separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthCodec;

impl PostingCodec for FixedWidthCodec {
    fn encode(&self, list: &[Position]) -> Vec<u8> {
        let mut bytes = vec![0u8; list.len() * 4];
        LittleEndian::write_u32_into(list, &mut bytes);
        bytes
    }

    fn decode(&self, bytes: &[u8]) -> Result<PostingList> {
        if bytes.len() < MIN_PAYLOAD_LEN {
            return Ok(Vec::new());
        }

        // A trailing partial group is not a position.
        let whole = bytes.len() / 4 * 4;
        let mut list = vec![0; whole / 4];
        LittleEndian::read_u32_into(&bytes[..whole], &mut list);

        Ok(list)
    }

    fn name(&self) -> &'static str {
        "fixed_width"
    }
}
