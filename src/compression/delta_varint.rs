//! Delta + varint posting list codec.
//!
//! Layout: a 4 byte little-endian element count, then for every element the
//! difference to its predecessor (the first element is taken relative to 0)
//! as a varint.

use byteorder::{ByteOrder, LittleEndian};

use crate::compression::{MIN_PAYLOAD_LEN, Position, PostingCodec, PostingList};
use crate::error::{Result, SuggestError};
use crate::util::varint::{decode_u32, encode_u32_into, encoded_len_u32};

/// Delta-varint codec for sorted posting lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaVarintCodec;

impl PostingCodec for DeltaVarintCodec {
    fn encode(&self, list: &[Position]) -> Vec<u8> {
        let mut prev = 0u32;
        let mut size = MIN_PAYLOAD_LEN;
        for &value in list {
            size += encoded_len_u32(value.wrapping_sub(prev));
            prev = value;
        }

        let mut bytes = Vec::with_capacity(size);
        bytes.extend_from_slice(&(list.len() as u32).to_le_bytes());

        prev = 0;
        for &value in list {
            encode_u32_into(value.wrapping_sub(prev), &mut bytes);
            prev = value;
        }

        bytes
    }

    fn decode(&self, bytes: &[u8]) -> Result<PostingList> {
        if bytes.len() < MIN_PAYLOAD_LEN {
            return Ok(Vec::new());
        }

        let count = LittleEndian::read_u32(bytes) as usize;
        let data = &bytes[MIN_PAYLOAD_LEN..];

        // Every element needs at least one byte.
        if count > data.len() {
            return Err(SuggestError::codec(format!(
                "Payload declares {count} positions but holds only {} bytes",
                data.len()
            )));
        }

        let mut list = Vec::with_capacity(count);
        let mut offset = 0;
        let mut prev = 0u32;

        for _ in 0..count {
            let (delta, read) = decode_u32(&data[offset..])?;
            offset += read;
            prev = prev.wrapping_add(delta);
            list.push(prev);
        }

        Ok(list)
    }

    fn name(&self) -> &'static str {
        "delta_varint"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_value_fixture() {
        let bytes = DeltaVarintCodec.encode(&[5, 5]);
        assert_eq!(bytes, vec![0x02, 0x00, 0x00, 0x00, 0x05, 0x00]);
        assert_eq!(DeltaVarintCodec.decode(&bytes).unwrap(), vec![5, 5]);
    }

    #[test]
    fn test_multi_byte_deltas() {
        let list = vec![3, 200, 20_000, 3_000_000];
        let bytes = DeltaVarintCodec.encode(&list);

        // Deltas 3, 197, 19_800 and 2_980_000.
        assert_eq!(bytes.len(), 4 + 1 + 2 + 3 + 4);
        assert_eq!(DeltaVarintCodec.decode(&bytes).unwrap(), list);
    }

    #[test]
    fn test_empty_list() {
        let bytes = DeltaVarintCodec.encode(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(DeltaVarintCodec.decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_short_payload_is_empty() {
        assert!(DeltaVarintCodec.decode(&[2, 0, 0]).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_payload_is_error() {
        let mut bytes = DeltaVarintCodec.encode(&[1, 2, 300]);
        bytes.pop();
        assert!(DeltaVarintCodec.decode(&bytes).is_err());

        // Count larger than the payload can hold.
        assert!(DeltaVarintCodec.decode(&[9, 0, 0, 0, 1]).is_err());
    }
}
