//! Variable-length integer encoding utilities.
//!
//! Values are written 7 bits at a time, least significant group first, with
//! the high bit set on every byte except the last one of a value.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{Result, SuggestError};

/// Maximum number of bytes a varint-encoded u32 can occupy.
pub const MAX_U32_LEN: usize = 5;

/// The last byte of a u32 carries only bits 28..32.
const LAST_BYTE_MAX: u8 = 0x0F;

/// Number of bytes `value` occupies once varint encoded.
pub fn encoded_len_u32(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}

/// Append the varint encoding of `value` to `out`.
pub fn encode_u32_into(value: u32, out: &mut Vec<u8>) {
    let mut val = value;

    while val >= 0x80 {
        out.push((val as u8) | 0x80);
        val >>= 7;
    }

    out.push(val as u8);
}

/// Encode a u32 value using variable-length encoding.
pub fn encode_u32(value: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encoded_len_u32(value));
    encode_u32_into(value, &mut bytes);
    bytes
}

/// Decode a u32 value from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut result = 0u32;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_U32_LEN || (i == MAX_U32_LEN - 1 && byte > LAST_BYTE_MAX) {
            return Err(SuggestError::codec("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u32) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(SuggestError::codec("Incomplete VarInt"))
}

/// Write a variable-length encoded u32 to a writer.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<usize> {
    let bytes = encode_u32(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u32 from a reader.
pub fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut result = 0u32;
    let mut shift = 0;

    for i in 0..MAX_U32_LEN {
        let byte = reader.read_u8()?;
        if i == MAX_U32_LEN - 1 && byte > LAST_BYTE_MAX {
            return Err(SuggestError::codec("VarInt overflow"));
        }
        result |= ((byte & 0x7F) as u32) << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
    }

    Err(SuggestError::codec("VarInt overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode_u32() {
        let test_values = [0, 1, 127, 128, 255, 256, 16383, 16384, u32::MAX];

        for &value in &test_values {
            let encoded = encode_u32(value);
            let (decoded, bytes_read) = decode_u32(&encoded).unwrap();

            assert_eq!(value, decoded);
            assert_eq!(encoded.len(), bytes_read);
            assert_eq!(encoded.len(), encoded_len_u32(value));
        }
    }

    #[test]
    fn test_write_read_u32() {
        let mut buffer = Vec::new();
        let value = 12345u32;

        let bytes_written = write_u32(&mut buffer, value).unwrap();
        assert_eq!(bytes_written, buffer.len());

        let mut cursor = Cursor::new(buffer);
        let decoded = read_u32(&mut cursor).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn test_encoding_efficiency() {
        assert_eq!(encode_u32(0).len(), 1);
        assert_eq!(encode_u32(127).len(), 1);
        assert_eq!(encode_u32(128).len(), 2);
        assert_eq!(encode_u32(16383).len(), 2);
        assert_eq!(encode_u32(16384).len(), 3);
        assert_eq!(encode_u32(u32::MAX).len(), MAX_U32_LEN);
    }

    #[test]
    fn test_decode_reads_only_first_value() {
        let mut buffer = encode_u32(300);
        buffer.extend(encode_u32(7));

        let (value, read) = decode_u32(&buffer).unwrap();
        assert_eq!(value, 300);
        assert_eq!(read, 2);
        assert_eq!(decode_u32(&buffer[read..]).unwrap(), (7, 1));
    }

    #[test]
    fn test_incomplete_varint() {
        // Continuation bit set but no more data
        let incomplete = vec![0x80];
        assert!(decode_u32(&incomplete).is_err());
    }

    #[test]
    fn test_overflow() {
        let overflow_data = vec![0xFF; 10];
        assert!(decode_u32(&overflow_data).is_err());
        assert!(read_u32(&mut Cursor::new(overflow_data)).is_err());
    }

    #[test]
    fn test_rejects_bits_above_u32() {
        assert_eq!(decode_u32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]).unwrap(), (u32::MAX, 5));

        for data in [[0xFF, 0xFF, 0xFF, 0xFF, 0x10], [0x80, 0x80, 0x80, 0x80, 0x70]] {
            assert!(matches!(decode_u32(&data), Err(SuggestError::Codec(_))));
            assert!(matches!(
                read_u32(&mut Cursor::new(data)),
                Err(SuggestError::Codec(_))
            ));
        }
    }
}
