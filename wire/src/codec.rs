//! Low level (de-)serialization of protobuf style field entries
//!
//! Serialization happens in two passes: the caller first computes the exact length of the
//! message (see [Serializable::encoded_len](crate::Serializable::encoded_len)), allocates a buffer
//! of that size and then lets the [Serializer] fill it. The serializer never grows the buffer.

use crate::Result;
use crate::config::DecodeLimits;
use crate::error::WireError;
use crate::wire_type::{Key, WireType};

/// A varint never takes more than 10 bytes (64 bits / 7 bits per byte)
pub const MAX_VARINT_LEN: usize = 10;

/// The number of bytes `v` takes when encoded as varint
pub fn varint_len(v: u64) -> usize {
    let bits = 64 - (v | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Encoded length of an `int32` field entry including its key.
///
/// Negative values are sign extended to 64 bit before encoding, so they always take 10 bytes.
pub fn int32_len(field_number: u32, v: i32) -> usize {
    Key::new(field_number, WireType::Varint).encoded_len() + varint_len(v as i64 as u64)
}

/// Encoded length of a `string` field entry including its key and length prefix
pub fn string_len(field_number: u32, v: &str) -> usize {
    Key::new(field_number, WireType::LengthDelimited).encoded_len()
        + varint_len(v.len() as u64)
        + v.len()
}

// SERIALIZATION

/// Serializes field entries into a target buffer
#[derive(Debug)]
pub struct Serializer<'a> {
    /// The target buffer
    target_buf: &'a mut [u8],
    /// The position of the write cursor in the buffer. This equals to the number of bytes written.
    write_pos: usize,
}

impl<'a> Serializer<'a> {
    /// Creates a new Serializer object, writing into the given buffer. The buffer must be big
    /// enough to take all the data.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            target_buf: buf,
            write_pos: 0,
        }
    }

    /// Checks that the whole buffer has been filled - meant to be called after serializing into a
    /// buffer sized by the first pass.
    pub fn finish(self) -> Result<()> {
        let left = self.target_buf.len() - self.write_pos;
        if left > 0 {
            return Err(WireError::invalid_argument(format!(
                "Serialization did not fill the whole buffer, {left} bytes are left"
            )));
        }

        Ok(())
    }

    /// Serialize the given slice as bytes. This is also the base operation for the other ops.
    pub fn bytes(&mut self, v: &[u8]) -> Result<()> {
        match self
            .target_buf
            .get_mut(self.write_pos..(self.write_pos + v.len()))
        {
            Some(sub) => {
                sub.copy_from_slice(v);
                self.write_pos += v.len();
                Ok(())
            }
            None => Err(WireError::invalid_argument(format!(
                "Tried to write {} bytes but target buffer only has {} left",
                v.len(),
                self.target_buf.len() - self.write_pos
            ))),
        }
    }

    /// Serialize a base 128 varint, least significant group first
    pub fn varint(&mut self, mut v: u64) -> Result<()> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut len = 0;

        while v >= 0x80 {
            buf[len] = (v as u8) | 0x80;
            v >>= 7;
            len += 1;
        }
        buf[len] = v as u8;

        self.bytes(&buf[..=len])
    }

    pub fn key(&mut self, key: Key) -> Result<()> {
        self.varint(key.to_tag().into())
    }

    /// Serialize an `int32` field entry
    pub fn int32(&mut self, field_number: u32, v: i32) -> Result<()> {
        self.key(Key::new(field_number, WireType::Varint))?;
        self.varint(v as i64 as u64)
    }

    /// Serialize a `string` field entry
    pub fn string(&mut self, field_number: u32, v: &str) -> Result<()> {
        self.key(Key::new(field_number, WireType::LengthDelimited))?;
        self.length_delimited(v.as_bytes())
    }

    /// Serialize a byte run prefixed by its length
    pub fn length_delimited(&mut self, v: &[u8]) -> Result<()> {
        self.varint(v.len() as u64)?;
        self.bytes(v)
    }

    /// The amount of bytes written to the buffer
    pub fn bytes_written(&self) -> usize {
        self.write_pos
    }
}

// DESERIALIZATION

/// Deserializes field entries from a source buffer
#[derive(Debug)]
pub struct Deserializer<'a> {
    /// The source buffer
    source_buf: &'a [u8],
    /// The position of the read cursor in the buffer
    read_pos: usize,
    limits: DecodeLimits,
}

impl<'a> Deserializer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, DecodeLimits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            source_buf: buf,
            read_pos: 0,
            limits,
        }
    }

    /// Checks that the whole buffer has been consumed - meant to be called after deserialization
    /// as a sanity check.
    pub fn finish(&self) -> Result<()> {
        let len = self.remaining();
        if len > 0 {
            return Err(WireError::malformed(format!(
                "Did not consume the whole buffer, {len} bytes are left"
            )));
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The number of bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.source_buf.len() - self.read_pos
    }

    /// The position of the read cursor. Equals the number of bytes consumed.
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// The bytes consumed since the read cursor was at `start`
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.source_buf[start..self.read_pos]
    }

    /// Deserialize a base 128 varint.
    ///
    /// Bits beyond the 64th are discarded, more than 10 bytes are rejected.
    pub fn varint(&mut self) -> Result<u64> {
        let mut value = 0u64;

        for i in 0..MAX_VARINT_LEN {
            let b = self.take(1)?[0];
            value |= u64::from(b & 0x7F) << (7 * i);

            if b & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(WireError::malformed(format!(
            "Varint is longer than {MAX_VARINT_LEN} bytes"
        )))
    }

    pub fn key(&mut self) -> Result<Key> {
        Key::from_tag(self.varint()?)
    }

    /// Deserialize the value of an `int32` entry. Only the lower 32 bits of the varint are kept.
    pub fn int32(&mut self) -> Result<i32> {
        Ok(self.varint()? as i32)
    }

    /// Deserialize the value of a `string` entry. The bytes must be valid UTF-8.
    pub fn string(&mut self) -> Result<String> {
        let bytes = self.length_delimited()?;

        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(err) => Err(WireError::malformed(format!("String is not valid UTF-8: {err}"))),
        }
    }

    /// Deserialize a byte run prefixed by its length
    pub fn length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.varint()?;
        let len = usize::try_from(len)
            .map_err(|_| WireError::truncated(usize::MAX, self.remaining()))?;
        self.take(len)
    }

    pub fn fixed32(&mut self) -> Result<[u8; 4]> {
        let mut v = [0u8; 4];
        v.copy_from_slice(self.take(4)?);
        Ok(v)
    }

    pub fn fixed64(&mut self) -> Result<[u8; 8]> {
        let mut v = [0u8; 8];
        v.copy_from_slice(self.take(8)?);
        Ok(v)
    }

    /// Skips the payload of an entry whose key has already been read.
    ///
    /// Groups are skipped including all nested entries up to the matching end group key.
    pub fn skip_field(&mut self, key: Key) -> Result<()> {
        self.skip_field_at(key, 0)
    }

    fn skip_field_at(&mut self, key: Key, depth: u32) -> Result<()> {
        match key.wire_type {
            WireType::Varint => {
                self.varint()?;
            }
            WireType::Fixed64 => {
                self.fixed64()?;
            }
            WireType::LengthDelimited => {
                self.length_delimited()?;
            }
            WireType::Fixed32 => {
                self.fixed32()?;
            }
            WireType::StartGroup => {
                if depth >= self.limits.max_group_depth {
                    return Err(WireError::malformed(format!(
                        "Groups are nested deeper than {}",
                        self.limits.max_group_depth
                    )));
                }

                loop {
                    if self.is_empty() {
                        return Err(WireError::truncated(1, 0));
                    }

                    let inner = self.key()?;
                    if inner.wire_type == WireType::EndGroup {
                        if inner.field_number != key.field_number {
                            return Err(WireError::malformed(format!(
                                "End group key for field {} does not match start group of field {}",
                                inner.field_number, key.field_number
                            )));
                        }
                        break;
                    }

                    self.skip_field_at(inner, depth + 1)?;
                }
            }
            WireType::EndGroup => {
                return Err(WireError::malformed(format!(
                    "Unexpected end group key for field {}",
                    key.field_number
                )));
            }
        }

        Ok(())
    }

    /// Takes the next n bytes from the source buffer, checking that there are enough left.
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(WireError::truncated(n, remaining));
        }

        let taken = &self.source_buf[self.read_pos..(self.read_pos + n)];
        self.read_pos += n;
        Ok(taken)
    }
}
