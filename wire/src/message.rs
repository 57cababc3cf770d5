//! The traits a message implements to be encoded, decoded and merged

use crate::Result;
use crate::codec::{Deserializer, Serializer, varint_len};
use crate::config::DecodeLimits;
use crate::unknown::{UnknownField, UnknownFields};
use crate::wire_type::Key;
use bytes::{Buf, Bytes, BytesMut};
use std::fmt::Debug;

/// Makes a type serializable in two passes
pub trait Serializable {
    /// The exact number of bytes [Serializable::serialize] writes
    fn encoded_len(&self) -> usize;

    /// Writes all set fields in field number order, followed by captured unknown fields
    fn serialize(&self, ser: &mut Serializer<'_>) -> Result<()>;
}

/// A message made of field entries
///
/// Implementors only handle their own fields in [Message::merge_field]. The provided methods
/// drive the decode loop, capture unknown entries and implement the two-pass encoding.
pub trait Message: Serializable + Default + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Decodes the payload of one entry whose key has already been read.
    ///
    /// Returns `false` without consuming anything if the field number is unknown to the message.
    /// Known field numbers with an unexpected wire type must be rejected.
    fn merge_field(&mut self, key: Key, des: &mut Deserializer<'_>) -> Result<bool>;

    /// Applies the state of `other` onto `self`.
    ///
    /// Set fields of `other` replace the ones in `self`, its unknown fields are appended.
    fn merge_from(&mut self, other: &Self);

    fn unknown_fields(&self) -> &UnknownFields;

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields;

    /// Encodes the message into a freshly allocated buffer of exactly the right size
    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0; self.encoded_len()];

        let mut ser = Serializer::new(&mut buf);
        self.serialize(&mut ser)?;
        ser.finish()?;

        Ok(buf)
    }

    /// Appends the message to `buf`, prefixed by its length as varint. `buf` is left at its
    /// original length on failure.
    fn encode_length_delimited(&self, buf: &mut BytesMut) -> Result<()> {
        let len = self.encoded_len();
        let start = buf.len();
        buf.resize(start + varint_len(len as u64) + len, 0);

        let res = {
            let mut ser = Serializer::new(&mut buf[start..]);
            ser.varint(len as u64)
                .and_then(|_| self.serialize(&mut ser))
                .and_then(|_| ser.finish())
        };

        if res.is_err() {
            buf.truncate(start);
        }

        res
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        Self::decode_with_limits(buf, &DecodeLimits::default())
    }

    fn decode_with_limits(buf: &[u8], limits: &DecodeLimits) -> Result<Self> {
        let mut msg = Self::default();
        msg.merge_from_bytes_with_limits(buf, limits)?;
        Ok(msg)
    }

    /// Decodes one length prefixed message from the front of `buf` and advances it past the
    /// message. `buf` is left untouched on failure.
    fn decode_length_delimited(buf: &mut Bytes, limits: &DecodeLimits) -> Result<Self> {
        let (msg, consumed) = {
            let mut des = Deserializer::with_limits(&buf[..], *limits);
            let body = des.length_delimited()?;
            (Self::decode_with_limits(body, limits)?, des.position())
        };

        buf.advance(consumed);
        Ok(msg)
    }

    /// Decodes `buf` on top of the current state, as if the message encoded in `buf` was merged
    /// in. The message is left unmodified if decoding fails.
    fn merge_from_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.merge_from_bytes_with_limits(buf, &DecodeLimits::default())
    }

    fn merge_from_bytes_with_limits(&mut self, buf: &[u8], limits: &DecodeLimits) -> Result<()> {
        limits.check_message_len(buf.len())?;

        let mut merged = self.clone();
        let mut des = Deserializer::with_limits(buf, *limits);

        if let Err(err) = merge_entries(&mut merged, &mut des) {
            log::debug!(
                target: "wire",
                "Decoding {} failed at byte {}: {err}",
                std::any::type_name::<Self>(),
                des.position()
            );
            return Err(err);
        }

        *self = merged;
        Ok(())
    }
}

/// Reads entries until the buffer is exhausted, handing known ones to the message and capturing
/// the rest
fn merge_entries<M: Message>(msg: &mut M, des: &mut Deserializer<'_>) -> Result<()> {
    while !des.is_empty() {
        let start = des.position();
        let key = des.key()?;

        if !msg.merge_field(key, des)? {
            des.skip_field(key)?;

            log::trace!(
                target: "wire",
                "Keeping unknown field {} ({:?}) of {}",
                key.field_number,
                key.wire_type,
                std::any::type_name::<M>()
            );

            msg.unknown_fields_mut()
                .push(UnknownField::new(key, des.consumed_since(start)));
        }
    }

    Ok(())
}
