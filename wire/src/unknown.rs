//! Capture of field entries not known to a message
//!
//! Unknown entries are kept as the verbatim bytes they were decoded from (key included), so they
//! can be re-emitted unchanged by components that don't know about newer fields.

use crate::Result;
use crate::codec::{Deserializer, Serializer};
use crate::wire_type::{Key, WireType};
use bytes::Bytes;

/// One field entry not recognized by the message it was decoded into
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownField {
    key: Key,
    /// The complete entry as read from the wire, including key and (for groups) all nested
    /// entries
    raw: Bytes,
}

impl UnknownField {
    /// Creates an unknown field from an already validated entry
    pub(crate) fn new(key: Key, raw: &[u8]) -> Self {
        Self {
            key,
            raw: Bytes::copy_from_slice(raw),
        }
    }

    /// Parses exactly one complete field entry.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut des = Deserializer::new(raw);
        let key = des.key()?;
        des.skip_field(key)?;
        des.finish()?;

        Ok(Self::new(key, raw))
    }

    pub fn field_number(&self) -> u32 {
        self.key.field_number
    }

    pub fn wire_type(&self) -> WireType {
        self.key.wire_type
    }

    /// The verbatim bytes of the entry
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

/// Ordered collection of [UnknownField]s, kept in the order they were encountered
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UnknownFields(Vec<UnknownField>);

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnknownField> {
        self.0.iter()
    }

    pub fn push(&mut self, field: UnknownField) {
        self.0.push(field);
    }

    /// Appends all entries of `other` after the existing ones. No deduplication happens.
    pub fn extend_from(&mut self, other: &UnknownFields) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn encoded_len(&self) -> usize {
        self.0.iter().map(|f| f.raw.len()).sum()
    }

    /// Writes all captured entries back in their original order
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<()> {
        for f in self {
            ser.bytes(&f.raw)?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a UnknownFields {
    type Item = &'a UnknownField;
    type IntoIter = std::slice::Iter<'a, UnknownField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
