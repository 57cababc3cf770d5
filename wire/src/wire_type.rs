//! Wire types and the key that precedes every field entry

use crate::Result;
use crate::codec::varint_len;
use crate::error::WireError;

/// The highest field number that fits into a key
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// The encoding category of a field entry, stored in the lowest three bits of its key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

crate::impl_enum_to_int!(WireType,
    Varint => 0,
    Fixed64 => 1,
    LengthDelimited => 2,
    StartGroup => 3,
    EndGroup => 4,
    Fixed32 => 5
);

/// Field number and wire type of an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    pub field_number: u32,
    pub wire_type: WireType,
}

impl Key {
    pub fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }

    /// Splits a raw tag as read from the wire into field number and wire type.
    pub fn from_tag(tag: u64) -> Result<Self> {
        let wire_type = WireType::try_from(tag & 0x7).map_err(WireError::malformed)?;

        let field_number = tag >> 3;
        if field_number == 0 {
            return Err(WireError::malformed("Field number 0 is invalid"));
        }
        if field_number > u64::from(MAX_FIELD_NUMBER) {
            return Err(WireError::malformed(format!(
                "Field number {field_number} exceeds the maximum of {MAX_FIELD_NUMBER}"
            )));
        }

        Ok(Self {
            field_number: field_number as u32,
            wire_type,
        })
    }

    pub fn to_tag(self) -> u32 {
        (self.field_number << 3) | u32::from(self.wire_type)
    }

    /// The serialized length of the key
    pub fn encoded_len(self) -> usize {
        varint_len(self.to_tag().into())
    }

    /// Fails if the entry was not encoded with the wire type the field number requires.
    pub fn expect_wire_type(self, expected: WireType) -> Result<()> {
        if self.wire_type != expected {
            return Err(WireError::malformed(format!(
                "Field {} has wire type {:?}, expected {expected:?}",
                self.field_number, self.wire_type
            )));
        }

        Ok(())
    }
}
