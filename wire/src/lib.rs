//! This library provides the wire codec shared by the R interop messages.
//!
//! It contains the [wire types and keys](wire_type), the [serializer and
//! deserializer](codec), the capture of [unknown fields](unknown), the [Message] trait tying them
//! together and the [decode limits](config) applied to untrusted input.
//!
//! The format is the protobuf wire format: every entry starts with a varint key made of field
//! number and wire type, followed by its payload.

mod impl_macros;

pub mod codec;
pub mod config;
pub mod error;
pub mod message;
pub mod unknown;
pub mod wire_type;

pub use codec::{Deserializer, Serializer};
pub use config::DecodeLimits;
pub use error::{ErrorKind, WireError};
pub use message::{Message, Serializable};
pub use unknown::{UnknownField, UnknownFields};
pub use wire_type::{Key, WireType};

pub type Result<T> = std::result::Result<T, WireError>;
