//! Response to copying an R value into the persistent reference storage
//!
//! Carries either the index of the new persistent reference or a description of why copying
//! failed, as the `response` oneof:
//!
//! | Field # | Name            | Wire type        |
//! |---------|-----------------|------------------|
//! | 1       | persistentIndex | varint (`int32`) |
//! | 2       | error           | length-delimited |

use wire::codec::{int32_len, string_len};
use wire::{
    Deserializer, Key, Message, Result, Serializable, Serializer, UnknownFields, WireError,
    WireType,
};

/// Which field of the `response` oneof is set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseCase {
    #[default]
    NotSet,
    PersistentIndex,
    Error,
}

/// The field number of the field a case stands for, 0 for [ResponseCase::NotSet]
impl From<ResponseCase> for u32 {
    fn from(value: ResponseCase) -> u32 {
        match value {
            ResponseCase::NotSet => 0,
            ResponseCase::PersistentIndex => {
                CopyToPersistentRefResponse::PERSISTENT_INDEX_FIELD_NUMBER
            }
            ResponseCase::Error => CopyToPersistentRefResponse::ERROR_FIELD_NUMBER,
        }
    }
}

/// The `response` oneof. At most one of its fields is set at any time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Response {
    #[default]
    Unset,
    PersistentIndex(i32),
    Error(String),
}

impl Response {
    pub fn case(&self) -> ResponseCase {
        match self {
            Self::Unset => ResponseCase::NotSet,
            Self::PersistentIndex(_) => ResponseCase::PersistentIndex,
            Self::Error(_) => ResponseCase::Error,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CopyToPersistentRefResponse {
    response: Response,
    unknown_fields: UnknownFields,
}

impl CopyToPersistentRefResponse {
    pub const PERSISTENT_INDEX_FIELD_NUMBER: u32 = 1;
    pub const ERROR_FIELD_NUMBER: u32 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistent_index(v: i32) -> Self {
        let mut msg = Self::new();
        msg.set_persistent_index(v);
        msg
    }

    pub fn with_error(v: impl Into<String>) -> Self {
        let mut msg = Self::new();
        msg.set_error(v);
        msg
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_case(&self) -> ResponseCase {
        self.response.case()
    }

    /// The persistent index, or 0 if the response is not a persistent index
    pub fn persistent_index(&self) -> i32 {
        match self.response {
            Response::PersistentIndex(v) => v,
            _ => 0,
        }
    }

    pub fn has_persistent_index(&self) -> bool {
        matches!(self.response, Response::PersistentIndex(_))
    }

    /// The error description, or an empty string if the response is not an error
    pub fn error(&self) -> &str {
        match &self.response {
            Response::Error(v) => v,
            _ => "",
        }
    }

    pub fn error_bytes(&self) -> &[u8] {
        self.error().as_bytes()
    }

    pub fn has_error(&self) -> bool {
        matches!(self.response, Response::Error(_))
    }

    /// Sets the response to a persistent index, dropping a previously set error
    pub fn set_persistent_index(&mut self, v: i32) {
        self.response = Response::PersistentIndex(v);
    }

    /// Sets the response to an error, dropping a previously set persistent index
    pub fn set_error(&mut self, v: impl Into<String>) {
        self.response = Response::Error(v.into());
    }

    /// Sets the response to an error given as raw bytes.
    ///
    /// Fails if the bytes are not valid UTF-8, the message is left unchanged in that case.
    pub fn set_error_bytes(&mut self, v: Vec<u8>) -> Result<()> {
        let v = String::from_utf8(v).map_err(|err| {
            WireError::invalid_argument(format!("Error description is not valid UTF-8: {err}"))
        })?;

        self.set_error(v);
        Ok(())
    }

    /// Unsets the response. Unknown fields are kept.
    pub fn clear(&mut self) {
        self.response = Response::Unset;
    }

    /// Unsets the response if it is a persistent index
    pub fn clear_persistent_index(&mut self) {
        if self.has_persistent_index() {
            self.clear();
        }
    }

    /// Unsets the response if it is an error
    pub fn clear_error(&mut self) {
        if self.has_error() {
            self.clear();
        }
    }

    pub fn clear_unknown_fields(&mut self) {
        self.unknown_fields.clear();
    }

    /// Converts the response into the outcome it describes, `None` if it is unset
    pub fn into_result(self) -> Option<std::result::Result<i32, String>> {
        match self.response {
            Response::Unset => None,
            Response::PersistentIndex(v) => Some(Ok(v)),
            Response::Error(v) => Some(Err(v)),
        }
    }
}

impl From<std::result::Result<i32, String>> for CopyToPersistentRefResponse {
    fn from(value: std::result::Result<i32, String>) -> Self {
        match value {
            Ok(v) => Self::with_persistent_index(v),
            Err(v) => Self::with_error(v),
        }
    }
}

impl Serializable for CopyToPersistentRefResponse {
    fn encoded_len(&self) -> usize {
        let response_len = match &self.response {
            Response::Unset => 0,
            Response::PersistentIndex(v) => int32_len(Self::PERSISTENT_INDEX_FIELD_NUMBER, *v),
            Response::Error(v) => string_len(Self::ERROR_FIELD_NUMBER, v),
        };

        response_len + self.unknown_fields.encoded_len()
    }

    fn serialize(&self, ser: &mut Serializer<'_>) -> Result<()> {
        match &self.response {
            Response::Unset => {}
            Response::PersistentIndex(v) => ser.int32(Self::PERSISTENT_INDEX_FIELD_NUMBER, *v)?,
            Response::Error(v) => ser.string(Self::ERROR_FIELD_NUMBER, v)?,
        }

        self.unknown_fields.serialize(ser)
    }
}

impl Message for CopyToPersistentRefResponse {
    fn merge_field(&mut self, key: Key, des: &mut Deserializer<'_>) -> Result<bool> {
        let response = match key.field_number {
            Self::PERSISTENT_INDEX_FIELD_NUMBER => {
                key.expect_wire_type(WireType::Varint)?;
                Response::PersistentIndex(des.int32()?)
            }
            Self::ERROR_FIELD_NUMBER => {
                key.expect_wire_type(WireType::LengthDelimited)?;
                Response::Error(des.string()?)
            }
            _ => return Ok(false),
        };

        if self.response != Response::Unset {
            log::trace!(
                target: "wire",
                "Response {:?} is replaced by field {}",
                self.response.case(),
                key.field_number
            );
        }

        self.response = response;
        Ok(true)
    }

    fn merge_from(&mut self, other: &Self) {
        if other.response != Response::Unset {
            self.response = other.response.clone();
        }

        self.unknown_fields.extend_from(&other.unknown_fields);
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}
