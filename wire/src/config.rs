//! Decode limits
//!
//! Meant to be embedded into the configuration file of the application that receives messages,
//! e.g. as a `[decode_limits]` table in its TOML config. Missing keys take their default.

use crate::Result;
use crate::error::WireError;
use serde::Deserialize;

/// Upper bounds applied while decoding untrusted input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeLimits {
    /// Messages longer than this are rejected before decoding starts
    pub max_message_len: usize,
    /// How deep groups inside unknown fields may be nested
    pub max_group_depth: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_message_len: 64 << 20,
            max_group_depth: 100,
        }
    }
}

impl DecodeLimits {
    pub fn check_message_len(&self, len: usize) -> Result<()> {
        if len > self.max_message_len {
            return Err(WireError::malformed(format!(
                "Message of {len} bytes exceeds the size limit of {} bytes",
                self.max_message_len
            )));
        }

        Ok(())
    }
}
