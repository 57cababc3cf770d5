//! R interop call protocol messages.
//!
//! The messages are encoded with the [wire] codec and carried by the call dispatch layer, which
//! is not part of this crate.

pub mod copy_to_persistent_ref;

pub use copy_to_persistent_ref::{CopyToPersistentRefResponse, Response, ResponseCase};
