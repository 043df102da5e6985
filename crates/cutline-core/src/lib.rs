//! cutline core: action wire shapes, the blocked-envelope codec, and errors.
//!
//! This crate defines the `{type, payload}` action record, the sentinel used
//! to tag denied actions, and the error surface shared with the gate. It
//! carries no pipeline logic so diagnostic tooling can depend on it alone to
//! recognize blocked envelopes.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed wire
//! input is reported as `CutError` rather than crashing the dispatcher.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{CutError, ErrorCode, Result};
pub use protocol::action::Action;
pub use protocol::blocked::{
    encode, is_blocked, is_blocked_type, is_blocked_value, BlockedEnvelope, Dispatched, SENTINEL,
};
