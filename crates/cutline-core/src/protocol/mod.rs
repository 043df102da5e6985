//! Action wire formats.
//!
//! - `action`: the plain `{type, payload}` record flowing through a pipeline.
//! - `blocked`: the sentinel-prefixed envelope a gate emits in place of a
//!   denied action, plus detection and decoding.
//!
//! Decoding untyped input never panics: a missing or non-string `type` is a
//! `CutError::MalformedAction`.

pub mod action;
pub mod blocked;
