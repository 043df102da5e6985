//! Top-level facade crate for cutline.
//!
//! Re-exports the wire primitives and the gate so users can depend on a single crate.

pub mod core {
    pub use cutline_core::*;
}

pub mod gate {
    pub use cutline_gate::*;
}
