//! Interceptor module exports.
//!
//! A stage is built in three steps: [`Interceptor`] captures the policy once,
//! [`Interceptor::bind`] attaches the store context, and
//! [`BoundInterceptor::next`] attaches the downstream stage. The resulting
//! [`Stage`] handles each action.

pub mod stage;

pub use stage::{BoundInterceptor, Interceptor, Stage, StoreContext};
