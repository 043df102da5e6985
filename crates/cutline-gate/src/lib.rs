//! cutline gate library entry.
//!
//! This crate wires criteria evaluation into a dispatch-pipeline stage: the
//! [`Interceptor`] consults a policy before every action and forwards either
//! the action or its blocked envelope. The [`criteria`] module merges named
//! criteria into one, and [`config`] carries the strict YAML settings.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod criteria;
pub mod intercept;

pub use criteria::{
    combine, CombinedCriteria, Criteria, CriteriaEntry, CriteriaSet, Evaluation, Verdict,
};
pub use intercept::{BoundInterceptor, Interceptor, Stage, StoreContext};
