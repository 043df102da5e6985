//! Criteria layer: verdicts, the criteria trait, and the combinator.
//!
//! A criteria function is a pure function of `(state, action)`. Closures
//! returning anything convertible into a [`Verdict`] implement [`Criteria`]
//! directly.

pub mod combine;
pub mod verdict;

use cutline_core::Action;

pub use combine::{combine, CombinedCriteria, CriteriaEntry, CriteriaSet, Evaluation};
pub use verdict::Verdict;

/// Policy predicate consulted for every dispatched action.
pub trait Criteria<S, P> {
    fn evaluate(&self, state: &S, action: &Action<P>) -> Verdict;
}

impl<S, P, F, R> Criteria<S, P> for F
where
    F: Fn(&S, &Action<P>) -> R,
    R: Into<Verdict>,
{
    fn evaluate(&self, state: &S, action: &Action<P>) -> Verdict {
        self(state, action).into()
    }
}

/// Boxed criteria, as stored by a [`CriteriaSet`].
pub type BoxedCriteria<S, P> = Box<dyn Criteria<S, P> + Send + Sync>;
