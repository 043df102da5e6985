//! Criteria combinator.
//!
//! Merges independently authored, named criteria into one criteria function
//! with "first `false` wins" semantics. Entries are evaluated in insertion
//! order and evaluation stops at the first denial, so later entries are
//! never invoked once one has denied.

use std::fmt;

use cutline_core::Action;
use serde_json::Value;

use crate::config::schema::CriteriaSection;

use super::{BoxedCriteria, Criteria, Verdict};

/// Value slot of a criteria mapping.
///
/// Dynamic mappings may hold things that are not criteria (`Inert`); the
/// combinator drops those and never touches them.
pub enum CriteriaEntry<S, P> {
    Callable(BoxedCriteria<S, P>),
    Inert(Value),
}

impl<S, P> CriteriaEntry<S, P> {
    pub fn callable<C>(criteria: C) -> Self
    where
        C: Criteria<S, P> + Send + Sync + 'static,
    {
        CriteriaEntry::Callable(Box::new(criteria))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, CriteriaEntry::Callable(_))
    }
}

impl<S, P> From<Value> for CriteriaEntry<S, P> {
    fn from(v: Value) -> Self {
        CriteriaEntry::Inert(v)
    }
}

impl<S, P> fmt::Debug for CriteriaEntry<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaEntry::Callable(_) => f.write_str("Callable(..)"),
            CriteriaEntry::Inert(v) => f.debug_tuple("Inert").field(v).finish(),
        }
    }
}

/// Ordered mapping of policy name to criteria.
///
/// Names are for diagnostics only. Inserting an existing name replaces the
/// entry but keeps its original position.
pub struct CriteriaSet<S, P> {
    entries: Vec<(String, CriteriaEntry<S, P>)>,
}

impl<S, P> Default for CriteriaSet<S, P> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<S, P> CriteriaSet<S, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: CriteriaEntry<S, P>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Adds a closure criteria and returns self for chaining.
    pub fn with<F, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&S, &Action<P>) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.insert(name, CriteriaEntry::callable(f));
        self
    }

    /// Adds any criteria implementation, e.g. another combined set.
    pub fn with_criteria<C>(mut self, name: impl Into<String>, criteria: C) -> Self
    where
        C: Criteria<S, P> + Send + Sync + 'static,
    {
        self.insert(name, CriteriaEntry::callable(criteria));
        self
    }

    /// Adds a non-criteria value. It is kept in the mapping but ignored by
    /// [`combine`].
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, CriteriaEntry::Inert(value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All names in insertion order, callable or not.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn combine(self) -> CombinedCriteria<S, P> {
        combine(self)
    }

    pub fn combine_with(self, cfg: &CriteriaSection) -> CombinedCriteria<S, P> {
        combine(self).trace_denials(cfg.trace_denials)
    }
}

impl<S, P, K: Into<String>> FromIterator<(K, CriteriaEntry<S, P>)> for CriteriaSet<S, P> {
    fn from_iter<I: IntoIterator<Item = (K, CriteriaEntry<S, P>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, entry) in iter {
            set.insert(name, entry);
        }
        set
    }
}

impl<S, P> fmt::Debug for CriteriaSet<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(n, e)| (n, e)))
            .finish()
    }
}

/// Merge a criteria mapping into one criteria function.
///
/// Non-callable entries are filtered out here, once. The surviving order is
/// the evaluation order.
pub fn combine<S, P>(set: CriteriaSet<S, P>) -> CombinedCriteria<S, P> {
    let entries: Vec<_> = set
        .entries
        .into_iter()
        .filter_map(|(name, entry)| match entry {
            CriteriaEntry::Callable(c) => Some((name, c)),
            CriteriaEntry::Inert(_) => None,
        })
        .collect();

    CombinedCriteria {
        entries,
        trace_denials: true,
    }
}

/// Result of a combined evaluation, with the name of the denying criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub denied_by: Option<String>,
    /// Number of criteria actually invoked.
    pub evaluated: usize,
}

/// Composite criteria produced by [`combine`].
pub struct CombinedCriteria<S, P> {
    entries: Vec<(String, BoxedCriteria<S, P>)>,
    trace_denials: bool,
}

impl<S, P> CombinedCriteria<S, P> {
    /// Enables or disables the debug event emitted on denial.
    pub fn trace_denials(mut self, enabled: bool) -> Self {
        self.trace_denials = enabled;
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate in order, stopping at the first denial.
    ///
    /// Returns `Deny` if any entry denied, otherwise the verdict of the last
    /// entry. With no entries nothing is invoked and the verdict is
    /// `Undefined`.
    pub fn explain(&self, state: &S, action: &Action<P>) -> Evaluation {
        let mut verdict = Verdict::Undefined;

        for (i, (name, criteria)) in self.entries.iter().enumerate() {
            verdict = criteria.evaluate(state, action);
            if verdict.is_deny() {
                if self.trace_denials {
                    tracing::debug!(
                        criteria = %name,
                        position = i,
                        action_type = %action.action_type,
                        "criteria denied action"
                    );
                }
                return Evaluation {
                    verdict: Verdict::Deny,
                    denied_by: Some(name.clone()),
                    evaluated: i + 1,
                };
            }
        }

        Evaluation {
            verdict,
            denied_by: None,
            evaluated: self.entries.len(),
        }
    }
}

impl<S, P> Criteria<S, P> for CombinedCriteria<S, P> {
    fn evaluate(&self, state: &S, action: &Action<P>) -> Verdict {
        self.explain(state, action).verdict
    }
}

impl<S, P> fmt::Debug for CombinedCriteria<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedCriteria")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("trace_denials", &self.trace_denials)
            .finish()
    }
}
