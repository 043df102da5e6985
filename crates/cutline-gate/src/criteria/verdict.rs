//! Criteria results.

use serde_json::Value;

/// Outcome of one criteria function.
///
/// Only `Deny` (exactly `false`) blocks. Any other value, including `0`,
/// `""`, `null`, and `Undefined`, is opaque and never a denial.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Verdict {
    /// No value produced. Also the result of combining zero criteria.
    #[default]
    Undefined,
    /// Exactly `false`.
    Deny,
    /// Any other value.
    Permit(Value),
}

impl Verdict {
    /// Normalizing constructor: `Value::Bool(false)` becomes `Deny`.
    pub fn permit(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Bool(false) => Verdict::Deny,
            v => Verdict::Permit(v),
        }
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Verdict::Deny | Verdict::Permit(Value::Bool(false)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Verdict::Undefined)
    }
}

impl From<bool> for Verdict {
    fn from(b: bool) -> Self {
        if b {
            Verdict::Permit(Value::Bool(true))
        } else {
            Verdict::Deny
        }
    }
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Undefined
    }
}

impl From<Value> for Verdict {
    fn from(v: Value) -> Self {
        Verdict::permit(v)
    }
}

impl<T: Into<Verdict>> From<Option<T>> for Verdict {
    fn from(v: Option<T>) -> Self {
        v.map_or(Verdict::Undefined, Into::into)
    }
}
