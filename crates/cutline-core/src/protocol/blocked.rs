//! Blocked-envelope codec.
//!
//! A denied action is not dropped: it is rewritten into an envelope whose
//! `type` is the original type behind [`SENTINEL`] and whose `payload` is the
//! whole original action. Detection is purely prefix based, so any tool that
//! only understands `{type, payload}` records can still see the denial.

use std::borrow::Cow;

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{CutError, Result};
use crate::protocol::action::Action;

/// Prefix of every blocked action type: U+1F6AB (no entry sign, UTF-16
/// `55357, 57003`) followed by a single space.
pub const SENTINEL: &str = "\u{1F6AB} ";

/// True if `action_type` carries the blocked sentinel.
pub fn is_blocked_type(action_type: &str) -> bool {
    action_type.starts_with(SENTINEL)
}

/// True if the action was emitted by a gate to mark another action as blocked.
pub fn is_blocked<P>(action: &Action<P>) -> bool {
    is_blocked_type(&action.action_type)
}

/// Detection over untyped input.
///
/// A missing or non-string `type` is a precondition violation and fails with
/// `MalformedAction` instead of reading as "not blocked".
pub fn is_blocked_value(action: &Value) -> Result<bool> {
    Ok(is_blocked_type(type_field(action)?))
}

/// Wrap `action` into a blocked envelope. The original is moved, not copied.
///
/// Encoding an already-blocked action nests it and doubles the prefix.
pub fn encode<P>(action: Action<P>) -> BlockedEnvelope<P> {
    BlockedEnvelope { original: action }
}

/// A denied action, carrying the original for provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockedEnvelope<P = Value> {
    original: Action<P>,
}

impl<P> BlockedEnvelope<P> {
    /// Wire type: sentinel followed by the original type.
    pub fn action_type(&self) -> String {
        format!("{SENTINEL}{}", self.original.action_type)
    }

    /// The action that was denied.
    pub fn original(&self) -> &Action<P> {
        &self.original
    }

    pub fn into_original(self) -> Action<P> {
        self.original
    }

    /// Wire form: a plain action whose payload is the original action.
    pub fn into_action(self) -> Action<Action<P>> {
        Action::new(self.action_type(), self.original)
    }
}

#[derive(serde::Serialize)]
struct WireRef<'a, P> {
    #[serde(rename = "type")]
    action_type: String,
    payload: &'a Action<P>,
}

impl<P: Serialize> Serialize for BlockedEnvelope<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireRef {
            action_type: self.action_type(),
            payload: &self.original,
        }
        .serialize(serializer)
    }
}

/// What a gate hands to the next stage.
///
/// `Blocked` is an envelope whose original is reachable. `Action` is forwarded
/// as-is; in untyped pipelines it may still be a raw envelope emitted
/// upstream, which [`Dispatched::normalize`] lifts into `Blocked`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Dispatched<P = Value> {
    Action(Action<P>),
    Blocked(BlockedEnvelope<P>),
}

impl<P> Dispatched<P> {
    /// True for an envelope. Agrees with [`Dispatched::as_blocked`].
    pub fn is_blocked(&self) -> bool {
        matches!(self, Dispatched::Blocked(_))
    }

    /// True if the wire type carries the sentinel, whether or not the
    /// envelope has been decoded.
    pub fn carries_sentinel(&self) -> bool {
        match self {
            Dispatched::Action(a) => is_blocked(a),
            Dispatched::Blocked(_) => true,
        }
    }

    /// Type as it appears on the wire.
    pub fn action_type(&self) -> Cow<'_, str> {
        match self {
            Dispatched::Action(a) => Cow::Borrowed(a.action_type.as_str()),
            Dispatched::Blocked(b) => Cow::Owned(b.action_type()),
        }
    }

    /// The forwarded action, or the denied original of an envelope.
    pub fn original(&self) -> &Action<P> {
        match self {
            Dispatched::Action(a) => a,
            Dispatched::Blocked(b) => b.original(),
        }
    }

    pub fn into_original(self) -> Action<P> {
        match self {
            Dispatched::Action(a) => a,
            Dispatched::Blocked(b) => b.into_original(),
        }
    }

    pub fn as_blocked(&self) -> Option<&BlockedEnvelope<P>> {
        match self {
            Dispatched::Blocked(b) => Some(b),
            Dispatched::Action(_) => None,
        }
    }
}

impl Dispatched<Value> {
    /// Decode an untyped wire action, recognizing blocked envelopes.
    ///
    /// Keys besides `type` and `payload` are kept on the action. An envelope
    /// must carry only `type` and `payload`, and its payload must be a
    /// well-formed action whose type matches the envelope type without the
    /// sentinel.
    pub fn from_wire(value: Value) -> Result<Self> {
        Self::try_from(split_action(value)?)
    }

    /// Lift a raw upstream envelope held in `Action` into `Blocked`.
    pub fn normalize(self) -> Result<Self> {
        match self {
            Dispatched::Action(a) => Self::try_from(a),
            blocked => Ok(blocked),
        }
    }

    /// Flatten into a plain untyped action, e.g. to feed another stage.
    pub fn into_wire(self) -> Action<Value> {
        match self {
            Dispatched::Action(a) => a,
            Dispatched::Blocked(b) => {
                let action_type = b.action_type();
                let Action {
                    action_type: orig_type,
                    payload,
                    extra,
                } = b.into_original();
                let mut inner = extra;
                inner.insert("type".into(), Value::String(orig_type));
                inner.insert("payload".into(), payload);
                Action::new(action_type, Value::Object(inner))
            }
        }
    }
}

impl TryFrom<Action<Value>> for Dispatched<Value> {
    type Error = CutError;

    fn try_from(action: Action<Value>) -> Result<Self> {
        let inner_type = match action.action_type.strip_prefix(SENTINEL) {
            Some(t) => t.to_owned(),
            None => return Ok(Dispatched::Action(action)),
        };

        if let Some(key) = action.extra.keys().next() {
            return Err(CutError::MalformedAction(format!(
                "blocked envelope carries unexpected key {key:?}"
            )));
        }

        let original = split_action(action.payload)
            .map_err(|e| CutError::MalformedAction(format!("blocked envelope payload: {e}")))?;
        if original.action_type != inner_type {
            return Err(CutError::MalformedAction(format!(
                "blocked envelope type {inner_type:?} does not match payload type {:?}",
                original.action_type
            )));
        }

        tracing::trace!(action_type = %original.action_type, "decoded blocked envelope");
        Ok(Dispatched::Blocked(encode(original)))
    }
}

impl<P> From<BlockedEnvelope<P>> for Dispatched<P> {
    fn from(b: BlockedEnvelope<P>) -> Self {
        Dispatched::Blocked(b)
    }
}

fn type_field(action: &Value) -> Result<&str> {
    match action.get("type") {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(CutError::MalformedAction(format!(
            "`type` must be a string, got {}",
            kind(other)
        ))),
        None => Err(CutError::MalformedAction("missing `type`".into())),
    }
}

fn split_action(value: Value) -> Result<Action<Value>> {
    let mut obj: Map<String, Value> = match value {
        Value::Object(m) => m,
        other => {
            return Err(CutError::MalformedAction(format!(
                "action must be an object, got {}",
                kind(&other)
            )))
        }
    };
    let action_type = match obj.remove("type") {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(CutError::MalformedAction(format!(
                "`type` must be a string, got {}",
                kind(&other)
            )))
        }
        None => return Err(CutError::MalformedAction("missing `type`".into())),
    };
    let payload = obj.remove("payload").unwrap_or(Value::Null);
    Ok(Action {
        action_type,
        payload,
        extra: obj,
    })
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
