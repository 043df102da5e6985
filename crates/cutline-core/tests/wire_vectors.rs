//! Blocked-envelope wire vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cutline_core::{is_blocked_value, Dispatched};

use vector_loader::load;

const FILES: [&str; 10] = [
    "plain_action.json",
    "plain_no_payload.json",
    "blocked_action.json",
    "blocked_bare_payload.json",
    "missing_type.json",
    "numeric_type.json",
    "sentinel_without_space.json",
    "plain_with_meta.json",
    "blocked_with_meta.json",
    "blocked_envelope_extra_key.json",
];

#[test]
fn decode_vectors() {
    for f in FILES {
        let v = load(f);
        let res = Dispatched::from_wire(v.action.clone());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let d = res.expect("expected ok action");
        let ex = v.expect.expect("missing expect block");
        assert_eq!(d.is_blocked(), ex.blocked, "vector={}", v.description);
        assert_eq!(d.action_type(), ex.action_type, "vector={}", v.description);
        assert_eq!(d.original().action_type(), ex.original_type, "vector={}", v.description);
        assert_eq!(is_blocked_value(&v.action).unwrap(), ex.blocked, "vector={}", v.description);
    }
}

#[test]
fn decoded_envelopes_reserialize_identically() {
    for f in [
        "plain_action.json",
        "blocked_action.json",
        "plain_with_meta.json",
        "blocked_with_meta.json",
    ] {
        let v = load(f);
        let d = Dispatched::from_wire(v.action.clone()).unwrap();
        assert_eq!(serde_json::to_value(&d).unwrap(), v.action, "vector={}", v.description);
        assert_eq!(serde_json::to_value(d.into_wire()).unwrap(), v.action, "vector={}", v.description);
    }
}
