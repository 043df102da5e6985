//! End-to-end stage tests: combined criteria behind a configured interceptor.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use cutline_core::{is_blocked, Action, Dispatched, SENTINEL};
use cutline_gate::{config, CriteriaSet, Interceptor};

#[derive(Debug, Clone)]
struct Session {
    logged_in: bool,
    role: &'static str,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn session_criteria(admin_checks: Arc<AtomicUsize>) -> CriteriaSet<Session, Value> {
    CriteriaSet::new()
        .with("auth", |s: &Session, a: &Action| {
            s.logged_in || a.action_type() == "session/login"
        })
        .with_value("version", 3)
        .with("admin", move |s: &Session, a: &Action| {
            admin_checks.fetch_add(1, Ordering::SeqCst);
            a.action_type() != "users/delete" || s.role == "admin"
        })
}

#[test]
fn configured_stage_gates_actions() {
    init_tracing();
    let cfg = config::load_from_str(
        r#"
version: 1
interceptor:
  name: "session-gate"
criteria:
  trace_denials: true
"#,
    )
    .unwrap();

    let admin_checks = Arc::new(AtomicUsize::new(0));
    let combined = session_criteria(admin_checks.clone()).combine_with(&cfg.criteria);
    assert_eq!(combined.names().collect::<Vec<_>>(), vec!["auth", "admin"]);

    let cut = Interceptor::with_config(combined, &cfg.interceptor);
    assert_eq!(cut.name(), "session-gate");

    let state = RefCell::new(Session { logged_in: false, role: "user" });
    let ctx = || state.borrow().clone();
    let reduced = RefCell::new(Vec::new());
    let stage = cut.bind(&ctx).next(|d: Dispatched| {
        reduced.borrow_mut().push(d.action_type().into_owned());
        reduced.borrow().len()
    });

    // logged out: auth denies first, admin never runs
    assert_eq!(stage.handle(Action::bare("todo/add")), 1);
    assert_eq!(admin_checks.load(Ordering::SeqCst), 0);

    assert_eq!(stage.handle(Action::bare("session/login")), 2);
    assert_eq!(admin_checks.load(Ordering::SeqCst), 1);

    state.borrow_mut().logged_in = true;
    stage.handle(Action::bare("users/delete"));
    state.borrow_mut().role = "admin";
    stage.handle(Action::bare("users/delete"));

    assert_eq!(
        *reduced.borrow(),
        vec![
            format!("{SENTINEL}todo/add"),
            "session/login".to_string(),
            format!("{SENTINEL}users/delete"),
            "users/delete".to_string(),
        ]
    );
}

#[test]
fn explain_names_the_denying_criteria() {
    let combined = session_criteria(Arc::new(AtomicUsize::new(0))).combine();
    let user = Session { logged_in: true, role: "user" };

    let ev = combined.explain(&user, &Action::bare("users/delete"));
    assert!(ev.verdict.is_deny());
    assert_eq!(ev.denied_by.as_deref(), Some("admin"));
    assert_eq!(ev.evaluated, 2);

    let ev = combined.explain(&user, &Action::bare("todo/add"));
    assert!(!ev.verdict.is_deny());
    assert_eq!(ev.denied_by, None);
}

#[test]
fn stages_chain_over_wire_actions() {
    init_tracing();
    let outer = Interceptor::new(|_: &(), a: &Action| a.action_type() != "nuke");
    let inner = Interceptor::new(|_: &(), a: &Action| !is_blocked(a));
    let get_state = || ();

    let seen = RefCell::new(Vec::new());
    let inner_stage = inner.bind(&get_state).next(|d: Dispatched| {
        seen.borrow_mut().push(serde_json::to_value(&d).unwrap());
    });
    let outer_stage = outer
        .bind(&get_state)
        .next(|d: Dispatched| inner_stage.handle(d.into_wire()));

    outer_stage.handle(Action::new("nuke", json!({ "target": "db" })));
    outer_stage.handle(Action::new("tidy", Value::Null));

    let seen = seen.into_inner();
    assert_eq!(
        seen[0],
        json!({
            "type": format!("{SENTINEL}{SENTINEL}nuke"),
            "payload": {
                "type": format!("{SENTINEL}nuke"),
                "payload": { "type": "nuke", "payload": { "target": "db" } }
            }
        })
    );
    assert_eq!(seen[1], json!({ "type": "tidy", "payload": null }));
}

#[test]
fn downstream_stage_normalizes_upstream_envelope() {
    let outer = Interceptor::new(|_: &(), a: &Action| a.action_type() != "nuke");
    let permissive = Interceptor::new(|_: &(), _: &Action| true);
    let get_state = || ();

    let inner_stage = permissive.bind(&get_state).next(|d: Dispatched| {
        // forwarded as-is by this stage, still tagged from upstream
        assert!(!d.is_blocked());
        assert!(d.carries_sentinel());
        d.normalize().unwrap()
    });
    let outer_stage = outer
        .bind(&get_state)
        .next(|d: Dispatched| inner_stage.handle(d.into_wire()));

    let action = Action::new("nuke", json!({ "target": "db" })).with_field("meta", 1);
    let out = outer_stage.handle(action);
    assert!(out.is_blocked());
    let original = out.as_blocked().unwrap().original();
    assert_eq!(original.action_type(), "nuke");
    assert_eq!(original.payload, json!({ "target": "db" }));
    assert_eq!(original.extra.get("meta"), Some(&json!(1)));
}
