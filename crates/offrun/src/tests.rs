//! Unit tests for the catalog, harness, and handle lifecycle.

use std::sync::Arc;

use offpack::CallableRef;
use offpack::Value;

use crate::catalog::Catalog;
use crate::channel;
use crate::channel::Envelope;
use crate::fault::Fault;
use crate::harness::Harness;
use crate::runtime::Runtime;

fn double(v: Value) -> Value {
    match v {
        Value::Int(x) => Value::Int(x * 2),
        other => other,
    }
}

// ==== CATALOG RECONSTRUCTION ====

#[test]
fn test_named_reconstruct() {
    let catalog = Catalog::new();
    let target = catalog.register("double", double);

    let reference = match target {
        Value::Callable(r) => r,
        _ => panic!("register must return a callable"),
    };

    let task = catalog.reconstruct(&reference).unwrap();
    assert_eq!(task(Value::Int(4)), Value::Int(8));

    // Named entries are durable: reconstruction again succeeds.
    assert!(catalog.reconstruct(&reference).is_ok());
}

#[test]
fn test_unknown_named_reconstruct() {
    let catalog = Catalog::new();
    let err = catalog
        .reconstruct(&CallableRef::named("missing"))
        .err()
        .expect("must not reconstruct");
    assert!(matches!(err, Fault::Reconstruction(_)));
}

#[test]
fn test_lambda_reconstruct_consumes_entry() {
    let catalog = Catalog::new();
    let target = catalog.lambda(double);
    let reference = match target {
        Value::Callable(r) => r,
        _ => panic!("lambda must return a callable"),
    };

    assert_eq!(catalog.lambda_count(), 1);
    let task = catalog.reconstruct(&reference).unwrap();
    assert_eq!(task(Value::Int(3)), Value::Int(6));
    assert_eq!(catalog.lambda_count(), 0);

    // A lambda backs exactly one task.
    let err = catalog
        .reconstruct(&reference)
        .err()
        .expect("a consumed lambda must not reconstruct");
    assert!(matches!(err, Fault::Reconstruction(_)));
}

#[test]
fn test_style_mismatch_is_reconstruction_fault() {
    let catalog = Catalog::new();
    catalog.register("double", double);

    // Same key, wrong declaration tag: the paths are strict.
    let err = catalog
        .reconstruct(&CallableRef::lambda("double"))
        .err()
        .expect("must not reconstruct");
    assert!(matches!(err, Fault::Reconstruction(_)));
}

#[test]
fn test_register_replaces() {
    let catalog = Catalog::new();
    catalog.register("task", |_| Value::Int(1));
    catalog.register("task", |_| Value::Int(2));
    assert_eq!(catalog.named_count(), 1);

    let task = catalog.reconstruct(&CallableRef::named("task")).unwrap();
    assert_eq!(task(Value::Unit), Value::Int(2));
}

// ==== ENCODE -> RECONSTRUCT -> INVOKE ROUNDTRIP ====

#[test]
fn test_named_roundtrip_matches_direct_invocation() {
    let catalog = Catalog::new();
    let target = catalog.register("double", double);

    let text = offpack::encode(&target).unwrap();
    let revived = match offpack::decode(&text).unwrap() {
        Value::Callable(r) => r,
        other => panic!("expected callable, got {:?}", other),
    };

    let task = catalog.reconstruct(&revived).unwrap();
    assert_eq!(task(Value::Int(21)), double(Value::Int(21)));
}

#[test]
fn test_lambda_roundtrip_matches_direct_invocation() {
    let catalog = Catalog::new();
    let target = catalog.lambda(|v| match v {
        Value::Str(s) => Value::Str(format!("{}!", s)),
        other => other,
    });

    let text = offpack::encode(&target).unwrap();
    let revived = match offpack::decode(&text).unwrap() {
        Value::Callable(r) => r,
        other => panic!("expected callable, got {:?}", other),
    };

    let task = catalog.reconstruct(&revived).unwrap();
    assert_eq!(task(Value::str("hey")), Value::str("hey!"));
}

// ==== HARNESS OVER THE CHANNEL ====

fn envelope_for(target: &Value, parameter: &Value) -> Envelope {
    Envelope {
        callable: offpack::encode(target).unwrap(),
        parameter: offpack::encode(parameter).unwrap(),
    }
}

#[tokio::test]
async fn test_harness_replies_with_encoded_result() {
    let catalog = Arc::new(Catalog::new());
    let target = catalog.register("double", double);

    let inbound = channel::spawn(
        Harness::new(Arc::clone(&catalog)),
        envelope_for(&target, &Value::Int(21)),
    );

    let reply = inbound.await.expect("harness must reply").unwrap();
    assert_eq!(offpack::decode(&reply).unwrap(), Value::Int(42));
}

#[tokio::test]
async fn test_harness_rejects_unknown_reference() {
    let catalog = Arc::new(Catalog::new());
    let target = Value::Callable(CallableRef::named("missing"));

    let inbound = channel::spawn(
        Harness::new(Arc::clone(&catalog)),
        envelope_for(&target, &Value::Unit),
    );

    let fault = inbound.await.expect("harness must reply").unwrap_err();
    assert!(matches!(fault, Fault::Reconstruction(_)));
}

#[tokio::test]
async fn test_harness_rejects_non_callable_head() {
    let catalog = Arc::new(Catalog::new());

    let inbound = channel::spawn(
        Harness::new(Arc::clone(&catalog)),
        envelope_for(&Value::Int(5), &Value::Unit),
    );

    let fault = inbound.await.expect("harness must reply").unwrap_err();
    assert!(matches!(fault, Fault::Reconstruction(_)));
}

#[tokio::test]
async fn test_harness_catches_task_panic() {
    let catalog = Arc::new(Catalog::new());
    let target = catalog.register("boom", |_| panic!("boom"));

    let inbound = channel::spawn(
        Harness::new(Arc::clone(&catalog)),
        envelope_for(&target, &Value::Int(1)),
    );

    let fault = inbound.await.expect("harness must reply").unwrap_err();
    match fault {
        Fault::Execution(msg) => assert_eq!(msg, "boom"),
        other => panic!("expected execution fault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dropped_reply_sender_is_channel_fault() {
    // A context that dies off the normal path never sends; the closed
    // inward channel settles the future with a channel fault.
    let (tx, rx) = tokio::sync::oneshot::channel();
    drop(tx);

    let fault = crate::future::TaskFuture::new(rx).await.unwrap_err();
    assert!(matches!(fault, Fault::Channel(_)));
}

// ==== HANDLE LIFECYCLE ====

#[test]
fn test_handle_lifecycle() {
    let rt = Runtime::new();
    assert_eq!(rt.harness_count(), 0);

    let handle = rt.build_harness();
    assert_eq!(rt.harness_count(), 1);
    assert!(rt.get_harness(handle).is_ok());

    rt.revoke_harness(handle).unwrap();
    assert_eq!(rt.harness_count(), 0);

    // Revocation is exactly-once; handles are never reused.
    assert!(rt.revoke_harness(handle).is_err());
    assert!(rt.get_harness(handle).is_err());
}

#[test]
fn test_handles_are_distinct_per_invocation() {
    let rt = Runtime::new();
    let a = rt.build_harness();
    let b = rt.build_harness();
    assert_ne!(a, b);
    assert_eq!(rt.harness_count(), 2);
}
