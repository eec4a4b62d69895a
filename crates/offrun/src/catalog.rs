//! # Task Catalog
//!
//! The closed catalog of compiled task functions. Nothing executable ever
//! crosses the isolation boundary; only a [`CallableRef`] does, and the
//! catalog resolves it back to code on the receiving side.
//!
//! Uses DashMap for concurrent access without global locking, so concurrent
//! invocations register and reconstruct independently.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

use offpack::CallableRef;
use offpack::Style;
use offpack::Value;

use crate::fault::Fault;

/// A compiled task function.
///
/// Tasks are pure with respect to the caller: they see only the decoded
/// parameter and produce only the returned value. A panic inside the task
/// is caught by the harness and surfaced as an execution fault.
pub type TaskFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Registry of task functions, keyed by declaration style.
///
/// Named entries are durable: they are looked up on reconstruction and may
/// back any number of tasks. Lambda entries are transient: each backs
/// exactly one task and is consumed when reconstructed.
pub struct Catalog {
    named: DashMap<String, TaskFn>,
    lambdas: DashMap<String, TaskFn>,
    next_lambda_id: AtomicU64,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            named: DashMap::new(),
            lambdas: DashMap::new(),
            next_lambda_id: AtomicU64::new(1),
        }
    }

    /// Registers a durable named task and returns the reference to offload.
    ///
    /// Re-registering a name replaces the previous entry.
    pub fn register(
        &self,
        name: &str,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Value {
        self.named.insert(name.to_string(), Arc::new(f));
        Value::Callable(CallableRef::named(name))
    }

    /// Registers a transient anonymous task under a generated key.
    ///
    /// The entry backs exactly one task: reconstruction consumes it.
    pub fn lambda(&self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Value {
        let id = self.next_lambda_id.fetch_add(1, Ordering::Relaxed);
        let key = format!("lambda-{}", id);
        self.lambdas.insert(key.clone(), Arc::new(f));
        Value::Callable(CallableRef::lambda(key))
    }

    /// Rebuilds a task function from its reference, honoring the
    /// declaration style. The two styles take distinct paths: named entries
    /// are cloned out of the durable table, lambda entries are removed from
    /// the transient one.
    pub(crate) fn reconstruct(&self, reference: &CallableRef) -> Result<TaskFn, Fault> {
        match reference.style {
            Style::Named => self
                .named
                .get(&reference.key)
                .map(|entry| entry.value().clone())
                .ok_or_else(|| {
                    Fault::Reconstruction(format!("unknown named task: {}", reference.key))
                }),
            Style::Lambda => self
                .lambdas
                .remove(&reference.key)
                .map(|(_, f)| f)
                .ok_or_else(|| {
                    Fault::Reconstruction(format!(
                        "unknown or already-consumed lambda: {}",
                        reference.key
                    ))
                }),
        }
    }

    /// Number of durable named entries.
    pub fn named_count(&self) -> usize {
        self.named.len()
    }

    /// Number of pending lambda entries.
    pub fn lambda_count(&self) -> usize {
        self.lambdas.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
