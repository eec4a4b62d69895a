//! # Offload
//!
//! The single public operation, curried in two applications: the first
//! captures the target, the second supplies the parameter and either
//! returns the original value synchronously (non-callable target) or
//! serializes, spawns a throwaway context, and returns the future.

use std::sync::Arc;

use offpack::Value;

use crate::channel;
use crate::channel::Envelope;
use crate::fault::Fault;
use crate::fault::Result;
use crate::future::TaskFuture;
use crate::runtime::Runtime;

/// Lifecycle of a single invocation, for diagnostics.
///
/// Terminal states are observed through the future, not through a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Serializing,
    ContextSpawned,
    AwaitingResult,
}

/// First application of `offload`: the captured target.
pub struct Offload {
    runtime: Arc<Runtime>,
    target: Value,
}

/// Outcome of the second application.
#[derive(Debug)]
pub enum Dispatch {
    /// The target was not callable: the original value, returned
    /// synchronously. No task, no context, no future.
    Immediate(Value),
    /// The task is running in its own context; await the future.
    Pending(TaskFuture),
}

impl Dispatch {
    pub fn immediate(self) -> Option<Value> {
        match self {
            Dispatch::Immediate(value) => Some(value),
            Dispatch::Pending(_) => None,
        }
    }

    pub fn pending(self) -> Option<TaskFuture> {
        match self {
            Dispatch::Pending(future) => Some(future),
            Dispatch::Immediate(_) => None,
        }
    }
}

impl Offload {
    pub(crate) fn new(runtime: Arc<Runtime>, target: Value) -> Self {
        tracing::debug!(phase = ?Phase::Created, "offload created");
        Self { runtime, target }
    }

    /// Second application: supplies the parameter.
    ///
    /// A serialization failure surfaces here, synchronously, before any
    /// context spawns. Everything later in the invocation settles the
    /// returned future instead.
    pub fn call(self, parameter: Value) -> Result<Dispatch> {
        let reference = match self.target {
            Value::Callable(reference) => reference,
            other => return Ok(Dispatch::Immediate(other)),
        };

        tracing::debug!(phase = ?Phase::Serializing, task = %reference, "encoding task");
        let callable = offpack::encode(&Value::Callable(reference)).map_err(Fault::from)?;
        let parameter = offpack::encode(&parameter).map_err(Fault::from)?;

        let handle = self.runtime.build_harness();
        let harness = self
            .runtime
            .get_harness(handle)
            .map_err(|e| Fault::Channel(e.to_string()))?;

        let inbound = channel::spawn(harness, Envelope { callable, parameter });
        tracing::debug!(phase = ?Phase::ContextSpawned, handle = %handle, "context spawned");

        // The reclaimer runs right after spawn, not after completion: the
        // handle addresses only the bootstrap artifact, which the running
        // context no longer needs.
        self.runtime
            .revoke_harness(handle)
            .map_err(|e| Fault::Channel(e.to_string()))?;

        tracing::debug!(phase = ?Phase::AwaitingResult, handle = %handle, "awaiting reply");
        Ok(Dispatch::Pending(TaskFuture::new(inbound)))
    }
}
