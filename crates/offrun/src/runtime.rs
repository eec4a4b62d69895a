//! # Runtime Registry
//!
//! Owns the task catalog and the harness handle table. Handles are
//! temporary by contract: one per invocation, valid from packaging until
//! explicit revocation right after the context spawns, never reused.
//!
//! Uses DashMap for concurrent access without global locking, so concurrent
//! invocations build and revoke handles independently.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

use offpack::Value;

use crate::catalog::Catalog;
use crate::harness::Harness;
use crate::offload::Offload;

/// Strong type for harness handles.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct HarnessHandle(pub u64);

impl std::fmt::Display for HarnessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "harness-{}", self.0)
    }
}

#[derive(Debug)]
pub enum Error {
    HarnessNotFound(HarnessHandle),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HarnessNotFound(id) => write!(f, "Harness not found: {}", id),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// The central registry for offloaded task execution.
///
/// Provides concurrent registration and lookup for:
/// - Catalog entries: compiled task functions addressed across the boundary
/// - Harnesses: packaged bootstrap artifacts awaiting spawn
pub struct Runtime {
    catalog: Arc<Catalog>,
    harnesses: DashMap<HarnessHandle, Harness>,
    next_harness_id: AtomicU64,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(Catalog::new()),
            harnesses: DashMap::new(),
            next_harness_id: AtomicU64::new(1),
        }
    }

    /// Registers a durable named task in the catalog.
    pub fn register(
        &self,
        name: &str,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Value {
        self.catalog.register(name, f)
    }

    /// Registers a transient anonymous task in the catalog.
    pub fn lambda(&self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Value {
        self.catalog.lambda(f)
    }

    /// First application of the offload operation: captures the target.
    pub fn offload(self: &Arc<Self>, target: Value) -> Offload {
        Offload::new(Arc::clone(self), target)
    }

    /// Packages the bootstrap body into an artifact under a fresh
    /// temporary handle.
    pub(crate) fn build_harness(&self) -> HarnessHandle {
        let id = HarnessHandle(self.next_harness_id.fetch_add(1, Ordering::Relaxed));
        self.harnesses.insert(id, Harness::new(Arc::clone(&self.catalog)));
        tracing::debug!(handle = %id, "harness packaged");
        id
    }

    /// Retrieves the artifact a context is spawned from. The handle stays
    /// valid until explicitly revoked.
    pub(crate) fn get_harness(&self, id: HarnessHandle) -> Result<Harness> {
        self.harnesses
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::HarnessNotFound(id))
    }

    /// Revokes a handle. Exactly once: a second revocation is an error.
    pub(crate) fn revoke_harness(&self, id: HarnessHandle) -> Result<()> {
        self.harnesses
            .remove(&id)
            .ok_or(Error::HarnessNotFound(id))?;
        tracing::debug!(handle = %id, "harness revoked");
        Ok(())
    }

    /// Number of live (packaged, not yet revoked) harness handles.
    pub fn harness_count(&self) -> usize {
        self.harnesses.len()
    }

    /// The shared task catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
