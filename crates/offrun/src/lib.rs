//! # offrun
//!
//! A task-offload primitive: hand it a callable reference and a parameter,
//! and it builds an isolated execution context on the fly, ships both
//! across the boundary as text, runs the task there, and settles a future
//! with the result or fault. The caller never pre-authors a separate
//! executable unit.
//!
//! ## Architecture
//!
//! - **Catalog**: the closed set of compiled task functions; only
//!   references to entries cross the boundary, never code
//! - **Runtime**: the registry for catalog entries and harness handles
//! - **Harness**: the fixed bootstrap body a context is spawned from
//! - **Channel**: one envelope out, at most one reply in, per context
//! - **TaskFuture**: settles exactly once, fulfilled or rejected
//!
//! Each invocation gets exactly one throwaway context (a dedicated thread
//! reachable only by message passing), and the temporary harness handle is
//! revoked as soon as the context has been spawned from it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use offrun::{Runtime, Value};
//!
//! # async fn example() -> Result<(), offrun::Fault> {
//! let rt = Arc::new(Runtime::new());
//!
//! let double = rt.lambda(|v| match v {
//!     Value::Int(x) => Value::Int(x * 2),
//!     other => other,
//! });
//!
//! let future = rt.offload(double).call(Value::Int(21))?
//!     .pending()
//!     .expect("callable targets produce a future");
//! assert_eq!(future.await?, Value::Int(42));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod channel;
pub mod fault;
pub mod future;
pub mod harness;
pub mod offload;
pub mod runtime;

pub use catalog::Catalog;
pub use catalog::TaskFn;
pub use fault::Fault;
pub use fault::Result;
pub use future::TaskFuture;
pub use offload::Dispatch;
pub use offload::Offload;
pub use offload::Phase;
pub use runtime::HarnessHandle;
pub use runtime::Runtime;

pub use offpack::CallableRef;
pub use offpack::Style;
pub use offpack::Value;

#[cfg(test)]
mod tests;
