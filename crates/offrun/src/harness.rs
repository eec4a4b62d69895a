//! # Harness
//!
//! The fixed bootstrap body installed into every execution context: receive
//! the single envelope, decode it, reconstruct the callable by its
//! declaration tag, invoke it, and send exactly one reply.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;

use tokio::sync::oneshot;

use offpack::Value;

use crate::catalog::Catalog;
use crate::channel::Envelope;
use crate::channel::Reply;
use crate::fault::Fault;

/// The bootstrap artifact a context is spawned from.
///
/// Carries only the catalog reference; everything task-specific arrives
/// through the envelope. One harness serves exactly one task.
#[derive(Clone)]
pub struct Harness {
    catalog: Arc<Catalog>,
}

impl Harness {
    pub(crate) fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// The inbound-message handler. Runs on the context's own thread.
    ///
    /// Receives at most one envelope and sends at most one reply. If the
    /// caller vanished before sending, there is nobody to reply to and the
    /// context simply winds down.
    pub(crate) fn serve(self, inbound: oneshot::Receiver<Envelope>, reply: oneshot::Sender<Reply>) {
        let envelope = match inbound.blocking_recv() {
            Ok(envelope) => envelope,
            Err(_) => return,
        };
        // A send into an already-settled slot is ignored.
        let _ = reply.send(self.run(envelope));
    }

    fn run(&self, envelope: Envelope) -> Reply {
        let head = offpack::decode(&envelope.callable)
            .map_err(|e| Fault::Reconstruction(format!("malformed callable encoding: {}", e)))?;
        let reference = match head {
            Value::Callable(reference) => reference,
            _ => {
                return Err(Fault::Reconstruction(
                    "envelope head is not a callable reference".to_string(),
                ));
            }
        };
        let task = self.catalog.reconstruct(&reference)?;
        let parameter = offpack::decode(&envelope.parameter)
            .map_err(|e| Fault::Reconstruction(format!("malformed parameter encoding: {}", e)))?;

        let result = catch_unwind(AssertUnwindSafe(|| task(parameter)))
            .map_err(|payload| Fault::Execution(panic_message(payload)))?;

        // The reply crosses the same boundary as the request; if the result
        // cannot be encoded, the reply path itself has failed.
        offpack::encode(&result).map_err(|e| Fault::Channel(format!("reply encoding failed: {}", e)))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}
