//! # Channel
//!
//! Spawns the execution context from its harness artifact and performs the
//! single two-way exchange: one envelope out, at most one reply in.
//!
//! One-shot channels in both directions make the exchange exactly-once by
//! construction; there is no multiplexing and no correlation id.

use std::thread;

use tokio::sync::oneshot;

use crate::fault::Fault;
use crate::harness::Harness;

/// The one outward message: both halves already encoded.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub callable: String,
    pub parameter: String,
}

/// The one inward message: encoded result, or the fault that stopped it.
pub(crate) type Reply = Result<String, Fault>;

/// Spawns a context thread from the harness artifact, sends the envelope,
/// and hands back the inward receiver.
///
/// The context installs its handler before or after the send lands; the
/// one-shot buffers the single message either way. If the context dies
/// without replying, the dropped sender closes the inward channel and the
/// resolver surfaces that as a channel fault.
pub(crate) fn spawn(harness: Harness, envelope: Envelope) -> oneshot::Receiver<Reply> {
    let (outward_tx, outward_rx) = oneshot::channel();
    let (inward_tx, inward_rx) = oneshot::channel();

    thread::spawn(move || harness.serve(outward_rx, inward_tx));

    // The receiver is owned by the thread we just spawned; the only way
    // this send fails is the context dying first, which the resolver
    // already reports through the closed inward channel.
    let _ = outward_tx.send(envelope);

    inward_rx
}
