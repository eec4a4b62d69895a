//! # Task Future
//!
//! The caller's handle on an offloaded task. Created at invocation time,
//! before the context spawns, and settled exactly once: fulfilled with the
//! decoded result or rejected with a fault.

use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use tokio::sync::oneshot;

use offpack::Value;

use crate::channel::Reply;
use crate::fault::Fault;

/// Future for a single offloaded task.
///
/// Settlement is exactly-once by construction: the inward one-shot can
/// deliver at most one message, and a closed channel (the context died
/// without replying) settles the future with a channel fault instead.
#[derive(Debug)]
pub struct TaskFuture {
    inbound: oneshot::Receiver<Reply>,
}

impl TaskFuture {
    pub(crate) fn new(inbound: oneshot::Receiver<Reply>) -> Self {
        Self { inbound }
    }
}

impl Future for TaskFuture {
    type Output = Result<Value, Fault>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inbound).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(Ok(text))) => Poll::Ready(
                offpack::decode(&text)
                    .map_err(|e| Fault::Channel(format!("malformed reply: {}", e))),
            ),
            Poll::Ready(Ok(Err(fault))) => Poll::Ready(Err(fault)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Fault::Channel(
                "context terminated without a reply".to_string(),
            ))),
        }
    }
}
