//! Event publishing/subscription abstraction (mechanics only).
//!
//! - **Broadcast semantics**: each subscriber gets a copy of every message
//!   published after it subscribed.
//! - **Lossy for slow consumers**: a subscriber that falls too far behind is
//!   told how many messages it missed ([`RecvError::Lagged`]) and should
//!   resynchronize from the store.
//! - **No persistence**: the store is the source of truth, the bus only
//!   distributes invalidations.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecvError {
    /// The subscriber missed `n` messages.
    #[error("subscriber lagged behind by {0} message(s)")]
    Lagged(u64),

    /// The bus was dropped; no more messages will arrive.
    #[error("event bus closed")]
    Closed,
}

/// A subscription to an event stream.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: broadcast::Receiver<M>,
}

impl<M: Clone> Subscription<M> {
    pub fn new(receiver: broadcast::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message.
    pub async fn recv(&mut self) -> Result<M, RecvError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(n) => RecvError::Lagged(n),
            broadcast::error::RecvError::Closed => RecvError::Closed,
        })
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<Result<M, RecvError>> {
        match self.receiver.try_recv() {
            Ok(m) => Some(Ok(m)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Lagged(n)) => Some(Err(RecvError::Lagged(n))),
            Err(broadcast::error::TryRecvError::Closed) => Some(Err(RecvError::Closed)),
        }
    }

    /// Unwrap into the raw broadcast receiver (for stream adapters).
    pub fn into_inner(self) -> broadcast::Receiver<M> {
        self.receiver
    }
}

/// Transport-agnostic pub/sub seam.
///
/// Inventory writers publish through this trait so a hosted notification
/// channel (e.g. Postgres LISTEN/NOTIFY) can replace the in-process bus
/// without touching the services.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
