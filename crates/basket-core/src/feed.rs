//! # State Feed
//!
//! A hot, replay-latest broadcast of full state snapshots.
//!
//! ## Delivery Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    StateFeed<T> Delivery                                │
//! │                                                                         │
//! │  publish(A)   publish(B)   subscribe()   publish(C)   publish(D)       │
//! │      │            │             │             │            │            │
//! │      ▼            ▼             ▼             ▼            ▼            │
//! │   latest=A     latest=B     first recv=B   recv=C       recv=D         │
//! │                                                                         │
//! │  • New subscribers get the latest value immediately (no history)       │
//! │  • Then every later publication, in order                              │
//! │  • Unsubscribe = drop the Subscription                                 │
//! │  • Dropping the feed ends every subscription (recv → None)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Plain `broadcast` receivers only see values sent after they subscribe,
//! so each [`Subscription`] carries the latest value as a pending first item.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

/// Default number of snapshots buffered per subscriber.
pub const DEFAULT_FEED_CAPACITY: usize = 64;

// =============================================================================
// State Feed
// =============================================================================

/// Replay-latest subject over values of type `T`.
#[derive(Debug)]
pub struct StateFeed<T> {
    /// The most recently published value.
    latest: T,
    /// Fan-out to live subscribers.
    tx: broadcast::Sender<T>,
}

impl<T: Clone> StateFeed<T> {
    /// Creates a feed holding `initial` with the default buffer size.
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_FEED_CAPACITY)
    }

    /// Creates a feed with a custom per-subscriber buffer.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        StateFeed {
            latest: initial,
            tx,
        }
    }

    /// Returns the current value.
    pub fn latest(&self) -> &T {
        &self.latest
    }

    /// Replaces the current value and delivers it to every subscriber.
    pub fn publish(&mut self, value: T) {
        self.latest = value.clone();
        // Err only means nobody is listening; `latest` is still updated.
        let _ = self.tx.send(value);
    }

    /// Subscribes to the feed. The first value received is the current one.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            pending: Some(self.latest.clone()),
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// A live view onto a [`StateFeed`].
#[derive(Debug)]
pub struct Subscription<T> {
    /// Latest value at subscription time, delivered first.
    pending: Option<T>,
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Waits for the next value.
    ///
    /// Returns `None` once the feed has been dropped and every buffered
    /// value has been delivered. A subscriber that falls behind by more
    /// than the buffer skips the overwritten values.
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }

        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "State feed subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next value if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }

        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "State feed subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
