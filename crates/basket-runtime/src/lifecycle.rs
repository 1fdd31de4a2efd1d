//! # Host Lifecycle Signal
//!
//! The host tells the cart when it is about to lose foreground activity;
//! the cart answers by persisting its snapshot.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Lifecycle → Persist                                  │
//! │                                                                         │
//! │  Host (window blur, suspend, Ctrl-C)                                   │
//! │       │  signal.emit(WillResignActive)                                  │
//! │       ▼                                                                 │
//! │  broadcast::channel<LifecycleEvent>                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist_on_resign task (one per attached cart)                        │
//! │       ├── WillResignActive  → cart.persist().await                      │
//! │       ├── DidBecomeActive   → ignored                                   │
//! │       ├── Lagged            → cart.persist().await (missed events)      │
//! │       └── Closed            → task ends                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::CartProduct;
use basket_store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::persistent::PersistentCart;

/// Buffered lifecycle events per listener.
const LIFECYCLE_CHANNEL_CAPACITY: usize = 16;

/// Host activity transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The host is about to go inactive (background, suspend, exit).
    WillResignActive,
    /// The host regained foreground activity.
    DidBecomeActive,
}

/// Event source the host fires lifecycle transitions into.
///
/// Clones share the same channel. Listeners stop once every clone is
/// dropped.
#[derive(Debug, Clone)]
pub struct LifecycleSignal {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleSignal {
    /// Creates a signal with no listeners.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LIFECYCLE_CHANNEL_CAPACITY);
        LifecycleSignal { tx }
    }

    /// Fires `event`, returning how many listeners will see it.
    pub fn emit(&self, event: LifecycleEvent) -> usize {
        debug!(?event, "Lifecycle event");
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LifecycleSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns a task persisting `cart` on every `WillResignActive` in `events`.
pub fn persist_on_resign<P, S>(
    cart: PersistentCart<P, S>,
    mut events: broadcast::Receiver<LifecycleEvent>,
) -> JoinHandle<()>
where
    P: CartProduct + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore + 'static,
{
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LifecycleEvent::WillResignActive) => {
                    debug!(key = %cart.key(), "Host resigning active, persisting cart");
                    cart.persist().await;
                }
                Ok(LifecycleEvent::DidBecomeActive) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Lifecycle listener lagged, persisting cart");
                    cart.persist().await;
                }
                Err(RecvError::Closed) => break,
            }
        }

        debug!(key = %cart.key(), "Lifecycle signal closed, listener stopped");
    })
}
