//! Storage change notifications.
//!
//! # Responsibility
//! - Fan committed-write events out to presentation-side observers.
//! - Keep the subscription seam explicit: no framework observer magic, just
//!   channels with drop-to-cancel handles.
//!
//! # Invariants
//! - Events are published after the owning transaction commits, never
//!   before.
//! - Exactly one event is published per logical user action.
//! - `publish` never blocks and never fails; observers that went away are
//!   silently pruned.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// A committed write, scoped to what observers need to re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// Item rows of one checklist changed; its board should be re-fetched.
    Items { checklist: String },
    /// Catalog rows changed (create, rename, delete or activate).
    Catalog,
}

/// Publish side of the notification seam, shared by the storage layer.
///
/// One bus exists per engine; repositories borrow it and publish once per
/// committed write.
#[derive(Debug, Default)]
pub struct ChangeBus {
    subscribers: Mutex<Vec<Sender<StoreChange>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns its receiving handle.
    ///
    /// Cancellation is dropping the handle; the bus prunes the dead sender
    /// on the next publish.
    pub fn subscribe(&self) -> ChangeSubscription {
        let (tx, rx) = channel();
        self.lock_subscribers().push(tx);
        ChangeSubscription { rx }
    }

    /// Delivers `change` to every live subscriber.
    pub fn publish(&self, change: &StoreChange) {
        self.lock_subscribers()
            .retain(|tx| tx.send(change.clone()).is_ok());
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Sender<StoreChange>>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            // The sender list stays usable after a panicked publisher.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Receiving end of one subscription. Dropping it cancels the subscription.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: Receiver<StoreChange>,
}

impl ChangeSubscription {
    /// Returns the next pending event without blocking.
    pub fn try_next(&self) -> Option<StoreChange> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_within(&self, timeout: Duration) -> Option<StoreChange> {
        self.rx.recv_timeout(timeout).ok()
    }
}
