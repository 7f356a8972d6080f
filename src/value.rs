//! Concurrently-writable single-value holder with change notification.
//!
//! A [`Value`] stores one current value of some cloneable type, typically a
//! module's render function. Any task may [`set`](Value::set) it at any time;
//! the module's event loop holds a [`Subscription`] and wakes whenever the
//! value has changed since it last looked. Missed updates are never buffered:
//! a subscriber that sleeps through three `set` calls wakes once and sees only
//! the latest value.

use std::sync::Arc;

use tokio::sync::watch;

/// A shared, hot-swappable value.
///
/// Cloning a `Value` produces another handle to the same underlying slot, so
/// configuration methods can keep working after the owning module has been
/// handed off to its event loop.
///
/// `set` and `get` never block and never fail. Writers race with
/// last-writer-wins semantics; a reader can never observe a value older than
/// one it has already seen.
#[derive(Debug, Clone)]
pub struct Value<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T: Clone> Value<T> {
    /// Create a new slot holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current value and wake all pending subscriptions.
    ///
    /// Never blocks the caller; subscribers that are not currently waiting
    /// simply pick up the latest value next time they look.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Return a clone of the latest value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Start observing changes from this point on.
    ///
    /// The subscription considers the value current as of this call: its
    /// [`changed`](Subscription::changed) future completes only on the first
    /// `set` after subscription (or after the previous `changed`).
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// One consumer's view of a [`Value`].
///
/// Each change is observed at most once: consecutive `set` calls between two
/// [`changed`](Subscription::changed) awaits coalesce into a single wake.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Wait until the value has been set since it was last observed here.
    ///
    /// Cancel-safe: dropping the future before it completes loses nothing.
    /// If every handle to the `Value` has been dropped no further change can
    /// arrive, so the future stays pending forever.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Return the latest value and mark it as observed.
    pub fn latest(&mut self) -> T {
        self.rx.borrow_and_update().clone()
    }
}
