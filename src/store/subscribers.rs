//! Subscriber registry and unsubscribe handles.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback run after every committed transition. It receives no payload;
/// read the store to see the new state.
pub type Subscriber = Arc<dyn Fn() + Send + Sync>;

/// Identity of one registration. Registering the same callback twice
/// yields two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Registered subscribers, in registration order.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    next_id: u64,
    entries: Vec<(SubscriberId, Subscriber)>,
}

impl SubscriberRegistry {
    pub(crate) fn insert(&mut self, handler: Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, handler));
        id
    }

    /// Remove one registration, wherever it sits. Returns false if it was
    /// already gone.
    pub(crate) fn remove(&mut self, id: SubscriberId) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Handlers to run for one notify pass.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber> {
        self.entries
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by [`Store::subscribe`](super::Store::subscribe).
///
/// Dropping the handle does NOT unsubscribe: the callback stays registered
/// until [`unsubscribe`](Self::unsubscribe) is called or the store is gone.
#[must_use = "the subscriber stays registered until `unsubscribe` is called"]
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<Mutex<SubscriberRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, registry: &Arc<Mutex<SubscriberRegistry>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Remove this registration from the store.
    ///
    /// Calling it again, or after the store has been dropped, does nothing.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if registry.lock().remove(self.id) {
            tracing::trace!(subscriber = ?self.id, "Unsubscribed");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
