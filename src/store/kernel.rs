//! The store: current state, subscriber registry, dispatch/notify protocol.

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::action::{decode_action, Incoming, INIT_KIND};
use super::error::DispatchError;
use super::reducer::Reducer;
use super::subscribers::{Subscriber, SubscriberRegistry, Subscription};

/// Owner of one application state value.
///
/// Cloning a `Store` yields another handle to the same store. Construct it
/// once and pass it to whoever needs it.
///
/// # Dispatch
///
/// [`dispatch`](Self::dispatch) runs to completion on the calling thread:
/// reducer, state replacement, then every subscriber in registration order.
/// Code after the call observes the new state and all subscriber reactions.
/// A subscriber may dispatch again; the nested dispatch finishes its own
/// notify pass before the outer pass continues. Dispatches from other
/// threads wait until the in-flight one is done.
///
/// A subscriber that captures a clone of its store keeps the store alive
/// until it unsubscribes.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Reducer> {
    reducer: R,
    state: RwLock<Arc<R::State>>,
    subscribers: Arc<Mutex<SubscriberRegistry>>,
    /// Held for a whole dispatch. Re-entrant so subscribers can dispatch.
    dispatch_lock: ReentrantMutex<()>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Store<R> {
    /// Create a store and let the reducer establish the initial state.
    ///
    /// The reducer receives [`Incoming::Init`] with no prior state, so state
    /// is never observably absent.
    ///
    /// # Errors
    /// Returns the reducer's error if it refuses the init marker.
    pub fn new(reducer: R) -> Result<Self, R::Error> {
        let initial = reducer.reduce(None, Incoming::Init)?;
        tracing::debug!(kind = INIT_KIND, "Store initialized");

        Ok(Self {
            inner: Arc::new(StoreInner {
                reducer,
                state: RwLock::new(initial),
                subscribers: Arc::new(Mutex::new(SubscriberRegistry::default())),
                dispatch_lock: ReentrantMutex::new(()),
            }),
        })
    }

    /// Current state. No copy is made.
    pub fn state(&self) -> Arc<R::State> {
        self.inner.state.read().clone()
    }

    /// Apply a typed action.
    ///
    /// # Errors
    /// [`DispatchError::Reducer`] if the reducer rejects the action. State is
    /// left unchanged and no subscriber runs.
    pub fn dispatch(&self, action: R::Action) -> Result<(), DispatchError<R::Error>> {
        self.apply(Incoming::Action(action))
    }

    /// Validate and apply an untyped action.
    ///
    /// Unknown `type`s reach the reducer as [`Incoming::Unrecognized`].
    ///
    /// # Errors
    /// [`DispatchError::InvalidAction`] before anything happens if `raw` isn't
    /// a non-array object with a `type`, or if its fields don't fit that
    /// type. Reducer errors as for [`dispatch`](Self::dispatch).
    pub fn dispatch_raw(&self, raw: &Value) -> Result<(), DispatchError<R::Error>>
    where
        R::Action: DeserializeOwned,
    {
        let incoming = decode_action::<R::Action>(Some(raw))?;
        self.apply(incoming)
    }

    fn apply(&self, incoming: Incoming<R::Action>) -> Result<(), DispatchError<R::Error>> {
        let _dispatching = self.inner.dispatch_lock.lock();
        let kind = incoming.kind().to_string();

        let prior = self.state();
        let next = self
            .inner
            .reducer
            .reduce(Some(prior), incoming)
            .map_err(DispatchError::Reducer)?;
        *self.inner.state.write() = next;

        let subscribers = self.inner.subscribers.lock().snapshot();
        tracing::debug!(kind = %kind, subscribers = subscribers.len(), "Action dispatched");
        for handler in subscribers {
            handler();
        }
        Ok(())
    }

    /// Register a callback to run after every dispatch.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(handler))
    }

    /// Register an already shared callback. The same `Arc` may be registered
    /// more than once; each registration is removed independently.
    pub fn subscribe_shared(&self, handler: Subscriber) -> Subscription {
        let id = self.inner.subscribers.lock().insert(handler);
        tracing::trace!(subscriber = ?id, "Subscribed");
        Subscription::new(id, &self.inner.subscribers)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Handle that can dispatch to this store and nothing else.
    pub fn dispatcher(&self) -> Dispatcher<R> {
        Dispatcher {
            store: self.clone(),
        }
    }

    /// True if both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: Reducer> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Dispatch-only view of a [`Store`].
///
/// Every dispatcher from the same store is interchangeable, so projections
/// over it only need computing once.
pub struct Dispatcher<R: Reducer> {
    store: Store<R>,
}

impl<R: Reducer> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Reducer> Dispatcher<R> {
    pub fn dispatch(&self, action: R::Action) -> Result<(), DispatchError<R::Error>> {
        self.store.dispatch(action)
    }

    pub fn dispatch_raw(&self, raw: &Value) -> Result<(), DispatchError<R::Error>>
    where
        R::Action: DeserializeOwned,
    {
        self.store.dispatch_raw(raw)
    }

    /// True if both dispatchers target the same store.
    pub fn same_store(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store)
    }
}

impl<R: Reducer> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
