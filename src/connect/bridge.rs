//! Connect builder and the mounted bridge.

use parking_lot::Mutex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::consumer::Consumer;
use super::props::ConnectedProps;
use crate::store::{Dispatcher, Reducer, Store, Subscription};

type StateProjection<R, S> = Arc<dyn Fn(&<R as Reducer>::State) -> S + Send + Sync>;
type DispatchProjection<R, D> = Arc<dyn Fn(&Dispatcher<R>) -> D + Send + Sync>;

/// Projections from a store into consumer props.
///
/// Start from [`connect`], replace the projections you need, then
/// [`wrap`](Self::wrap) consumers. One `Connect` can wrap any number of them.
pub struct Connect<R: Reducer, S, D> {
    map_state: StateProjection<R, S>,
    map_dispatch: DispatchProjection<R, D>,
}

impl<R: Reducer, S, D> Clone for Connect<R, S, D> {
    fn clone(&self) -> Self {
        Self {
            map_state: Arc::clone(&self.map_state),
            map_dispatch: Arc::clone(&self.map_dispatch),
        }
    }
}

/// Start a connection with default projections: no state props, and the
/// [`Dispatcher`] itself as dispatch props.
pub fn connect<R: Reducer>() -> Connect<R, (), Dispatcher<R>> {
    Connect {
        map_state: Arc::new(|_: &R::State| ()),
        map_dispatch: Arc::new(|dispatcher: &Dispatcher<R>| dispatcher.clone()),
    }
}

impl<R: Reducer, S, D> Connect<R, S, D> {
    /// Project store state into props. Runs on mount and after every
    /// store notification or own-props change.
    pub fn map_state<S2, F>(self, project: F) -> Connect<R, S2, D>
    where
        F: Fn(&R::State) -> S2 + Send + Sync + 'static,
    {
        Connect {
            map_state: Arc::new(project),
            map_dispatch: self.map_dispatch,
        }
    }

    /// Project the dispatcher into props. Runs once per mount.
    pub fn map_dispatch<D2, F>(self, project: F) -> Connect<R, S, D2>
    where
        F: Fn(&Dispatcher<R>) -> D2 + Send + Sync + 'static,
    {
        Connect {
            map_state: self.map_state,
            map_dispatch: Arc::new(project),
        }
    }

    /// Adapt `consumer` to these projections. Nothing happens until the
    /// result is mounted.
    pub fn wrap<O, C>(&self, consumer: C) -> Connected<R, S, D, O, C>
    where
        C: Consumer<Props = ConnectedProps<S, D, O>>,
    {
        Connected {
            connect: self.clone(),
            consumer,
            _own: PhantomData,
        }
    }
}

impl<R: Reducer, S, D> fmt::Debug for Connect<R, S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connect").finish_non_exhaustive()
    }
}

/// A wrapped consumer that is not mounted yet.
pub struct Connected<R: Reducer, S, D, O, C> {
    connect: Connect<R, S, D>,
    consumer: C,
    _own: PhantomData<fn(O)>,
}

impl<R, S, D, O, C> Connected<R, S, D, O, C>
where
    R: Reducer,
    S: Clone + Send + 'static,
    D: Clone + Send + 'static,
    O: Clone + Send + 'static,
    C: Consumer<Props = ConnectedProps<S, D, O>>,
{
    /// Subscribe to `store` and render the consumer with its first props.
    ///
    /// Each projection runs once here. The first render reuses these props
    /// unless the store changed while subscribing.
    pub fn mount(self, store: &Store<R>, own: O) -> Bridge<R, S, D, O, C> {
        let dispatch = (self.connect.map_dispatch)(&store.dispatcher());
        let seed = store.state();
        let state = (self.connect.map_state)(&*seed);

        let inner = Arc::new(BridgeInner {
            store: store.clone(),
            map_state: self.connect.map_state,
            props: Mutex::new(ConnectedProps {
                state,
                dispatch,
                own,
            }),
            consumer: Mutex::new(self.consumer),
            stale: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
            renders: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        let subscription = store.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });
        tracing::trace!(subscriber = ?subscription.id(), "Bridge mounted");

        if !Arc::ptr_eq(&seed, &store.state()) {
            inner.stale.store(true, Ordering::Release);
        }
        inner.render_seeded();
        Bridge {
            inner,
            subscription: Some(subscription),
        }
    }
}

impl<R: Reducer, S, D, O, C> fmt::Debug for Connected<R, S, D, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connected").finish_non_exhaustive()
    }
}

struct BridgeInner<R: Reducer, S, D, O, C> {
    store: Store<R>,
    map_state: StateProjection<R, S>,
    /// Last props handed to the consumer.
    props: Mutex<ConnectedProps<S, D, O>>,
    consumer: Mutex<C>,
    /// Set when props must be recomputed and rendered again.
    stale: AtomicBool,
    mounted: AtomicBool,
    renders: AtomicU64,
}

impl<R, S, D, O, C> BridgeInner<R, S, D, O, C>
where
    R: Reducer,
    S: Clone,
    D: Clone,
    O: Clone,
    C: Consumer<Props = ConnectedProps<S, D, O>>,
{
    /// Recompute props and render, at most one render pass at a time.
    ///
    /// A request arriving while the consumer is rendering (a dispatch from
    /// inside `render`, or from another thread) marks the props stale; the
    /// active pass renders again before letting go of the consumer. When that
    /// pass runs on another thread, the request returns before the render
    /// happens, so a dispatch can return before this bridge has re-rendered.
    fn refresh(&self) {
        self.stale.store(true, Ordering::Release);
        self.drain();
    }

    /// First render, with the props computed at mount.
    fn render_seeded(&self) {
        if !self.stale.load(Ordering::Acquire) {
            if let Some(mut consumer) = self.consumer.try_lock() {
                let props = self.props.lock().clone();
                consumer.render(&props);
                self.renders.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.drain();
    }

    /// Render until no request is pending.
    fn drain(&self) {
        loop {
            let Some(mut consumer) = self.consumer.try_lock() else {
                return;
            };
            while self.mounted.load(Ordering::Acquire) && self.stale.swap(false, Ordering::AcqRel)
            {
                let props = self.recompute();
                consumer.render(&props);
                self.renders.fetch_add(1, Ordering::Relaxed);
            }
            drop(consumer);

            if !self.stale.load(Ordering::Acquire) || !self.mounted.load(Ordering::Acquire) {
                return;
            }
        }
    }

    fn recompute(&self) -> ConnectedProps<S, D, O> {
        let state = self.store.state();
        let projected = (self.map_state)(&*state);
        let mut props = self.props.lock();
        props.state = projected;
        props.clone()
    }
}

/// A mounted consumer.
///
/// Re-renders the consumer after every store notification and every
/// [`set_own_props`](Self::set_own_props). Unsubscribes from the store on
/// [`unmount`](Self::unmount) or drop; mount a fresh [`Connected`] to show
/// the consumer again.
pub struct Bridge<R: Reducer, S, D, O, C> {
    inner: Arc<BridgeInner<R, S, D, O, C>>,
    subscription: Option<Subscription>,
}

impl<R, S, D, O, C> Bridge<R, S, D, O, C>
where
    R: Reducer,
    S: Clone,
    D: Clone,
    O: Clone,
    C: Consumer<Props = ConnectedProps<S, D, O>>,
{
    /// Props of the most recent render.
    pub fn props(&self) -> ConnectedProps<S, D, O> {
        self.inner.props.lock().clone()
    }

    /// Replace own props and re-render without waiting for the store.
    pub fn set_own_props(&self, own: O) {
        self.inner.props.lock().own = own;
        self.inner.refresh();
    }

    /// Inspect the consumer. Must not be called from inside its `render`.
    pub fn with_consumer<T>(&self, inspect: impl FnOnce(&C) -> T) -> T {
        inspect(&*self.inner.consumer.lock())
    }

    pub fn unmount(mut self) {
        self.detach();
    }
}

impl<R: Reducer, S, D, O, C> Bridge<R, S, D, O, C> {
    /// Number of times the consumer has rendered.
    pub fn render_count(&self) -> u64 {
        self.inner.renders.load(Ordering::Relaxed)
    }

    fn detach(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        self.inner.mounted.store(false, Ordering::Release);
        subscription.unsubscribe();
        tracing::trace!(subscriber = ?subscription.id(), "Bridge unmounted");
    }
}

impl<R: Reducer, S, D, O, C> Drop for Bridge<R, S, D, O, C> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<R: Reducer, S, D, O, C> fmt::Debug for Bridge<R, S, D, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("renders", &self.render_count())
            .finish_non_exhaustive()
    }
}
