//! Reducer trait for the store.

use std::sync::Arc;

use super::action::{Action, Incoming};
use super::state::StoreState;

/// Reducer computes the next state from the prior one and an action.
///
/// The reducer is the only place where state transitions happen.
/// It must be pure: no side effects, and the prior state is never mutated.
/// Return the same `Arc` when nothing changed.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: StoreState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Precondition violations reported back to the dispatch caller.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process an action and return the new state.
    ///
    /// `state` is `None` exactly once, for the [`Incoming::Init`] marker sent
    /// while the store is being created. The reducer establishes the initial
    /// state there.
    fn reduce(
        &self,
        state: Option<Arc<Self::State>>,
        action: Incoming<Self::Action>,
    ) -> Result<Arc<Self::State>, Self::Error>;
}
