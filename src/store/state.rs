//! Base trait for store state.

use std::fmt::Debug;

/// Marker trait for state values held by a [`Store`](super::Store).
///
/// States should be:
/// - Immutable (shared behind `Arc`, replaced rather than mutated)
/// - Self-contained (all data a subscriber needs to react)
/// - Comparable (PartialEq for detecting changes)
///
/// `Default` is the value a reducer falls back to when it sees no prior state.
pub trait StoreState: Clone + PartialEq + Default + Debug + Send + Sync + 'static {}
