//! Single-writer state store.
//!
//! # Architecture
//!
//! ```text
//! dispatch(action) ──→ validate ──→ Reducer ──→ State ──→ subscribers
//!        ↑                                                   │
//!        └───────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable value shared as `Arc<State>`, replaced wholesale
//! - **Action**: Tagged transition request, validated at the JSON boundary
//! - **Reducer**: Pure function `(prior, action) -> next`
//! - **Subscriber**: Zero-argument callback run after every committed transition

mod action;
mod error;
mod kernel;
mod reducer;
mod state;
mod subscribers;

pub use action::{decode_action, validate, Action, Incoming, INIT_KIND, TYPE_FIELD};
pub use error::{DispatchError, InvalidActionError};
pub use kernel::{Dispatcher, Store};
pub use reducer::Reducer;
pub use state::StoreState;
pub use subscribers::{Subscriber, SubscriberId, Subscription};
