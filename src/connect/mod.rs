//! Bridge between a [`Store`](crate::store::Store) and a consumer that
//! renders from props.
//!
//! # Lifecycle
//!
//! ```text
//! connect() ──wrap──→ Connected ──mount(store, own)──→ Bridge ──unmount/drop──→ gone
//!                                                       │  ↑
//!                              store notification ──────┘  └── set_own_props
//!                              (recompute + render)
//! ```
//!
//! - **Projections**: `map_state` runs on every notification, `map_dispatch`
//!   once per mount
//! - **Props**: state, dispatch and own props kept side by side in
//!   [`ConnectedProps`]
//! - **Consumer**: anything that renders from props

mod bridge;
mod consumer;
mod props;

pub use bridge::{connect, Bridge, Connect, Connected};
pub use consumer::{render_fn, Consumer, RenderFn};
pub use props::ConnectedProps;
