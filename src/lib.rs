//! Minimal synchronous single-writer state store.
//!
//! - [`store`]: state holder, dispatch, subscribe/unsubscribe
//! - [`connect`]: bridge projecting store state and dispatch into consumer props
//! - [`notes`]: note-taking state, actions and reducer built on the store

pub mod cli;
pub mod config;
pub mod connect;
pub mod logging;
pub mod notes;
pub mod store;
