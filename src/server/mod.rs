//! Static file server
//!
//! Accepts one connection at a time and serves it to completion with the
//! connection state machine in [`crate::http::connection`].

pub mod dispatch;
pub mod files;
pub mod listener;

pub use dispatch::Dispatcher;
pub use files::{Lookup, StaticFiles};
