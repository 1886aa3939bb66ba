//! Reactive state for the router.
//!
//! Unlike a dependency-tracking runtime, the router only needs explicit
//! subscriptions: the location cell is written by navigation commands and
//! host history events, and read by the resolver and UI observers, all on
//! the same event-loop thread.

mod signal;

pub use signal::{Signal, Subscription};
