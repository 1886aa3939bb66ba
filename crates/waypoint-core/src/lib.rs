//! # Waypoint Core
//!
//! Core primitives shared by the Waypoint router crates.
//!
//! - [`reactive`]: [`Signal`](reactive::Signal), a single-threaded observable
//!   state holder whose subscribers run synchronously on every replacement.

pub mod reactive;

pub use reactive::{Signal, Subscription};
