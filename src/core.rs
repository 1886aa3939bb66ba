//! Reactive primitives.
//!
//! # Examples
//!
//! ```
//! use waypoint::core::Signal;
//!
//! let visits = Signal::new(0);
//! visits.set(visits.get() + 1);
//! assert_eq!(visits.get(), 1);
//! ```

pub use waypoint_core::*;
