//! Client-side router runtime.
//!
//! This module provides access to waypoint-pages: the reactive location,
//! host history integration, route guards and the route resolver.
//!
//! ## Architecture
//!
//! - **Location State**: a router-owned `Signal` mirroring `{path, search, hash}`
//! - **History**: `MemoryHistory` natively, `BrowserHistory` on wasm32
//! - **Guards**: ordered, short-circuiting, possibly asynchronous
//! - **Resolver**: first match wins, redirects are bounded, stale results are discarded
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use waypoint::pages::router::{MemoryHistory, Router, RouterConfig, Routes};
//!
//! let router = Router::new(
//!     Routes::new().component("/", "home").component("/about", "about"),
//!     Rc::new(MemoryHistory::new("/")),
//!     RouterConfig::default(),
//! )
//! .unwrap();
//!
//! router.push("/about").unwrap();
//! let resolved = futures::executor::block_on(router.resolve())
//!     .unwrap()
//!     .approved()
//!     .unwrap();
//! assert_eq!(resolved.path, "/about");
//! ```

// Re-export all waypoint-pages functionality
pub use waypoint_pages::*;
