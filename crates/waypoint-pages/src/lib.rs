//! Waypoint Pages - Client-side Router Runtime
//!
//! Maps URL paths to view components, runs navigation guards and keeps a
//! reactive location in sync with the host history stack.
//!
//! ## Architecture
//!
//! - [`router::location`]: [`LocationState`](router::LocationState), the
//!   router-owned reactive cell mirroring `{path, search, hash}`, with path
//!   and hash routing modes
//! - [`router::history`]: the [`History`](router::History) seam over the
//!   host entry stack (`MemoryHistory` everywhere, `BrowserHistory` on wasm32)
//! - [`router::conditions`]: sequential, short-circuiting guard evaluation
//! - [`router::route`]: route table types and compiled route patterns
//! - [`router::core`]: the [`Router`](router::Router) and its resolver
//! - [`router::navigation`]: push/replace/back/forward
//! - [`router::render`]: loading/ready/error view states for approved routes
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use waypoint_pages::router::{
//!     MemoryHistory, Resolution, Router, RouterConfig, Routes, SyncRoute,
//! };
//!
//! let routes = Routes::new()
//!     .component("/", "home")
//!     .route("/users/:id", SyncRoute::new("user").condition(|_| true));
//!
//! let history = Rc::new(MemoryHistory::new("/users/42"));
//! let router = Router::new(routes, history, RouterConfig::default()).unwrap();
//!
//! let resolution = futures::executor::block_on(router.resolve()).unwrap();
//! match resolution {
//!     Resolution::Approved(resolved) => {
//!         assert_eq!(resolved.path, "/users/:id");
//!         assert_eq!(resolved.path_params.get_as::<u64>("id").unwrap(), 42);
//!     }
//!     other => panic!("unexpected resolution: {:?}", other),
//! }
//! ```

pub mod router;

pub use router::{
	NavigateOptions, NavigationParams, Resolution, ResolvedRoute, Route, Router, RouterConfig,
	RouterError, RouterLocation, Routes,
};
