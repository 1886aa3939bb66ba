//! # Waypoint
//!
//! A client-side router for single-page applications.
//!
//! Waypoint maps URL paths to view components, extracts typed path and query
//! parameters, runs ordered (possibly asynchronous) guards with redirect
//! semantics, and keeps a reactive location in sync with the host history,
//! with a hash-based fallback mode.
//!
//! ## Crates
//!
//! - [`core`]: `Signal`, the observable value the location lives in
//! - [`urls`]: route template compiler and query/path parameter codec
//! - [`pages`]: location state, history, guards, resolver and navigation
//!
//! ## Feature Flags
//!
//! - `pages` (default) - Router runtime. Without it only the reactive
//!   primitives and the parameter codec are built.
//!
//! ## Quick Example
//!
//! ```
//! use std::rc::Rc;
//! use waypoint::prelude::*;
//!
//! let history = Rc::new(MemoryHistory::new("/users/7?tab=posts"));
//! let router = Router::new(
//!     Routes::new()
//!         .component("/", "home")
//!         .route(
//!             "/users/:id",
//!             SyncRoute::new("user").condition(|info| info.path_params.get_as::<u32>("id").is_ok()),
//!         ),
//!     history,
//!     RouterConfig::default(),
//! )
//! .unwrap();
//!
//! match futures::executor::block_on(router.resolve()).unwrap() {
//!     Resolution::Approved(resolved) => {
//!         assert_eq!(resolved.path_params.get_as::<u32>("id").unwrap(), 7);
//!         assert_eq!(
//!             resolved.search_params.get("tab"),
//!             Some(&ParamValue::from("posts"))
//!         );
//!     }
//!     other => panic!("unexpected resolution: {:?}", other),
//! }
//! ```

pub mod core;
#[cfg(feature = "pages")]
pub mod pages;
pub mod urls;

pub use waypoint_core::{Signal, Subscription};
pub use waypoint_urls::{
	ParamMap, ParamValue, PathError, PathMatcher, PathParams, PatternError, SearchParams,
	parse_search, serialize_search,
};

#[cfg(feature = "pages")]
pub use waypoint_pages::router::{
	NavigateOptions, NavigationParams, Resolution, ResolvedRoute, Route, Router, RouterConfig,
	RouterError, RouterLocation, Routes,
};

/// Prelude module for convenient imports
///
/// Import everything commonly needed with:
/// ```
/// use waypoint::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{ParamMap, ParamValue, PathParams, SearchParams, Signal};

	#[cfg(feature = "pages")]
	pub use waypoint_pages::router::{
		AsyncRoute, ConditionError, ConditionOutput, Conditions, History, LoadError, LoadedModule,
		MemoryHistory, NavigateOptions, NavigationInformations, NavigationParams, NavigationType,
		Resolution, ResolvedRoute, Route, RouteView, Router, RouterConfig, RouterError,
		RouterLocation, Routes, SyncRoute, Verdict, ViewError,
	};

	#[cfg(all(feature = "pages", target_arch = "wasm32"))]
	pub use waypoint_pages::router::{BrowserHistory, intercept_links};
}
