//! Client-side routing.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use waypoint_pages::router::{
//!     MemoryHistory, NavigateOptions, NavigationParams, Router, RouterConfig, Routes, SyncRoute,
//!     Verdict,
//! };
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let router = Router::new(
//!     Routes::new()
//!         .component("/", "home")
//!         .route(
//!             "/admin",
//!             SyncRoute::new("admin").condition(|info| {
//!                 if info.search_params.contains_key("token") {
//!                     Verdict::Pass
//!                 } else {
//!                     NavigationParams::new("/").query("next", "/admin").into()
//!                 }
//!             }),
//!         ),
//!     history.clone(),
//!     RouterConfig::default(),
//! )
//! .unwrap();
//!
//! router.push_with("/admin", NavigateOptions::new().hash("top")).unwrap();
//! assert_eq!(history.entries(), vec!["/", "/admin#top"]);
//!
//! let resolution = futures::executor::block_on(router.resolve()).unwrap();
//! let resolved = resolution.approved().unwrap();
//! assert_eq!(resolved.path, "/");
//! assert_eq!(router.location().get().href(), "/?next=%2Fadmin");
//! ```

pub mod conditions;
pub mod config;
pub mod core;
pub mod error;
pub mod history;
pub mod links;
pub mod location;
pub mod navigation;
pub mod render;
pub mod route;
pub mod scroll;

pub use conditions::{
	ConditionFuture, ConditionOutput, Conditions, NavigationInformations, RoutePreCondition,
	Verdict, check_conditions,
};
pub use config::{DEFAULT_MAX_REDIRECTS, RouterConfig, RoutingMode};
pub use self::core::{CurrentMatch, Resolution, ResolvedRoute, ResolverPhase, Router};
pub use error::{ConditionError, HistoryError, LoadError, RouterError, ViewError};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{
	History, HistoryEvent, HistoryListener, ListenerHandle, MemoryHistory, NavigationType,
};
#[cfg(target_arch = "wasm32")]
pub use links::intercept_links;
pub use links::{LinkOutcome, LinkTarget};
pub use location::{LocationState, RouterLocation, split_hash_location};
pub use navigation::{NavigateOptions, NavigationParams, build_location, history_url};
pub use render::RouteView;
pub use route::{
	AsyncRoute, ComponentFuture, LoadData, LoadDataFuture, LoadedModule, Route, RoutePattern,
	Routes, RoutesPatterns, SyncRoute,
};
pub use scroll::{ScrollTarget, restore_scroll};
