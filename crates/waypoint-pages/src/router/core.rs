//! Core Router Implementation.
//!
//! [`Router`] owns the compiled route table, the [`LocationState`] and the
//! host [`History`]. [`Router::resolve`] turns the current location into a
//! [`Resolution`]:
//!
//! 1. the first route (in registration order) whose matcher accepts the
//!    path is selected, and its path/search parameters are extracted;
//! 2. its guards run in order;
//! 3. `Pass` approves, `Deny` denies, `Redirect` replace-navigates and
//!    restarts at step 1. A guard that fails yields [`Resolution::Failed`]
//!    carrying the matched route, so its error component can be shown.
//!
//! Every location change bumps a generation counter. A resolution that
//! observes a newer generation after awaiting guards is discarded as
//! [`Resolution::Superseded`] without redirecting.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use waypoint_core::{Signal, Subscription};
use waypoint_urls::{PathParams, SearchParams, parse_search};

use super::conditions::{NavigationInformations, Verdict, check_conditions};
use super::config::RouterConfig;
use super::error::{ConditionError, RouterError};
use super::history::{History, ListenerHandle, NavigationType};
use super::location::{LocationState, RouterLocation};
use super::route::{Route, RoutePattern, Routes, RoutesPatterns};
use super::scroll::restore_scroll;

/// Where the resolver currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolverPhase {
	#[default]
	Idle,
	Matching,
	ConditionsPending,
}

/// A matched route with its parameters.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<C> {
	pub route: Route<C>,
	/// Template of the matched route.
	pub path: String,
	pub path_params: PathParams,
	pub search_params: SearchParams,
	pub location: RouterLocation,
}

impl<C> ResolvedRoute<C> {
	/// The snapshot handed to data loaders.
	pub fn navigation_informations(&self) -> NavigationInformations {
		NavigationInformations {
			location: self.location.clone(),
			path_params: self.path_params.clone(),
			search_params: self.search_params.clone(),
		}
	}
}

/// Outcome of one resolution.
#[derive(Debug, Clone)]
pub enum Resolution<C> {
	/// Render this route.
	Approved(ResolvedRoute<C>),
	/// No route matches the location.
	NoMatch(RouterLocation),
	/// A guard denied the location.
	Denied(RouterLocation),
	/// A guard failed; the route's error component should be shown.
	Failed {
		resolved: ResolvedRoute<C>,
		error: ConditionError,
	},
	/// The location changed while guards were pending.
	Superseded,
}

impl<C> Resolution<C> {
	pub fn is_approved(&self) -> bool {
		matches!(self, Self::Approved(_))
	}

	pub fn approved(self) -> Option<ResolvedRoute<C>> {
		match self {
			Self::Approved(resolved) => Some(resolved),
			_ => None,
		}
	}
}

/// Last approved match.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentMatch {
	/// Template of the matched route.
	pub path: String,
	pub path_params: PathParams,
	pub search_params: SearchParams,
}

pub(super) struct RouterInner<C: 'static> {
	pub(super) routes: RoutesPatterns<C>,
	pub(super) location: LocationState,
	pub(super) history: Rc<dyn History>,
	pub(super) config: RouterConfig,
	generation: Rc<Cell<u64>>,
	redirecting: Cell<bool>,
	/// Resolutions currently running.
	in_flight: Cell<usize>,
	phase: Signal<ResolverPhase>,
	current_match: Signal<Option<CurrentMatch>>,
	_generation_watch: Subscription,
	_host_listener: ListenerHandle,
}

/// Client-side router.
///
/// Clones share the same state. The router is single-threaded.
pub struct Router<C: 'static> {
	pub(super) inner: Rc<RouterInner<C>>,
}

impl<C: 'static> Clone for Router<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<C: 'static> fmt::Debug for Router<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.inner.routes.len())
			.field("location", &self.inner.location.snapshot())
			.field("config", &self.inner.config)
			.field("generation", &self.inner.generation.get())
			.finish()
	}
}

impl<C: Clone + 'static> Router<C> {
	/// Compiles `routes`, reads the initial location from `history` and
	/// starts following host traversals.
	pub fn new(
		routes: Routes<C>,
		history: Rc<dyn History>,
		config: RouterConfig,
	) -> Result<Self, RouterError> {
		let routes = RoutesPatterns::compile(routes)?;
		let location = LocationState::from_history(history.as_ref(), config.mode())?;

		let generation = Rc::new(Cell::new(0u64));
		let counter = Rc::clone(&generation);
		let generation_watch =
			location.subscribe(move |_| counter.set(counter.get().wrapping_add(1)));
		let host_listener = location.attach(&history)?;

		tracing::debug!(
			routes = routes.len(),
			mode = ?config.mode(),
			location = %location.snapshot(),
			"router created"
		);

		Ok(Self {
			inner: Rc::new(RouterInner {
				routes,
				location,
				history,
				config,
				generation,
				redirecting: Cell::new(false),
				in_flight: Cell::new(0),
				phase: Signal::new(ResolverPhase::Idle),
				current_match: Signal::new(None),
				_generation_watch: generation_watch,
				_host_listener: host_listener,
			}),
		})
	}

	pub fn location(&self) -> &LocationState {
		&self.inner.location
	}

	pub fn history(&self) -> &Rc<dyn History> {
		&self.inner.history
	}

	pub fn config(&self) -> &RouterConfig {
		&self.inner.config
	}

	pub fn routes(&self) -> &RoutesPatterns<C> {
		&self.inner.routes
	}

	/// Phase of the most recently advanced resolution.
	///
	/// Overlapping resolutions share this signal; it returns to
	/// [`ResolverPhase::Idle`] only once none of them is running.
	pub fn phase(&self) -> &Signal<ResolverPhase> {
		&self.inner.phase
	}

	/// The last approved match; written only when the route or its
	/// parameters change.
	pub fn current_match(&self) -> &Signal<Option<CurrentMatch>> {
		&self.inner.current_match
	}

	/// Number of location changes so far.
	pub fn generation(&self) -> u64 {
		self.inner.generation.get()
	}

	/// First route matching `path`, without running guards.
	pub fn match_path(&self, path: &str) -> Option<(&RoutePattern<C>, PathParams)> {
		self.inner.routes.match_path(path)
	}

	/// Resolves the current location.
	pub async fn resolve(&self) -> Result<Resolution<C>, RouterError> {
		self.inner.in_flight.set(self.inner.in_flight.get() + 1);
		let result = self.resolve_current().await;
		let remaining = self.inner.in_flight.get().saturating_sub(1);
		self.inner.in_flight.set(remaining);
		if remaining == 0 {
			self.inner.phase.set_if_changed(ResolverPhase::Idle);
		}
		result
	}

	async fn resolve_current(&self) -> Result<Resolution<C>, RouterError> {
		let mut chain: Vec<String> = Vec::new();

		loop {
			let generation = self.inner.generation.get();
			let location = self.inner.location.snapshot();
			self.inner.phase.set_if_changed(ResolverPhase::Matching);

			let Some((pattern, path_params)) = self.inner.routes.match_path(location.path())
			else {
				tracing::debug!(path = location.path(), "no route matched");
				return Ok(Resolution::NoMatch(RouterLocation::clone(&location)));
			};
			let route = pattern.route.clone();
			let template = pattern.path.clone();
			let search_params = parse_search(location.search());

			let outcome = match route.conditions().filter(|conditions| !conditions.is_empty()) {
				Some(conditions) => {
					self.inner.phase.set_if_changed(ResolverPhase::ConditionsPending);
					check_conditions(conditions, &location, &path_params, &search_params).await
				}
				None => Ok(Verdict::Pass),
			};

			if self.inner.generation.get() != generation {
				tracing::debug!(
					path = location.path(),
					"location changed while conditions were pending; discarding resolution"
				);
				return Ok(Resolution::Superseded);
			}

			let verdict = match outcome {
				Ok(verdict) => verdict,
				Err(error) => {
					tracing::warn!(
						path = location.path(),
						route = %template,
						error = %error,
						"route condition failed"
					);
					return Ok(Resolution::Failed {
						resolved: ResolvedRoute {
							route,
							path: template,
							path_params,
							search_params,
							location: RouterLocation::clone(&location),
						},
						error,
					});
				}
			};

			match verdict {
				Verdict::Pass => {
					tracing::debug!(path = location.path(), route = %template, "route approved");
					self.inner.current_match.set_if_changed(Some(CurrentMatch {
						path: template.clone(),
						path_params: path_params.clone(),
						search_params: search_params.clone(),
					}));
					return Ok(Resolution::Approved(ResolvedRoute {
						route,
						path: template,
						path_params,
						search_params,
						location: RouterLocation::clone(&location),
					}));
				}
				Verdict::Deny => {
					tracing::warn!(path = location.path(), route = %template, "navigation denied");
					return Ok(Resolution::Denied(RouterLocation::clone(&location)));
				}
				Verdict::Redirect(target) => {
					chain.push(location.href());
					let limit = self.inner.config.max_redirects;
					if chain.len() > limit {
						chain.push(target.path);
						tracing::warn!(limit, chain = ?chain, "redirect limit exceeded");
						return Err(RouterError::RedirectLoop { limit, chain });
					}
					tracing::debug!(
						from = %location,
						to = %target.path,
						"route condition redirected"
					);

					self.inner.redirecting.set(true);
					let written = self.navigate_to(&target, NavigationType::Replace);
					self.inner.redirecting.set(false);
					written?;
				}
			}
		}
	}

	/// Re-resolves on every location change.
	///
	/// Each resolution is handed to `spawn` as a local future and its result
	/// to `on_resolution`. Redirects issued by a running resolution are
	/// followed by that resolution and do not spawn another. The watch stops
	/// when the returned subscription is dropped.
	pub fn watch<S, F>(&self, spawn: S, on_resolution: F) -> Subscription
	where
		S: Fn(LocalBoxFuture<'static, ()>) + 'static,
		F: Fn(Result<Resolution<C>, RouterError>) + 'static,
	{
		let weak = Rc::downgrade(&self.inner);
		let on_resolution = Rc::new(on_resolution);

		self.inner.location.subscribe(move |_| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			if inner.redirecting.get() {
				return;
			}
			let generation = inner.generation.get();
			let router = Router { inner };
			let on_resolution = Rc::clone(&on_resolution);

			let resolution: LocalBoxFuture<'static, ()> = Box::pin(async move {
				// Skip resolutions already overtaken before they started.
				let result = if router.generation() == generation {
					router.resolve().await
				} else {
					Ok(Resolution::Superseded)
				};
				router.after_resolution(&result);
				on_resolution(result);
			});
			spawn(resolution);
		})
	}

	/// Resolves the current location, then keeps resolving on every change
	/// using `wasm_bindgen_futures::spawn_local`.
	#[cfg(target_arch = "wasm32")]
	pub fn start<F>(&self, on_resolution: F) -> Subscription
	where
		F: Fn(Result<Resolution<C>, RouterError>) + 'static,
	{
		let on_resolution = Rc::new(on_resolution);

		let router = self.clone();
		let initial = Rc::clone(&on_resolution);
		wasm_bindgen_futures::spawn_local(async move {
			let result = router.resolve().await;
			router.after_resolution(&result);
			initial(result);
		});

		self.watch(
			|future| wasm_bindgen_futures::spawn_local(future),
			move |result| on_resolution(result),
		)
	}

	fn after_resolution(&self, result: &Result<Resolution<C>, RouterError>) {
		match result {
			Ok(Resolution::Approved(resolved)) if self.inner.config.scroll_restoration => {
				if let Err(err) = restore_scroll(resolved.location.hash()) {
					tracing::warn!(error = %err, "scroll restoration failed");
				}
			}
			Err(err) => tracing::warn!(error = %err, "route resolution failed"),
			_ => {}
		}
	}
}
