//! Navigation Commands.
//!
//! `push`/`replace` write the new [`RouterLocation`] into Location State
//! first and then into the host history, so observers have already seen the
//! new location when the history write happens. `back`/`forward` only ask
//! the host to traverse; Location State follows from the host signal.

use waypoint_urls::{ParamValue, SearchParams, serialize_search};

use super::config::RoutingMode;
use super::core::Router;
use super::error::RouterError;
use super::history::NavigationType;
use super::location::RouterLocation;

/// Optional parts of a navigation target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
	/// Serialized into the search string when present.
	pub query_params: Option<SearchParams>,
	/// Fragment without `#`; percent-encoded when written.
	pub hash: Option<String>,
}

impl NavigateOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds one query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.query_params
			.get_or_insert_with(SearchParams::new)
			.insert(name, value);
		self
	}

	pub fn query_params(mut self, params: SearchParams) -> Self {
		self.query_params = Some(params);
		self
	}

	pub fn hash(mut self, hash: impl Into<String>) -> Self {
		self.hash = Some(hash.into());
		self
	}
}

/// A navigation target, as returned by redirecting guards.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationParams {
	pub path: String,
	pub options: NavigateOptions,
}

impl NavigationParams {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			options: NavigateOptions::default(),
		}
	}

	pub fn with_options(mut self, options: NavigateOptions) -> Self {
		self.options = options;
		self
	}

	pub fn query(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.options = self.options.query(name, value);
		self
	}

	pub fn hash(mut self, hash: impl Into<String>) -> Self {
		self.options = self.options.hash(hash);
		self
	}

	/// The location this target navigates to.
	pub fn to_location(&self) -> Result<RouterLocation, RouterError> {
		build_location(&self.path, &self.options)
	}
}

/// Builds the location for a navigation.
///
/// `path` must not contain `?` or `#`; the query and fragment come from
/// `options`.
pub fn build_location(
	path: &str,
	options: &NavigateOptions,
) -> Result<RouterLocation, RouterError> {
	if path.contains(['?', '#']) {
		return Err(RouterError::InvalidPath(path.to_string()));
	}

	let search = options
		.query_params
		.as_ref()
		.map(serialize_search)
		.unwrap_or_default();

	let hash = match options.hash.as_deref() {
		Some(hash) => {
			let hash = hash.strip_prefix('#').unwrap_or(hash);
			if hash.is_empty() {
				String::new()
			} else {
				format!("#{}", urlencoding::encode(hash))
			}
		}
		None => String::new(),
	};

	RouterLocation::new(path, search, hash)
}

/// The URL written to the host history for `location`.
pub fn history_url(location: &RouterLocation, mode: RoutingMode) -> String {
	match mode {
		RoutingMode::Path => location.href(),
		RoutingMode::Hash => format!("#{}", location.href()),
	}
}

impl<C: Clone + 'static> Router<C> {
	/// Navigates to `path`, adding a history entry.
	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.navigate(path, &NavigateOptions::default(), NavigationType::Push)
	}

	/// Navigates to `path` with a query and/or fragment, adding a history entry.
	pub fn push_with(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		self.navigate(path, &options, NavigationType::Push)
	}

	/// Navigates to `path`, replacing the current history entry.
	pub fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.navigate(path, &NavigateOptions::default(), NavigationType::Replace)
	}

	pub fn replace_with(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		self.navigate(path, &options, NavigationType::Replace)
	}

	/// Applies a navigation target.
	pub fn navigate_to(
		&self,
		target: &NavigationParams,
		nav_type: NavigationType,
	) -> Result<(), RouterError> {
		self.navigate(&target.path, &target.options, nav_type)
	}

	/// Steps back one history entry.
	pub fn back(&self) -> Result<(), RouterError> {
		self.inner.history.go_back()?;
		Ok(())
	}

	/// Steps forward one history entry.
	pub fn forward(&self) -> Result<(), RouterError> {
		self.inner.history.go_forward()?;
		Ok(())
	}

	fn navigate(
		&self,
		path: &str,
		options: &NavigateOptions,
		nav_type: NavigationType,
	) -> Result<(), RouterError> {
		let location = build_location(path, options)?;
		self.commit(location, nav_type)
	}

	/// Writes `location` to Location State, then to the host history.
	pub(super) fn commit(
		&self,
		location: RouterLocation,
		nav_type: NavigationType,
	) -> Result<(), RouterError> {
		let url = history_url(&location, self.inner.location.mode());
		tracing::debug!(url = %url, nav_type = ?nav_type, "navigating");

		self.inner.location.set(location);

		let written = match nav_type {
			NavigationType::Push => self.inner.history.push_entry(&url),
			NavigationType::Replace => self.inner.history.replace_entry(&url),
		};
		written.map_err(|err| {
			tracing::warn!(url = %url, error = %err, "history write failed");
			RouterError::NavigationFailed(err)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::router::config::RouterConfig;
	use crate::router::history::{History, MemoryHistory};
	use crate::router::route::Routes;
	use rstest::rstest;
	use std::rc::Rc;

	fn router(url: &str, config: RouterConfig) -> (Router<&'static str>, Rc<MemoryHistory>) {
		let history = Rc::new(MemoryHistory::new(url));
		let router = Router::new(
			Routes::new().component("/", "home").component("/a", "a"),
			history.clone(),
			config,
		)
		.unwrap();
		(router, history)
	}

	#[rstest]
	#[case(NavigateOptions::new(), "/a")]
	#[case(NavigateOptions::new().query("x", 1), "/a?x=1")]
	#[case(NavigateOptions::new().hash("top"), "/a#top")]
	#[case(NavigateOptions::new().hash(""), "/a")]
	#[case(NavigateOptions::new().hash("two words"), "/a#two%20words")]
	#[case(NavigateOptions::new().query_params(SearchParams::new()), "/a")]
	#[case(NavigateOptions::new().query("q", "a b").hash("h"), "/a?q=a%20b#h")]
	fn test_build_location(#[case] options: NavigateOptions, #[case] href: &str) {
		assert_eq!(build_location("/a", &options).unwrap().href(), href);
	}

	#[rstest]
	#[case("/a?x=1")]
	#[case("/a#top")]
	fn test_build_location_rejects_embedded_query(#[case] path: &str) {
		assert_eq!(
			build_location(path, &NavigateOptions::new()),
			Err(RouterError::InvalidPath(path.to_string()))
		);
	}

	#[rstest]
	fn test_history_url() {
		let location = RouterLocation::from_url("/a?x=1#top");
		assert_eq!(history_url(&location, RoutingMode::Path), "/a?x=1#top");
		assert_eq!(history_url(&location, RoutingMode::Hash), "#/a?x=1#top");
	}

	#[rstest]
	fn test_push_updates_state_then_history() {
		let (router, history) = router("/", RouterConfig::default());
		let seen_history_len = Rc::new(std::cell::Cell::new(0));

		let probe = Rc::clone(&history);
		let len = Rc::clone(&seen_history_len);
		let _sub = router.location().subscribe(move |_| len.set(probe.len()));

		router.push_with("/a", NavigateOptions::new().query("x", 1)).unwrap();

		assert_eq!(router.location().get().href(), "/a?x=1");
		assert_eq!(history.entries(), vec!["/", "/a?x=1"]);
		// The observer ran before the history entry was added.
		assert_eq!(seen_history_len.get(), 1);
	}

	#[rstest]
	fn test_replace_mutates_current_entry() {
		let (router, history) = router("/", RouterConfig::default());
		router.push("/a").unwrap();
		router.replace_with("/", NavigateOptions::new().hash("x")).unwrap();

		assert_eq!(history.entries(), vec!["/", "/#x"]);
		assert_eq!(router.location().get().hash(), "#x");
	}

	#[rstest]
	fn test_hash_mode_writes_fragment() {
		let (router, history) = router("/index.html", RouterConfig::hash());
		assert_eq!(router.location().get().path(), "/");

		router.push_with("/a", NavigateOptions::new().query("x", 1)).unwrap();

		assert_eq!(history.location().unwrap().href(), "/index.html#/a?x=1");
		assert_eq!(router.location().get().href(), "/a?x=1");
	}

	#[rstest]
	fn test_invalid_path_leaves_state_untouched() {
		let (router, history) = router("/", RouterConfig::default());
		assert!(matches!(
			router.push("/a?x=1"),
			Err(RouterError::InvalidPath(_))
		));
		assert_eq!(router.location().get().path(), "/");
		assert_eq!(history.len(), 1);
	}

	#[rstest]
	fn test_back_and_forward_follow_host() {
		let (router, _history) = router("/", RouterConfig::default());
		router.push("/a").unwrap();

		router.back().unwrap();
		assert_eq!(router.location().get().path(), "/");

		router.forward().unwrap();
		assert_eq!(router.location().get().path(), "/a");
	}

	#[rstest]
	fn test_back_and_forward_in_hash_mode() {
		let (router, _history) = router("/", RouterConfig::hash());
		router.push("/a").unwrap();
		router.push_with("/a", NavigateOptions::new().hash("end")).unwrap();

		router.back().unwrap();
		assert_eq!(router.location().get().href(), "/a");

		router.back().unwrap();
		assert_eq!(router.location().get().href(), "/");
	}

	#[rstest]
	fn test_navigate_to_params() {
		let (router, history) = router("/", RouterConfig::default());
		let target = NavigationParams::new("/a").query("next", "/").hash("h");
		router.navigate_to(&target, NavigationType::Replace).unwrap();

		assert_eq!(router.location().get().href(), "/a?next=%2F#h");
		assert_eq!(history.entries(), vec!["/a?next=%2F#h"]);
		assert_eq!(target.to_location().unwrap(), router.location().get());
	}
}
