//! Route table.
//!
//! A [`Routes`] builder collects `(template, Route)` pairs in registration
//! order; [`RoutesPatterns::compile`] turns it into matchers once, when the
//! router is built. Registration order is match priority.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;
use waypoint_urls::{PathMatcher, PathParams, PatternError};

use super::conditions::{ConditionOutput, Conditions, NavigationInformations};
use super::error::LoadError;

/// Future returned by a data loader.
pub type LoadDataFuture = LocalBoxFuture<'static, Result<Value, LoadError>>;

/// Future returned by an async component loader.
pub type ComponentFuture<C> = LocalBoxFuture<'static, Result<LoadedModule<C>, LoadError>>;

/// Route data loader, called with the approved navigation.
#[derive(Clone)]
pub struct LoadData(Rc<dyn Fn(&NavigationInformations) -> LoadDataFuture>);

impl LoadData {
	pub fn new<F, Fut>(loader: F) -> Self
	where
		F: Fn(&NavigationInformations) -> Fut + 'static,
		Fut: Future<Output = Result<Value, LoadError>> + 'static,
	{
		Self(Rc::new(
			move |info: &NavigationInformations| -> LoadDataFuture { Box::pin(loader(info)) },
		))
	}

	pub fn call(&self, info: &NavigationInformations) -> LoadDataFuture {
		(self.0)(info)
	}
}

impl fmt::Debug for LoadData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("LoadData(..)")
	}
}

/// What an async component loader resolves to.
#[derive(Debug, Clone)]
pub struct LoadedModule<C> {
	pub default: C,
	pub load_data: Option<LoadData>,
}

impl<C> LoadedModule<C> {
	pub fn new(default: C) -> Self {
		Self {
			default,
			load_data: None,
		}
	}

	pub fn with_load_data(mut self, load_data: LoadData) -> Self {
		self.load_data = Some(load_data);
		self
	}
}

/// A route whose component is available up front.
#[derive(Debug, Clone)]
pub struct SyncRoute<C> {
	pub(crate) component: C,
	pub(crate) load_data: Option<LoadData>,
	pub(crate) loading_component: Option<C>,
	pub(crate) conditions: Conditions,
	pub(crate) error_component: Option<C>,
}

impl<C> SyncRoute<C> {
	pub fn new(component: C) -> Self {
		Self {
			component,
			load_data: None,
			loading_component: None,
			conditions: Conditions::new(),
			error_component: None,
		}
	}

	pub fn load_data<F, Fut>(mut self, loader: F) -> Self
	where
		F: Fn(&NavigationInformations) -> Fut + 'static,
		Fut: Future<Output = Result<Value, LoadError>> + 'static,
	{
		self.load_data = Some(LoadData::new(loader));
		self
	}

	pub fn loading(mut self, component: C) -> Self {
		self.loading_component = Some(component);
		self
	}

	pub fn error(mut self, component: C) -> Self {
		self.error_component = Some(component);
		self
	}

	/// Appends one guard.
	pub fn condition<F, R>(mut self, guard: F) -> Self
	where
		F: Fn(&NavigationInformations) -> R + 'static,
		R: Into<ConditionOutput>,
	{
		self.conditions = self.conditions.with(guard);
		self
	}

	/// Replaces the guard list.
	pub fn conditions(mut self, conditions: Conditions) -> Self {
		self.conditions = conditions;
		self
	}

	pub fn component(&self) -> &C {
		&self.component
	}
}

/// A route whose component is loaded on demand.
pub struct AsyncRoute<C> {
	pub(crate) async_component: Rc<dyn Fn() -> ComponentFuture<C>>,
	pub(crate) loading_component: Option<C>,
	pub(crate) conditions: Conditions,
	pub(crate) error_component: Option<C>,
}

impl<C: 'static> AsyncRoute<C> {
	pub fn new<F, Fut>(loader: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<LoadedModule<C>, LoadError>> + 'static,
	{
		Self {
			async_component: Rc::new(move || -> ComponentFuture<C> { Box::pin(loader()) }),
			loading_component: None,
			conditions: Conditions::new(),
			error_component: None,
		}
	}

	pub fn loading(mut self, component: C) -> Self {
		self.loading_component = Some(component);
		self
	}

	pub fn error(mut self, component: C) -> Self {
		self.error_component = Some(component);
		self
	}

	pub fn condition<F, R>(mut self, guard: F) -> Self
	where
		F: Fn(&NavigationInformations) -> R + 'static,
		R: Into<ConditionOutput>,
	{
		self.conditions = self.conditions.with(guard);
		self
	}

	pub fn conditions(mut self, conditions: Conditions) -> Self {
		self.conditions = conditions;
		self
	}

	/// Starts loading the component.
	pub fn load_component(&self) -> ComponentFuture<C> {
		(self.async_component)()
	}
}

impl<C: Clone> Clone for AsyncRoute<C> {
	fn clone(&self) -> Self {
		Self {
			async_component: Rc::clone(&self.async_component),
			loading_component: self.loading_component.clone(),
			conditions: self.conditions.clone(),
			error_component: self.error_component.clone(),
		}
	}
}

impl<C: fmt::Debug> fmt::Debug for AsyncRoute<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AsyncRoute")
			.field("loading_component", &self.loading_component)
			.field("conditions", &self.conditions)
			.field("error_component", &self.error_component)
			.finish_non_exhaustive()
	}
}

/// Sync routes load as an immediately ready module.
impl<C: Clone + 'static> From<SyncRoute<C>> for AsyncRoute<C> {
	fn from(route: SyncRoute<C>) -> Self {
		let SyncRoute {
			component,
			load_data,
			loading_component,
			conditions,
			error_component,
		} = route;

		Self {
			async_component: Rc::new(move || -> ComponentFuture<C> {
				let module = LoadedModule {
					default: component.clone(),
					load_data: load_data.clone(),
				};
				Box::pin(futures::future::ready(Ok::<_, LoadError>(module)))
			}),
			loading_component,
			conditions,
			error_component,
		}
	}
}

/// A routable target.
#[derive(Debug, Clone)]
pub enum Route<C> {
	/// A bare component: no guards, no loader.
	Component(C),
	Sync(SyncRoute<C>),
	Async(AsyncRoute<C>),
}

impl<C> Route<C> {
	/// Guards of this route, if it can carry any.
	pub fn conditions(&self) -> Option<&Conditions> {
		match self {
			Self::Component(_) => None,
			Self::Sync(route) => Some(&route.conditions),
			Self::Async(route) => Some(&route.conditions),
		}
	}

	pub fn loading_component(&self) -> Option<&C> {
		match self {
			Self::Component(_) => None,
			Self::Sync(route) => route.loading_component.as_ref(),
			Self::Async(route) => route.loading_component.as_ref(),
		}
	}

	pub fn error_component(&self) -> Option<&C> {
		match self {
			Self::Component(_) => None,
			Self::Sync(route) => route.error_component.as_ref(),
			Self::Async(route) => route.error_component.as_ref(),
		}
	}
}

impl<C> From<SyncRoute<C>> for Route<C> {
	fn from(route: SyncRoute<C>) -> Self {
		Self::Sync(route)
	}
}

impl<C> From<AsyncRoute<C>> for Route<C> {
	fn from(route: AsyncRoute<C>) -> Self {
		Self::Async(route)
	}
}

/// Ordered route registrations.
#[derive(Debug, Clone)]
pub struct Routes<C> {
	entries: Vec<(String, Route<C>)>,
}

impl<C> Default for Routes<C> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
		}
	}
}

impl<C> Routes<C> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `route` for `template`.
	pub fn route(mut self, template: impl Into<String>, route: impl Into<Route<C>>) -> Self {
		self.entries.push((template.into(), route.into()));
		self
	}

	/// Registers a bare component for `template`.
	pub fn component(self, template: impl Into<String>, component: C) -> Self {
		self.route(template, Route::Component(component))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// A compiled route.
#[derive(Debug, Clone)]
pub struct RoutePattern<C> {
	pub path_matcher: PathMatcher,
	pub route: Route<C>,
	/// The source template.
	pub path: String,
}

/// Compiled route table, in priority order.
#[derive(Debug, Clone)]
pub struct RoutesPatterns<C> {
	patterns: Vec<RoutePattern<C>>,
}

impl<C> RoutesPatterns<C> {
	/// Compiles every template; the first malformed one fails the whole table.
	pub fn compile(routes: Routes<C>) -> Result<Self, PatternError> {
		let patterns = routes
			.entries
			.into_iter()
			.map(|(path, route)| {
				Ok(RoutePattern {
					path_matcher: PathMatcher::compile(&path)?,
					route,
					path,
				})
			})
			.collect::<Result<Vec<_>, PatternError>>()?;

		tracing::debug!(routes = patterns.len(), "route table compiled");
		Ok(Self { patterns })
	}

	/// First route matching `path`, with its parameters.
	pub fn match_path(&self, path: &str) -> Option<(&RoutePattern<C>, PathParams)> {
		self.patterns.iter().find_map(|pattern| {
			pattern
				.path_matcher
				.match_path(path)
				.map(|params| (pattern, params))
		})
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &RoutePattern<C>> {
		self.patterns.iter()
	}
}
