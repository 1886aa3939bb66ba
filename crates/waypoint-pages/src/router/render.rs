//! View states for approved routes.
//!
//! The router does not render anything itself. For an approved route it
//! describes what the rendering layer should show: the loading component
//! while the component and its data load, the component with its data once
//! both are available, or the error component when either loader fails.
//! A route whose guard failed is shown through its error component as well.

use serde_json::Value;

use super::core::{Resolution, ResolvedRoute};
use super::error::ViewError;
use super::route::{AsyncRoute, Route};

/// What to show for an approved route.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteView<C> {
	/// Still loading; shows the loading component, if any.
	Loading(Option<C>),
	Ready {
		component: C,
		/// Result of the route's data loader, if it has one.
		data: Option<Value>,
	},
	Failed {
		error_component: Option<C>,
		error: ViewError,
	},
}

impl<C> RouteView<C> {
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading(_))
	}

	pub fn is_ready(&self) -> bool {
		matches!(self, Self::Ready { .. })
	}
}

impl<C: Clone + 'static> ResolvedRoute<C> {
	/// The view to show before [`load`](Self::load) completes.
	///
	/// Bare components and sync routes without a data loader are ready
	/// immediately.
	pub fn initial_view(&self) -> RouteView<C> {
		match &self.route {
			Route::Component(component) => RouteView::Ready {
				component: component.clone(),
				data: None,
			},
			Route::Sync(route) if route.load_data.is_none() => RouteView::Ready {
				component: route.component.clone(),
				data: None,
			},
			Route::Sync(route) => RouteView::Loading(route.loading_component.clone()),
			Route::Async(route) => RouteView::Loading(route.loading_component.clone()),
		}
	}

	/// The error view of this route.
	pub fn failed_view(&self, error: impl Into<ViewError>) -> RouteView<C> {
		RouteView::Failed {
			error_component: self.route.error_component().cloned(),
			error: error.into(),
		}
	}

	/// Loads the component, then its data.
	pub async fn load(&self) -> RouteView<C> {
		let route = match &self.route {
			Route::Component(component) => {
				return RouteView::Ready {
					component: component.clone(),
					data: None,
				};
			}
			Route::Sync(route) => AsyncRoute::from(route.clone()),
			Route::Async(route) => route.clone(),
		};

		let module = match route.load_component().await {
			Ok(module) => module,
			Err(error) => {
				tracing::warn!(route = %self.path, error = %error, "component loader failed");
				return self.failed_view(error);
			}
		};

		let data = match &module.load_data {
			Some(load_data) => match load_data.call(&self.navigation_informations()).await {
				Ok(data) => Some(data),
				Err(error) => {
					tracing::warn!(route = %self.path, error = %error, "data loader failed");
					return self.failed_view(error);
				}
			},
			None => None,
		};

		RouteView::Ready {
			component: module.default,
			data,
		}
	}
}

impl<C: Clone + 'static> Resolution<C> {
	/// The error view for a resolution whose guard failed.
	pub fn failure_view(&self) -> Option<RouteView<C>> {
		match self {
			Self::Failed { resolved, error } => Some(resolved.failed_view(error.clone())),
			_ => None,
		}
	}
}
