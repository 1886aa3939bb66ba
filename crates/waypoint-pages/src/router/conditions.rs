//! Route guards.
//!
//! A route may carry any number of preconditions. They are evaluated in
//! declared order, one at a time: a deferred guard is awaited to completion
//! before the next guard is even called. The first verdict other than
//! [`Verdict::Pass`] ends the evaluation.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use waypoint_urls::{PathParams, SearchParams};

use super::error::ConditionError;
use super::location::RouterLocation;
use super::navigation::NavigationParams;

/// Read-only snapshot handed to guards and data loaders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationInformations {
	pub location: RouterLocation,
	pub path_params: PathParams,
	pub search_params: SearchParams,
}

/// Outcome of a single guard.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
	/// Continue with the next guard.
	Pass,
	/// Stop; do not render the route.
	Deny,
	/// Stop and navigate elsewhere instead.
	Redirect(NavigationParams),
}

impl Verdict {
	pub fn is_pass(&self) -> bool {
		matches!(self, Self::Pass)
	}
}

impl From<bool> for Verdict {
	fn from(pass: bool) -> Self {
		if pass { Self::Pass } else { Self::Deny }
	}
}

impl From<NavigationParams> for Verdict {
	fn from(target: NavigationParams) -> Self {
		Self::Redirect(target)
	}
}

/// Future returned by a deferred guard.
pub type ConditionFuture = LocalBoxFuture<'static, Result<Verdict, ConditionError>>;

/// What a guard returns: a verdict now, or one later.
pub enum ConditionOutput {
	Ready(Result<Verdict, ConditionError>),
	Deferred(ConditionFuture),
}

impl ConditionOutput {
	/// Wraps a future resolving to anything convertible to a [`Verdict`].
	pub fn deferred<F, V>(future: F) -> Self
	where
		F: Future<Output = Result<V, ConditionError>> + 'static,
		V: Into<Verdict>,
	{
		Self::Deferred(Box::pin(async move { future.await.map(Into::into) }))
	}

	/// Rejects with `message`.
	pub fn fail(message: impl Into<String>) -> Self {
		Self::Ready(Err(ConditionError::new(message)))
	}

	/// Waits for the verdict.
	pub async fn resolve(self) -> Result<Verdict, ConditionError> {
		match self {
			Self::Ready(result) => result,
			Self::Deferred(future) => future.await,
		}
	}
}

impl fmt::Debug for ConditionOutput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
			Self::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}

impl From<bool> for ConditionOutput {
	fn from(pass: bool) -> Self {
		Self::Ready(Ok(pass.into()))
	}
}

impl From<Verdict> for ConditionOutput {
	fn from(verdict: Verdict) -> Self {
		Self::Ready(Ok(verdict))
	}
}

impl From<NavigationParams> for ConditionOutput {
	fn from(target: NavigationParams) -> Self {
		Self::Ready(Ok(Verdict::Redirect(target)))
	}
}

impl<V: Into<Verdict>> From<Result<V, ConditionError>> for ConditionOutput {
	fn from(result: Result<V, ConditionError>) -> Self {
		Self::Ready(result.map(Into::into))
	}
}

/// A navigation guard.
///
/// Implemented for every `Fn(&NavigationInformations) -> impl Into<ConditionOutput>`.
pub trait RoutePreCondition {
	fn check(&self, info: &NavigationInformations) -> ConditionOutput;
}

impl<F, R> RoutePreCondition for F
where
	F: Fn(&NavigationInformations) -> R,
	R: Into<ConditionOutput>,
{
	fn check(&self, info: &NavigationInformations) -> ConditionOutput {
		self(info).into()
	}
}

/// Ordered list of guards.
#[derive(Clone, Default)]
pub struct Conditions {
	guards: Vec<Rc<dyn RoutePreCondition>>,
}

impl Conditions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a closure guard.
	pub fn with<F, R>(self, guard: F) -> Self
	where
		F: Fn(&NavigationInformations) -> R + 'static,
		R: Into<ConditionOutput>,
	{
		self.with_guard(guard)
	}

	/// Appends any [`RoutePreCondition`] implementor.
	pub fn with_guard<G>(mut self, guard: G) -> Self
	where
		G: RoutePreCondition + 'static,
	{
		self.guards.push(Rc::new(guard));
		self
	}

	pub fn len(&self) -> usize {
		self.guards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.guards.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn RoutePreCondition>> {
		self.guards.iter()
	}
}

impl fmt::Debug for Conditions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Conditions")
			.field("len", &self.guards.len())
			.finish()
	}
}

/// Evaluates `conditions` in order against one navigation.
///
/// Returns the first non-pass verdict, or [`Verdict::Pass`] when every guard
/// passes (or there are none). A guard error stops evaluation.
pub async fn check_conditions(
	conditions: &Conditions,
	location: &RouterLocation,
	path_params: &PathParams,
	search_params: &SearchParams,
) -> Result<Verdict, ConditionError> {
	let info = NavigationInformations {
		location: location.clone(),
		path_params: path_params.clone(),
		search_params: search_params.clone(),
	};

	for (index, guard) in conditions.iter().enumerate() {
		let verdict = guard.check(&info).resolve().await?;
		if !verdict.is_pass() {
			tracing::debug!(
				index,
				path = location.path(),
				verdict = ?verdict,
				"route condition stopped navigation"
			);
			return Ok(verdict);
		}
	}

	Ok(Verdict::Pass)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::RefCell;

	fn info_location() -> RouterLocation {
		RouterLocation::from_url("/admin?tab=users")
	}

	async fn run(conditions: &Conditions) -> Result<Verdict, ConditionError> {
		check_conditions(
			conditions,
			&info_location(),
			&PathParams::new(),
			&waypoint_urls::parse_search("?tab=users"),
		)
		.await
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_passes() {
		assert_eq!(run(&Conditions::new()).await, Ok(Verdict::Pass));
	}

	#[rstest]
	#[tokio::test]
	async fn test_short_circuit_on_deny() {
		let calls = Rc::new(RefCell::new(Vec::new()));

		let (a, b, c) = (Rc::clone(&calls), Rc::clone(&calls), Rc::clone(&calls));
		let conditions = Conditions::new()
			.with(move |_| {
				a.borrow_mut().push(1);
				true
			})
			.with(move |_| {
				b.borrow_mut().push(2);
				false
			})
			.with(move |_| {
				c.borrow_mut().push(3);
				true
			});

		assert_eq!(run(&conditions).await, Ok(Verdict::Deny));
		assert_eq!(*calls.borrow(), vec![1, 2]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_redirect_verdict() {
		let conditions = Conditions::new().with(|_| NavigationParams::new("/login"));
		assert_eq!(
			run(&conditions).await,
			Ok(Verdict::Redirect(NavigationParams::new("/login")))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_guard_sees_snapshot() {
		let conditions = Conditions::new().with(|info| {
			info.location.path() == "/admin"
				&& info.search_params.get("tab").and_then(|v| v.as_str()) == Some("users")
		});
		assert_eq!(run(&conditions).await, Ok(Verdict::Pass));
	}

	#[rstest]
	#[tokio::test]
	async fn test_deferred_guard() {
		let conditions = Conditions::new()
			.with(|_| ConditionOutput::deferred(async { Ok::<_, ConditionError>(true) }))
			.with(|_| ConditionOutput::deferred(async { Ok::<_, ConditionError>(false) }));
		assert_eq!(run(&conditions).await, Ok(Verdict::Deny));
	}

	#[rstest]
	#[tokio::test]
	async fn test_error_propagates_and_stops() {
		let reached = Rc::new(RefCell::new(false));
		let flag = Rc::clone(&reached);
		let conditions = Conditions::new()
			.with(|_| ConditionOutput::fail("backend down"))
			.with(move |_| {
				*flag.borrow_mut() = true;
				true
			});

		assert_eq!(
			run(&conditions).await,
			Err(ConditionError::new("backend down"))
		);
		assert!(!*reached.borrow());
	}

	#[rstest]
	fn test_verdict_conversions() {
		assert_eq!(Verdict::from(true), Verdict::Pass);
		assert_eq!(Verdict::from(false), Verdict::Deny);
		assert!(matches!(
			ConditionOutput::from(Ok::<_, ConditionError>(NavigationParams::new("/x"))),
			ConditionOutput::Ready(Ok(Verdict::Redirect(_)))
		));
	}

	struct RequireParam(&'static str);

	impl RoutePreCondition for RequireParam {
		fn check(&self, info: &NavigationInformations) -> ConditionOutput {
			info.search_params.contains_key(self.0).into()
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_trait_guard() {
		assert_eq!(
			run(&Conditions::new().with_guard(RequireParam("tab"))).await,
			Ok(Verdict::Pass)
		);
		assert_eq!(
			run(&Conditions::new().with_guard(RequireParam("page"))).await,
			Ok(Verdict::Deny)
		);
	}
}
