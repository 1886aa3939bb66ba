//! Parameter codec.
//!
//! Path and search parameters share one representation, [`ParamMap`], an
//! insertion-ordered map from name to [`ParamValue`]. Raw values go through
//! the same coercion rule wherever they come from: a value becomes a
//! [`ParamValue::Number`] only when it parses as a finite number whose
//! canonical rendering is the raw text itself, so `"42"` and `"-1.5"` are
//! numbers while `"042"`, `"1e3"` and `"abc"` stay text.
//!
//! # Example
//!
//! ```
//! use waypoint_urls::{ParamValue, parse_search, serialize_search};
//!
//! let params = parse_search("?q=rust%20router&page=3");
//! assert_eq!(params.get("q"), Some(&ParamValue::from("rust router")));
//! assert_eq!(params.get("page"), Some(&ParamValue::Number(3.0)));
//!
//! assert_eq!(serialize_search(&params), "?q=rust%20router&page=3");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::PathError;
use crate::pattern::PathMatcher;

/// A single path or search parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	/// A value that parsed losslessly as a number.
	Number(f64),
	/// Any other value.
	Text(String),
	/// A missing optional path segment, or a search key without `=`.
	Null,
}

impl ParamValue {
	/// Applies the numeric coercion rule to a raw (already decoded) value.
	pub fn coerce(raw: &str) -> Self {
		match raw.parse::<f64>() {
			Ok(number) if number.is_finite() && number.to_string() == raw => Self::Number(number),
			_ => Self::Text(raw.to_string()),
		}
	}

	/// Returns the text value, if this is [`ParamValue::Text`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Returns the numeric value, if this is [`ParamValue::Number`].
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(number) => Some(*number),
			_ => None,
		}
	}

	/// Returns the numeric value as an integer when it has no fractional part.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Number(number) if number.fract() == 0.0 => Some(*number as i64),
			_ => None,
		}
	}

	/// Returns whether this is [`ParamValue::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// The raw textual form, `None` for [`ParamValue::Null`].
	pub fn to_raw(&self) -> Option<Cow<'_, str>> {
		match self {
			Self::Number(number) => Some(Cow::Owned(number.to_string())),
			Self::Text(text) => Some(Cow::Borrowed(text)),
			Self::Null => None,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(number) => write!(f, "{}", number),
			Self::Text(text) => f.write_str(text),
			Self::Null => Ok(()),
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

macro_rules! impl_from_integer_for_param_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for ParamValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_integer_for_param_value!(i32, i64, u32, u64, usize);

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Self::Null)
	}
}

/// Insertion-ordered parameter map shared by path and search parameters.
///
/// Equality is superficial: two maps are equal when they hold the same
/// key-value pairs, regardless of order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
	entries: IndexMap<String, ParamValue>,
}

/// Parameters captured from the path by a [`PathMatcher`].
pub type PathParams = ParamMap;

/// Parameters parsed from a query string.
pub type SearchParams = ParamMap;

impl ParamMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Inserts a value, overwriting (in place) any previous value for `name`.
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		value: impl Into<ParamValue>,
	) -> Option<ParamValue> {
		self.entries.insert(name.into(), value.into())
	}

	/// Returns the value for `name`.
	pub fn get(&self, name: &str) -> Option<&ParamValue> {
		self.entries.get(name)
	}

	/// Returns whether `name` is present (possibly as `Null`).
	pub fn contains_key(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Parses the value for `name` into `T`.
	///
	/// # Errors
	///
	/// Returns [`PathError::Missing`] if the parameter is absent or `Null`, and
	/// [`PathError::ParseError`] if its textual form does not parse as `T`.
	pub fn get_as<T>(&self, name: &str) -> Result<T, PathError>
	where
		T: FromStr,
		T::Err: fmt::Display,
	{
		let raw = self
			.get(name)
			.and_then(ParamValue::to_raw)
			.ok_or_else(|| PathError::Missing {
				name: name.to_string(),
			})?;

		raw.parse::<T>().map_err(|e| PathError::ParseError {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.into_owned(),
			reason: format!("{}", e),
		})
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether the map is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates parameters in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Iterates parameter names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
	K: Into<String>,
	V: Into<ParamValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (k, v) in iter {
			map.insert(k, v);
		}
		map
	}
}

impl IntoIterator for ParamMap {
	type Item = (String, ParamValue);
	type IntoIter = indexmap::map::IntoIter<String, ParamValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

/// Shallow key-by-key equality between two flat maps.
pub fn are_superficially_equal(a: &ParamMap, b: &ParamMap) -> bool {
	a.iter().all(|(key, value)| b.get(key) == Some(value))
		&& b.iter().all(|(key, value)| a.get(key) == Some(value))
}

fn decode(raw: &str) -> Cow<'_, str> {
	// Invalid UTF-8 after decoding keeps the raw text.
	urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Parses a query string (with or without the leading `?`).
///
/// Pairs are split on the first `=`; a pair without `=` maps to
/// [`ParamValue::Null`]. When a key repeats, the last occurrence wins.
/// Pairs with an empty key are skipped.
pub fn parse_search(search: &str) -> SearchParams {
	let mut params = ParamMap::new();
	if search.is_empty() {
		return params;
	}

	let query = search.strip_prefix('?').unwrap_or(search);
	for pair in query.split('&').filter(|pair| !pair.is_empty()) {
		let (key, value) = match pair.split_once('=') {
			Some((key, value)) => (decode(key), ParamValue::coerce(&decode(value))),
			None => (decode(pair), ParamValue::Null),
		};
		if !key.is_empty() {
			params.insert(key.into_owned(), value);
		}
	}
	params
}

fn encode_pairs(params: &ParamMap) -> String {
	params
		.iter()
		.filter(|(key, _)| !key.is_empty())
		.map(|(key, value)| match value.to_raw() {
			Some(raw) => format!("{}={}", urlencoding::encode(key), urlencoding::encode(&raw)),
			None => urlencoding::encode(key).into_owned(),
		})
		.collect::<Vec<_>>()
		.join("&")
}

/// Serializes parameters into a `?`-prefixed query string.
///
/// Entries with an empty key are skipped; a map with nothing left to
/// encode serializes to `""`.
pub fn serialize_search(params: &SearchParams) -> String {
	let pairs = encode_pairs(params);
	if pairs.is_empty() {
		return String::new();
	}
	format!("?{}", pairs)
}

/// Appends parameters to an existing query string using `&`.
pub fn append_search(existing: &str, params: &SearchParams) -> String {
	let pairs = encode_pairs(params);
	if pairs.is_empty() {
		return existing.to_string();
	}
	if existing.is_empty() || existing == "?" {
		return format!("?{}", pairs);
	}
	format!("{}&{}", existing, pairs)
}

/// Extracts path parameters from `path` using `matcher`.
///
/// Returns an empty map when `path` does not match; use
/// [`PathMatcher::match_path`] to tell "no match" from "no parameters".
pub fn extract_path_params(path: &str, matcher: &PathMatcher) -> PathParams {
	matcher.match_path(path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("42", ParamValue::Number(42.0))]
	#[case("-1.5", ParamValue::Number(-1.5))]
	#[case("0", ParamValue::Number(0.0))]
	#[case("042", ParamValue::Text("042".to_string()))]
	#[case("1e3", ParamValue::Text("1e3".to_string()))]
	#[case("+5", ParamValue::Text("+5".to_string()))]
	#[case("NaN", ParamValue::Text("NaN".to_string()))]
	#[case("inf", ParamValue::Text("inf".to_string()))]
	#[case("", ParamValue::Text(String::new()))]
	#[case("abc", ParamValue::Text("abc".to_string()))]
	fn test_coerce(#[case] raw: &str, #[case] expected: ParamValue) {
		assert_eq!(ParamValue::coerce(raw), expected);
	}

	#[rstest]
	fn test_parse_search_empty() {
		assert!(parse_search("").is_empty());
		assert!(parse_search("?").is_empty());
	}

	#[rstest]
	fn test_parse_search_basic() {
		let params = parse_search("?name=ada&age=36");
		assert_eq!(params.get("name"), Some(&ParamValue::from("ada")));
		assert_eq!(params.get("age"), Some(&ParamValue::Number(36.0)));
		assert_eq!(params.keys().collect::<Vec<_>>(), vec!["name", "age"]);
	}

	#[rstest]
	fn test_parse_search_without_question_mark() {
		let params = parse_search("a=1");
		assert_eq!(params.get("a"), Some(&ParamValue::Number(1.0)));
	}

	#[rstest]
	fn test_parse_search_duplicate_last_wins() {
		let params = parse_search("?tag=a&other=x&tag=b");
		assert_eq!(params.get("tag"), Some(&ParamValue::from("b")));
		assert_eq!(params.len(), 2);
		// Overwrite keeps the original position.
		assert_eq!(params.keys().next(), Some("tag"));
	}

	#[rstest]
	fn test_parse_search_splits_on_first_equals() {
		let params = parse_search("?expr=a=b");
		assert_eq!(params.get("expr"), Some(&ParamValue::from("a=b")));
	}

	#[rstest]
	fn test_parse_search_bare_key_is_null() {
		let params = parse_search("?debug&x=1");
		assert_eq!(params.get("debug"), Some(&ParamValue::Null));
	}

	#[rstest]
	fn test_parse_search_decodes() {
		let params = parse_search("?q=caf%C3%A9%20au%20lait&k%26=v");
		assert_eq!(params.get("q"), Some(&ParamValue::from("café au lait")));
		assert_eq!(params.get("k&"), Some(&ParamValue::from("v")));
	}

	#[rstest]
	fn test_serialize_search() {
		let params = ParamMap::new().with("q", "a b&c").with("page", 2);
		assert_eq!(serialize_search(&params), "?q=a%20b%26c&page=2");
		assert_eq!(serialize_search(&ParamMap::new()), "");
	}

	#[rstest]
	fn test_serialize_null_as_bare_key() {
		let params = ParamMap::new().with("flag", ParamValue::Null);
		assert_eq!(serialize_search(&params), "?flag");
		assert_eq!(parse_search("?flag"), params);
	}

	#[rstest]
	fn test_empty_keys_are_skipped() {
		let params = ParamMap::new().with("", ParamValue::Null);
		assert_eq!(serialize_search(&params), "");
		assert_eq!(append_search("?x=y", &params), "?x=y");

		let params = ParamMap::new().with("", 5).with("a", 1);
		assert_eq!(serialize_search(&params), "?a=1");
		assert_eq!(parse_search("?=5&a=1&"), ParamMap::new().with("a", 1));
	}

	#[rstest]
	#[case("", "?a=1")]
	#[case("?", "?a=1")]
	#[case("?x=y", "?x=y&a=1")]
	fn test_append_search(#[case] existing: &str, #[case] expected: &str) {
		let params = ParamMap::new().with("a", 1);
		assert_eq!(append_search(existing, &params), expected);
	}

	#[rstest]
	fn test_get_as() {
		let params = ParamMap::new()
			.with("id", 42)
			.with("slug", "hello")
			.with("gone", ParamValue::Null);

		assert_eq!(params.get_as::<u64>("id").unwrap(), 42);
		assert_eq!(params.get_as::<String>("id").unwrap(), "42");
		assert_eq!(params.get_as::<String>("slug").unwrap(), "hello");
		assert!(matches!(
			params.get_as::<u32>("gone"),
			Err(PathError::Missing { .. })
		));
		assert!(matches!(
			params.get_as::<u32>("nope"),
			Err(PathError::Missing { .. })
		));

		match params.get_as::<i32>("slug") {
			Err(PathError::ParseError {
				name, raw_value, ..
			}) => {
				assert_eq!(name, "slug");
				assert_eq!(raw_value, "hello");
			}
			other => panic!("Expected ParseError, got {:?}", other),
		}
	}

	#[rstest]
	fn test_superficial_equality_ignores_order() {
		let a = ParamMap::new().with("x", 1).with("y", "b");
		let b = ParamMap::new().with("y", "b").with("x", 1);
		let c = ParamMap::new().with("x", 1);

		assert!(are_superficially_equal(&a, &b));
		assert!(!are_superficially_equal(&a, &c));
		assert!(!are_superficially_equal(&c, &a));
		assert_eq!(a, b);
	}

	#[rstest]
	fn test_extract_path_params_no_match_is_empty() {
		let matcher = PathMatcher::compile("/users/:id").unwrap();
		assert!(extract_path_params("/posts/1", &matcher).is_empty());

		let params = extract_path_params("/users/7", &matcher);
		assert_eq!(params.get("id"), Some(&ParamValue::Number(7.0)));
	}

	#[rstest]
	fn test_param_value_accessors() {
		assert_eq!(ParamValue::Number(3.0).as_i64(), Some(3));
		assert_eq!(ParamValue::Number(3.5).as_i64(), None);
		assert_eq!(ParamValue::from("x").as_str(), Some("x"));
		assert!(ParamValue::from(None::<i32>).is_null());
		assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
	}
}
