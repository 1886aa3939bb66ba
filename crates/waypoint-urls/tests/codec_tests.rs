//! Integration tests for the parameter codec and path matcher
//!
//! These tests verify:
//! 1. `parse_search(serialize_search(p))` is superficially equal to `p`
//! 2. Matcher extraction with numeric coercion
//! 3. Matching and extraction agree with `extract_path_params`

use proptest::prelude::*;
use rstest::rstest;
use waypoint_urls::{
	ParamMap, ParamValue, PathMatcher, are_superficially_equal, extract_path_params, parse_search,
	serialize_search,
};

fn param_value() -> impl Strategy<Value = ParamValue> {
	prop_oneof![
		// Text that never reads back as a number: starts with a letter.
		"[a-zA-Z][a-zA-Z0-9 &=?#%+/._-]{0,12}".prop_map(ParamValue::Text),
		any::<i32>().prop_map(ParamValue::from),
		(-10_000i32..10_000, 1u8..4).prop_map(|(int, frac)| ParamValue::Number(
			f64::from(int) + f64::from(frac) / 4.0
		)),
	]
}

fn search_params() -> impl Strategy<Value = ParamMap> {
	prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_ &=?-]{0,8}", param_value()), 0..8)
		.prop_map(|pairs| pairs.into_iter().collect::<ParamMap>())
}

proptest! {
	#[test]
	fn prop_search_round_trip(params in search_params()) {
		let serialized = serialize_search(&params);
		let parsed = parse_search(&serialized);
		prop_assert!(are_superficially_equal(&parsed, &params), "{:?} -> {} -> {:?}", params, serialized, parsed);
	}

	#[test]
	fn prop_serialized_search_shape(params in search_params()) {
		let serialized = serialize_search(&params);
		if params.is_empty() {
			prop_assert_eq!(serialized, "");
		} else {
			prop_assert!(serialized.starts_with('?'));
			prop_assert!(!serialized.contains('#'));
		}
	}

	#[test]
	fn prop_segment_param_round_trip(value in "[a-zA-Z][a-zA-Z0-9 ._~-]{0,16}") {
		let matcher = PathMatcher::compile("/items/:name").unwrap();
		let path = format!("/items/{}", urlencoding::encode(&value));
		let params = matcher.match_path(&path).unwrap();
		prop_assert_eq!(params.get("name"), Some(&ParamValue::Text(value)));
	}
}

/// Numeric coercion only where lossless
#[rstest]
fn test_users_posts_extraction() {
	let matcher = PathMatcher::compile("/users/:id/posts/:postId").unwrap();
	let params = matcher.match_path("/users/42/posts/abc").unwrap();

	let expected = ParamMap::new().with("id", 42).with("postId", "abc");
	assert!(are_superficially_equal(&params, &expected));
}

#[rstest]
#[case("/users/42/posts/abc", true)]
#[case("/users/42/posts", false)]
#[case("/users/42/posts/abc/extra", false)]
fn test_match_and_extract_agree(#[case] path: &str, #[case] matches: bool) {
	let matcher = PathMatcher::compile("/users/:id/posts/:postId").unwrap();

	assert_eq!(matcher.is_match(path), matches);
	assert_eq!(matcher.match_path(path).is_some(), matches);
	assert_eq!(extract_path_params(path, &matcher).is_empty(), !matches);
}

#[rstest]
fn test_leading_zero_stays_text() {
	let matcher = PathMatcher::compile("/codes/:code").unwrap();
	let params = matcher.match_path("/codes/007").unwrap();
	assert_eq!(params.get("code"), Some(&ParamValue::from("007")));
	assert_eq!(params.get_as::<u32>("code").unwrap(), 7);
}
