//! Assertion helpers for decoded GraphQL responses

use serde_json::Value;

use crate::response::GraphQLResponse;

/// Assert that a response has data and no errors
///
/// # Examples
///
/// ```
/// use graphql_harness_test::GraphQLResponse;
/// use graphql_harness_test::assertions::assert_graphql_success;
/// use serde_json::json;
///
/// let response: GraphQLResponse = serde_json::from_value(json!({"data": {"ping": "pong"}})).unwrap();
/// assert_graphql_success(&response);
/// ```
pub fn assert_graphql_success<T: std::fmt::Debug>(response: &GraphQLResponse<T>) {
	assert!(
		response.errors.is_empty(),
		"GraphQL response should be successful: {:?}",
		response.errors
	);
	assert!(
		response.data.is_some(),
		"GraphQL response should carry data: {:?}",
		response
	);
}

/// Assert that a response failed with an error containing `expected_message`
///
/// # Examples
///
/// ```
/// use graphql_harness_test::GraphQLResponse;
/// use graphql_harness_test::assertions::assert_graphql_errors;
/// use serde_json::json;
///
/// let response: GraphQLResponse = serde_json::from_value(json!({
///     "data": null,
///     "errors": [{"message": "Unknown field \"nope\" on type \"Query\"."}]
/// }))
/// .unwrap();
/// assert_graphql_errors(&response, "Unknown field");
/// ```
pub fn assert_graphql_errors<T>(response: &GraphQLResponse<T>, expected_message: &str) {
	let messages: Vec<&str> = response
		.errors
		.iter()
		.map(|error| error.message.as_str())
		.collect();
	assert!(
		messages
			.iter()
			.any(|message| message.contains(expected_message)),
		"Expected a GraphQL error containing '{}', got {:?}",
		expected_message,
		messages
	);
}

/// Look up a value in `data` by JSON pointer
///
/// # Examples
///
/// ```
/// use graphql_harness_test::GraphQLResponse;
/// use graphql_harness_test::assertions::extract_field;
/// use serde_json::json;
///
/// let response: GraphQLResponse =
///     serde_json::from_value(json!({"data": {"currentUser": {"id": "1"}}})).unwrap();
/// assert_eq!(extract_field(&response, "/currentUser/id"), Some(&json!("1")));
/// assert_eq!(extract_field(&response, "/currentUser/name"), None);
/// ```
pub fn extract_field<'a>(response: &'a GraphQLResponse<Value>, pointer: &str) -> Option<&'a Value> {
	response.data.as_ref()?.pointer(pointer)
}

/// Assert that the value at `pointer` in `data` equals `expected`
pub fn assert_graphql_field_eq(response: &GraphQLResponse<Value>, pointer: &str, expected: &Value) {
	let actual = extract_field(response, pointer);
	assert_eq!(
		actual,
		Some(expected),
		"GraphQL data at path '{}' mismatch",
		pointer
	);
}
