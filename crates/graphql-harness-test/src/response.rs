//! Decoded GraphQL response bodies

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a GraphQL response, decoded from JSON
///
/// `T` is the shape of `data`; it defaults to an untyped [`Value`]. Top-level
/// keys other than `data`, `errors` and `extensions` are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct GraphQLResponse<T = Value> {
	#[serde(default)]
	pub data: Option<T>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<ResponseError>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub extensions: Map<String, Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl<T> GraphQLResponse<T> {
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}

	/// The `data` member, or the errors if execution failed
	pub fn into_result(self) -> Result<T, Vec<ResponseError>> {
		match (self.data, self.errors.is_empty()) {
			(Some(data), true) => Ok(data),
			_ => Err(self.errors),
		}
	}
}

/// One entry of the `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
	pub message: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub locations: Vec<ErrorLocation>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub path: Vec<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extensions: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
	pub line: usize,
	pub column: usize,
}
