use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{HttpError, Result};

/// HTTP Response representation
///
/// `locals` holds per-request values that middleware running before the
/// GraphQL layer stashed on the response.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub locals: Map<String, Value>,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			locals: Map::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	/// Set a header, returning an error when the name or value is invalid
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_http::Response;
	///
	/// let response = Response::ok()
	///     .with_header("Content-Type", "application/json")
	///     .unwrap();
	/// assert_eq!(response.header("content-type"), Some("application/json"));
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
		self.insert_header(name, value)?;
		Ok(self)
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn with_local(mut self, key: impl Into<String>, value: Value) -> Self {
		self.locals.insert(key.into(), value);
		self
	}

	pub fn set_status(&mut self, status: StatusCode) {
		self.status = status;
	}

	pub fn insert_header(&mut self, name: &str, value: &str) -> Result<()> {
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|_| HttpError::InvalidHeaderName(name.to_string()))?;
		let header_value =
			HeaderValue::from_str(value).map_err(|_| HttpError::InvalidHeaderValue {
				name: name.to_string(),
				value: value.to_string(),
			})?;
		self.headers.insert(header_name, header_value);
		Ok(())
	}

	/// Get a header value as a string
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Get a value stored in `locals`
	pub fn local(&self, key: &str) -> Option<&Value> {
		self.locals.get(key)
	}

	/// Deserialize the body as JSON
	pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_default_is_ok() {
		let response = Response::default();

		assert_eq!(response.status, StatusCode::OK);
		assert!(response.headers.is_empty());
		assert!(response.locals.is_empty());
	}

	#[rstest]
	fn test_set_status_overwrites() {
		let mut response = Response::not_found();
		assert_eq!(response.status, StatusCode::NOT_FOUND);

		response.set_status(StatusCode::OK);
		assert_eq!(response.status, StatusCode::OK);
	}

	#[rstest]
	fn test_insert_header_rejects_invalid_name() {
		let mut response = Response::ok();

		let result = response.insert_header("bad name", "x");

		assert!(matches!(result, Err(HttpError::InvalidHeaderName(_))));
	}

	#[rstest]
	fn test_json_body() {
		let response = Response::ok().with_body(r#"{"data":{"ping":"pong"}}"#);

		let body: Value = response.json().unwrap();

		assert_eq!(body, json!({"data": {"ping": "pong"}}));
	}

	#[rstest]
	fn test_locals() {
		let response = Response::ok().with_local("tenant", json!("acme"));

		assert_eq!(response.local("tenant"), Some(&json!("acme")));
		assert_eq!(response.local("missing"), None);
	}
}
