//! Mock request/response factory
//!
//! Turns declarative option sets into [`Request`] / [`Response`] objects.
//! Option sets are plain serde data, so they can be stored, merged and loaded
//! from fixtures.
//!
//! # Example
//!
//! ```
//! use graphql_harness_http::{MockRequestOptions, create_request};
//! use serde_json::json;
//!
//! let defaults = MockRequestOptions::new().method("POST");
//! let overrides = MockRequestOptions::new()
//!     .url("/graphql")
//!     .query("trace", "1")
//!     .body(json!({"hello": "world"}));
//!
//! let request = create_request(&overrides.merged_over(&defaults)).unwrap();
//!
//! assert_eq!(request.method.as_str(), "POST");
//! assert_eq!(request.uri.to_string(), "/graphql?trace=1");
//! assert_eq!(request.header("content-type"), Some("application/json"));
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{HttpError, Request, Response, Result};

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_URL: &str = "/";

/// Options for building a mock [`Request`]
///
/// Every field is optional; unset fields fall back to the factory defaults
/// (`GET /`, no headers, no body).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockRequestOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub headers: BTreeMap<String, String>,
	/// Path parameters
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub params: BTreeMap<String, String>,
	/// Query string entries appended to `url`
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub query: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub cookies: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub body: Option<Value>,
}

impl MockRequestOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn method(mut self, method: impl Into<String>) -> Self {
		self.method = Some(method.into());
		self
	}

	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	/// Add a header; names are stored lower-cased
	pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers
			.insert(name.as_ref().to_ascii_lowercase(), value.into());
		self
	}

	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}

	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(name.into(), value.into());
		self
	}

	pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.insert(name.into(), value.into());
		self
	}

	pub fn body(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}

	/// Merge these options over `base`
	///
	/// Scalar fields set here win over `base`; map fields are unioned with
	/// entries from `self` replacing entries from `base`. Header names compare
	/// case-insensitively.
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_http::MockRequestOptions;
	///
	/// let base = MockRequestOptions::new().method("POST").header("X-A", "1");
	/// let merged = MockRequestOptions::new().header("x-a", "2").merged_over(&base);
	///
	/// assert_eq!(merged.method.as_deref(), Some("POST"));
	/// assert_eq!(merged.headers.get("x-a").map(String::as_str), Some("2"));
	/// assert_eq!(merged.headers.len(), 1);
	/// ```
	pub fn merged_over(&self, base: &Self) -> Self {
		let mut headers: BTreeMap<String, String> = base
			.headers
			.iter()
			.map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
			.collect();
		headers.extend(
			self.headers
				.iter()
				.map(|(k, v)| (k.to_ascii_lowercase(), v.clone())),
		);

		Self {
			method: self.method.clone().or_else(|| base.method.clone()),
			url: self.url.clone().or_else(|| base.url.clone()),
			headers,
			params: merge_maps(&base.params, &self.params),
			query: merge_maps(&base.query, &self.query),
			cookies: merge_maps(&base.cookies, &self.cookies),
			body: self.body.clone().or_else(|| base.body.clone()),
		}
	}
}

/// Options for building a mock [`Response`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockResponseOptions {
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub headers: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Map::is_empty")]
	pub locals: Map<String, Value>,
}

impl MockResponseOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers
			.insert(name.as_ref().to_ascii_lowercase(), value.into());
		self
	}

	pub fn local(mut self, key: impl Into<String>, value: Value) -> Self {
		self.locals.insert(key.into(), value);
		self
	}
}

fn merge_maps(
	base: &BTreeMap<String, String>,
	overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
	let mut merged = base.clone();
	merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
	merged
}

fn append_query(url: &str, query: &BTreeMap<String, String>) -> String {
	if query.is_empty() {
		return url.to_string();
	}

	let encoded = url::form_urlencoded::Serializer::new(String::new())
		.extend_pairs(query.iter())
		.finish();
	let separator = if url.contains('?') { '&' } else { '?' };
	format!("{}{}{}", url, separator, encoded)
}

/// Build a mock [`Request`] from options
///
/// - the method is upper-cased before parsing
/// - `query` entries are appended to the url's query string
/// - a JSON body is serialized and gets `Content-Type: application/json`
///   unless a content type header was given; a string body is used verbatim
pub fn create_request(options: &MockRequestOptions) -> Result<Request> {
	let method_name = options
		.method
		.as_deref()
		.unwrap_or(DEFAULT_METHOD)
		.to_ascii_uppercase();
	let method = Method::from_bytes(method_name.as_bytes())
		.map_err(|_| HttpError::InvalidMethod(method_name.clone()))?;

	let url = append_query(
		options.url.as_deref().unwrap_or(DEFAULT_URL),
		&options.query,
	);

	let mut builder = Request::builder().method(method).uri(url);

	for (name, value) in &options.headers {
		builder = builder.header(name.as_str(), value.as_str());
	}
	for (name, value) in &options.params {
		builder = builder.path_param(name.as_str(), value.as_str());
	}
	for (name, value) in &options.cookies {
		builder = builder.cookie(name.as_str(), value.as_str());
	}

	match &options.body {
		None | Some(Value::Null) => {}
		Some(Value::String(text)) => {
			builder = builder.body(Bytes::from(text.clone()));
		}
		Some(body) => {
			builder = builder.body(Bytes::from(serde_json::to_vec(body)?));
			let has_content_type = options
				.headers
				.keys()
				.any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
			if !has_content_type {
				builder = builder.header(CONTENT_TYPE.as_str(), "application/json");
			}
		}
	}

	builder.build()
}

/// Build a mock [`Response`] from options
///
/// The response starts as `200 OK` with the given headers and locals.
pub fn create_response(options: &MockResponseOptions) -> Result<Response> {
	let mut response = Response::ok();
	for (name, value) in &options.headers {
		response.insert_header(name, value)?;
	}
	response.locals = options.locals.clone();
	Ok(response)
}

/// Build a mock request/response pair
pub fn create_mocks(
	request: &MockRequestOptions,
	response: &MockResponseOptions,
) -> Result<(Request, Response)> {
	Ok((create_request(request)?, create_response(response)?))
}
