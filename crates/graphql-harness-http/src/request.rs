//! Framework request type handed to context factories

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderName};
use http::{HeaderMap, HeaderValue, Method, Uri, Version};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{HttpError, Result};

/// HTTP request representation
///
/// Mirrors what a web framework hands to its middleware: the parsed request
/// line, headers, the raw body and the values routers and parsers extract from
/// them (path params, query params, cookies).
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Path parameters extracted by a router
	pub path_params: BTreeMap<String, String>,
	/// Query parameters parsed from the URI
	pub query_params: BTreeMap<String, String>,
	/// Cookies sent with the request
	pub cookies: BTreeMap<String, String>,
}

impl Request {
	/// Create a request builder
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_http::Request;
	/// use http::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/graphql?debug=1")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/graphql");
	/// assert_eq!(request.query_param("debug"), Some("1"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Get a header value as a string
	///
	/// Returns `None` when the header is missing or is not valid visible ASCII.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Get a cookie value
	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.cookies.get(name).map(String::as_str)
	}

	/// Get a query parameter
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Get a path parameter
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Deserialize the body as JSON
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_http::Request;
	/// use serde_json::Value;
	///
	/// let request = Request::builder()
	///     .body(r#"{"query": "{ ping }"}"#)
	///     .build()
	///     .unwrap();
	///
	/// let body: Value = request.json().unwrap();
	/// assert_eq!(body["query"], "{ ping }");
	/// ```
	pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	/// Replace the body with `body` serialized as JSON
	///
	/// Sets `Content-Type: application/json` unless a content type is already
	/// present.
	pub fn set_json<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<()> {
		self.body = serde_json::to_vec(body)?.into();
		self.headers
			.entry(CONTENT_TYPE)
			.or_insert(HeaderValue::from_static("application/json"));
		Ok(())
	}

	/// Convert into a body-less `http::Request` describing this request
	///
	/// Execution layers that only need the request line and headers receive
	/// this descriptor instead of the framework type.
	pub fn to_http_request(&self) -> http::Request<()> {
		let mut request = http::Request::new(());
		*request.method_mut() = self.method.clone();
		*request.uri_mut() = self.uri.clone();
		*request.version_mut() = self.version;
		*request.headers_mut() = self.headers.clone();
		request
	}
}

impl From<&Request> for http::Request<()> {
	fn from(request: &Request) -> Self {
		request.to_http_request()
	}
}

/// Builder for [`Request`]
///
/// Header names and values are validated when [`RequestBuilder::build`] runs so
/// that invalid input surfaces as an [`HttpError`] rather than being dropped.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: Vec<(String, String)>,
	body: Bytes,
	path_params: BTreeMap<String, String>,
	cookies: BTreeMap<String, String>,
}

impl RequestBuilder {
	pub fn new() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: Vec::new(),
			body: Bytes::new(),
			path_params: BTreeMap::new(),
			cookies: BTreeMap::new(),
		}
	}

	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(name.into(), value.into());
		self
	}

	pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.insert(name.into(), value.into());
		self
	}

	/// Build the request
	///
	/// Parses the URI and extracts query parameters from it. Cookies given
	/// through [`RequestBuilder::cookie`] are merged with any explicit `Cookie`
	/// header into a single header; on a name clash the builder cookie wins.
	pub fn build(mut self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|_| HttpError::InvalidUri(self.uri.clone()))?;

		let query_params = uri
			.query()
			.map(|query| {
				url::form_urlencoded::parse(query.as_bytes())
					.map(|(k, v)| (k.into_owned(), v.into_owned()))
					.collect()
			})
			.unwrap_or_default();

		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let header_name = HeaderName::from_bytes(name.as_bytes())
				.map_err(|_| HttpError::InvalidHeaderName(name.clone()))?;
			let header_value = HeaderValue::from_str(&value)
				.map_err(|_| HttpError::InvalidHeaderValue { name, value })?;
			headers.append(header_name, header_value);
		}

		let mut cookies = parse_cookie_header(&headers);
		cookies.append(&mut self.cookies);

		if !cookies.is_empty() {
			let cookie_header = cookies
				.iter()
				.map(|(name, value)| format!("{}={}", name, value))
				.collect::<Vec<_>>()
				.join("; ");
			let value = HeaderValue::from_str(&cookie_header).map_err(|_| {
				HttpError::InvalidHeaderValue {
					name: COOKIE.to_string(),
					value: cookie_header.clone(),
				}
			})?;
			headers.insert(COOKIE, value);
		}

		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers,
			body: self.body,
			path_params: self.path_params,
			query_params,
			cookies,
		})
	}
}

/// Name/value pairs of every `Cookie` header in `headers`
///
/// Entries without a `=` are dropped.
fn parse_cookie_header(headers: &HeaderMap) -> BTreeMap<String, String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
		.collect()
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self::new()
	}
}
