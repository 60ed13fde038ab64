//! HTTP-level GraphQL query execution
//!
//! [`run_http_query`] is the single entry point the web layer calls once it has
//! resolved [`ServerOptions`] for a request: it validates the transport-level
//! shape of the request, runs the operation and serializes the result.

use async_graphql::parser::parse_query;
use async_graphql::parser::types::OperationType;
use async_graphql::{Executor, Variables};
use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::ServerOptions;

/// Query text, variables and operation name of one GraphQL request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
	pub query: Option<String>,
	pub variables: Option<Value>,
	pub operation_name: Option<String>,
}

impl QueryPayload {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: Some(query.into()),
			..Default::default()
		}
	}

	pub fn with_variables(mut self, variables: Value) -> Self {
		self.variables = Some(variables);
		self
	}

	pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
		self.operation_name = Some(operation_name.into());
		self
	}
}

/// Input of [`run_http_query`]
pub struct HttpQueryRequest<E> {
	pub method: Method,
	pub options: ServerOptions<E>,
	pub query: QueryPayload,
	/// Head of the incoming HTTP request
	pub request: http::Request<()>,
}

/// Status and headers the web layer should answer with
#[derive(Debug, Clone)]
pub struct ResponseInit {
	pub status: StatusCode,
	pub headers: HeaderMap,
}

/// Output of [`run_http_query`]
#[derive(Debug, Clone)]
pub struct HttpQueryResponse {
	/// Serialized GraphQL response body
	pub graphql_response: String,
	pub response_init: ResponseInit,
}

/// Transport-level failure, reported before the operation ever runs
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpQueryError {
	pub status: StatusCode,
	pub message: String,
	pub headers: HeaderMap,
}

impl HttpQueryError {
	pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			status,
			message: message.into(),
			headers: HeaderMap::new(),
		}
	}

	fn with_header(mut self, name: http::header::HeaderName, value: &'static str) -> Self {
		self.headers.insert(name, HeaderValue::from_static(value));
		self
	}
}

fn is_mutation(query: &str, operation_name: Option<&str>) -> bool {
	let Ok(document) = parse_query(query) else {
		// Syntax errors are reported by the executor as GraphQL errors.
		return false;
	};

	document.operations.iter().any(|(name, operation)| {
		operation.node.ty == OperationType::Mutation
			&& operation_name.is_none_or(|wanted| name.map(|n| n.as_str()) == Some(wanted))
	})
}

fn parse_variables(variables: Option<Value>) -> Result<Option<Variables>, HttpQueryError> {
	match variables {
		None | Some(Value::Null) => Ok(None),
		// GET requests carry variables as a JSON-encoded query parameter
		Some(Value::String(encoded)) => serde_json::from_str::<Value>(&encoded)
			.map(|value| Some(Variables::from_json(value)))
			.map_err(|_| HttpQueryError::new(StatusCode::BAD_REQUEST, "Variables are invalid JSON.")),
		Some(value) => Ok(Some(Variables::from_json(value))),
	}
}

/// Execute one GraphQL operation described by an HTTP request
///
/// Transport-level problems are returned as [`HttpQueryError`]:
///
/// - methods other than GET and POST (405, with an `Allow` header)
/// - a missing or blank query (400)
/// - a query over `max_query_size` (413)
/// - a mutation sent over GET (405)
/// - variables that are not valid JSON (400)
///
/// A response with errors and no data (syntax, validation or root resolver
/// failures) is returned as a 400 [`HttpQueryError`] whose message is the
/// serialized GraphQL response body. Anything else is a 200.
pub async fn run_http_query<E: Executor>(
	request: HttpQueryRequest<E>,
) -> Result<HttpQueryResponse, HttpQueryError> {
	let HttpQueryRequest {
		method,
		mut options,
		query: payload,
		request,
	} = request;

	if method != Method::GET && method != Method::POST {
		return Err(HttpQueryError::new(
			StatusCode::METHOD_NOT_ALLOWED,
			"GraphQL only supports GET and POST requests.",
		)
		.with_header(ALLOW, "GET, POST"));
	}

	let query = payload
		.query
		.filter(|query| !query.trim().is_empty())
		.ok_or_else(|| HttpQueryError::new(StatusCode::BAD_REQUEST, "Must provide query string."))?;

	if let Some(limit) = options.max_query_size.filter(|limit| query.len() > *limit) {
		return Err(HttpQueryError::new(
			StatusCode::PAYLOAD_TOO_LARGE,
			format!(
				"Query size {} bytes exceeds maximum of {} bytes",
				query.len(),
				limit
			),
		));
	}

	if method == Method::GET && is_mutation(&query, payload.operation_name.as_deref()) {
		return Err(HttpQueryError::new(
			StatusCode::METHOD_NOT_ALLOWED,
			"Can only perform a mutation operation from a POST request.",
		)
		.with_header(ALLOW, "POST"));
	}

	let variables = parse_variables(payload.variables)?;

	tracing::debug!(
		method = %method,
		uri = %request.uri(),
		operation_name = ?payload.operation_name,
		"executing GraphQL request"
	);

	let mut graphql_request = async_graphql::Request::new(query);
	if let Some(variables) = variables {
		graphql_request = graphql_request.variables(variables);
	}
	if let Some(operation_name) = payload.operation_name {
		graphql_request = graphql_request.operation_name(operation_name);
	}
	let (parts, ()) = request.into_parts();
	graphql_request.data = std::mem::take(&mut options.data);
	graphql_request = graphql_request.data(parts.headers);
	if !options.introspection {
		graphql_request = graphql_request.disable_introspection();
	}

	let mut response = options.schema.execute(graphql_request).await;
	let errors = std::mem::take(&mut response.errors);
	response.errors = options.format_errors(errors);

	let failed = response.data == async_graphql::Value::Null && !response.errors.is_empty();
	let status = if failed {
		StatusCode::BAD_REQUEST
	} else {
		StatusCode::OK
	};

	let mut headers = response.http_headers.clone();
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	let graphql_response = serde_json::to_string(&response)
		.map_err(|e| HttpQueryError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

	tracing::debug!(
		status = %status,
		errors = response.errors.len(),
		"GraphQL request completed"
	);

	if failed {
		return Err(HttpQueryError {
			status,
			message: graphql_response,
			headers,
		});
	}

	Ok(HttpQueryResponse {
		graphql_response,
		response_init: ResponseInit { status, headers },
	})
}
