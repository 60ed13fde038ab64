//! # GraphQL Harness HTTP
//!
//! Framework-level HTTP types and a mock-object factory used to drive a
//! GraphQL server's request pipeline without a network socket.
//!
//! ## Overview
//!
//! - [`Request`] / [`Response`]: the request/response pair a server's context
//!   factory receives.
//! - [`MockRequestOptions`] / [`MockResponseOptions`]: key-value option sets the
//!   mock factory turns into transport objects.
//! - [`create_request`], [`create_response`], [`create_mocks`]: the factory.
//!
//! ## Example
//!
//! ```
//! use graphql_harness_http::{MockRequestOptions, MockResponseOptions, create_mocks};
//! use http::{Method, StatusCode};
//!
//! let request_options = MockRequestOptions::new()
//!     .method("POST")
//!     .url("/graphql")
//!     .header("Authorization", "Bearer token");
//!
//! let (request, response) =
//!     create_mocks(&request_options, &MockResponseOptions::default()).unwrap();
//!
//! assert_eq!(request.method, Method::POST);
//! assert_eq!(request.header("authorization"), Some("Bearer token"));
//! assert_eq!(response.status, StatusCode::OK);
//! ```

pub mod mock;
pub mod request;
pub mod response;

pub use mock::{MockRequestOptions, MockResponseOptions, create_mocks, create_request, create_response};
pub use request::{Request, RequestBuilder};
pub use response::Response;

/// Errors raised while building mock transport objects
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
	#[error("Invalid HTTP method: {0}")]
	InvalidMethod(String),

	#[error("Invalid URI: {0}")]
	InvalidUri(String),

	#[error("Invalid header name: {0}")]
	InvalidHeaderName(String),

	#[error("Invalid header value for {name}: {value}")]
	InvalidHeaderValue { name: String, value: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HttpError>;
