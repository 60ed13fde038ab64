//! # GraphQL Harness Server
//!
//! A thin server layer over any [`async_graphql::Executor`] that exposes the
//! request pipeline in discrete steps, so it can be driven from tests with mock
//! transport objects instead of a listening socket:
//!
//! 1. [`GraphQLServer::create_context`] runs the configured [`ContextFactory`]
//!    and bundles the request/response pair with its data into an
//!    [`ExecutionContext`].
//! 2. [`GraphQLServer::create_graphql_server_options`] resolves the
//!    per-request [`ServerOptions`], taking the data out of the context.
//! 3. [`run_http_query`] executes one GraphQL operation and returns the
//!    serialized response body with its status and headers. A response with
//!    errors and no data comes back as a 400 [`HttpQueryError`].
//!
//! ## Example
//!
//! ```
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use graphql_harness_http::{Request, Response};
//! use graphql_harness_server::{GraphQLServer, HttpQueryRequest, QueryPayload, run_http_query};
//! use http::Method;
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn ping(&self) -> &str {
//!         "pong"
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let server = GraphQLServer::new(Schema::new(Query, EmptyMutation, EmptySubscription));
//!
//! let request = Request::builder().method(Method::POST).build().unwrap();
//! let mut context = server.create_context(request, Response::ok()).await.unwrap();
//! let options = server.create_graphql_server_options(&mut context).await.unwrap();
//!
//! let result = run_http_query(HttpQueryRequest {
//!     method: Method::POST,
//!     options,
//!     query: QueryPayload::new("{ ping }"),
//!     request: context.request.to_http_request(),
//! })
//! .await
//! .unwrap();
//!
//! assert_eq!(result.graphql_response, r#"{"data":{"ping":"pong"}}"#);
//! # });
//! ```

pub mod config;
pub mod context;
pub mod options;
pub mod query;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use context::{ContextError, ContextFactory, ExecutionContext};
pub use options::{ErrorFormatter, ServerOptions};
pub use query::{
	HttpQueryError, HttpQueryRequest, HttpQueryResponse, QueryPayload, ResponseInit,
	run_http_query,
};
pub use server::{GraphQLServer, GraphQLServerBuilder};

/// Errors raised while resolving options for, or executing, one request
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
	#[error(transparent)]
	Context(#[from] ContextError),

	#[error(transparent)]
	HttpQuery(#[from] HttpQueryError),
}
