//! # GraphQL Harness Test
//!
//! An in-process GraphQL test client. [`TestClient`] drives a
//! [`GraphQLServer`](graphql_harness_server::GraphQLServer) through mock
//! request/response objects, so resolvers, context factories and error
//! formatting run exactly as they would behind a real HTTP endpoint.
//!
//! ## Example
//!
//! ```
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, SimpleObject, Schema};
//! use graphql_harness_server::GraphQLServer;
//! use graphql_harness_test::{GraphQLResponse, TestClient, gql};
//! use serde_json::json;
//!
//! #[derive(SimpleObject)]
//! struct User {
//!     id: String,
//! }
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn current_user(&self) -> User {
//!         User { id: "1".to_string() }
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let client = TestClient::new(GraphQLServer::new(Schema::new(
//!     Query,
//!     EmptyMutation,
//!     EmptySubscription,
//! )));
//!
//! let response: GraphQLResponse = client
//!     .query(gql("{ currentUser { id } }").unwrap())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(response.data, Some(json!({"currentUser": {"id": "1"}})));
//! # });
//! ```

pub mod assertions;
pub mod client;
pub mod logging;
pub mod operation;
pub mod response;

pub use client::{SetOptions, TestClient, TestClientConfig, create_test_client};
pub use operation::{
	DocumentError, GraphQLDocument, GraphQLOperation, Operation, OperationBody,
	OperationDescriptor, gql,
};
pub use response::{ErrorLocation, GraphQLResponse, ResponseError};

use graphql_harness_http::HttpError;
use graphql_harness_server::ExecutionError;

/// Errors returned by [`TestClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	/// The operation had both a query and a mutation, or neither
	#[error("Either `query` or `mutation` must be passed, but not both")]
	AmbiguousOperation,

	#[error("Failed to build mock transport: {0}")]
	Http(#[from] HttpError),

	#[error(transparent)]
	Execution(#[from] ExecutionError),

	#[error(transparent)]
	Decode(#[from] serde_json::Error),
}
