//! # GraphQL Harness
//!
//! Drive a GraphQL server's request pipeline from tests without opening a
//! socket.
//!
//! A [`TestClient`] builds a mock request/response pair for every call, lets
//! the server's context factory see them as it would a real HTTP exchange, and
//! executes the operation through the same `run_http_query` entry point a web
//! integration would use. The decoded JSON body comes back to the test.
//!
//! ## Feature Flags
//!
//! - `http` - mock transport objects ([`http`])
//! - `server` - server adapter over `async-graphql` ([`server`])
//! - `test` (default) - the test client
//!
//! ## Example
//!
//! ```
//! use graphql_harness::prelude::*;
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use serde_json::json;
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
//! let client = TestClient::new(server);
//!
//! let response: GraphQLResponse = client.query("{ ping }").await.unwrap();
//! assert_eq!(response.data, Some(json!({"ping": "pong"})));
//! # });
//! ```

#[cfg(feature = "http")]
pub mod http {
	pub use graphql_harness_http::*;
}

#[cfg(feature = "server")]
pub mod server {
	pub use graphql_harness_server::*;
}

#[cfg(feature = "test")]
pub mod test {
	pub use graphql_harness_test::*;
}

#[cfg(feature = "test")]
pub use graphql_harness_test::{
	ClientError, GraphQLOperation, GraphQLResponse, OperationDescriptor, SetOptions, TestClient,
	TestClientConfig, create_test_client, gql,
};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "http")]
	pub use graphql_harness_http::{MockRequestOptions, MockResponseOptions, Request, Response};

	#[cfg(feature = "server")]
	pub use graphql_harness_server::{
		ContextError, ContextFactory, ExecutionError, GraphQLServer, HttpQueryError, ServerConfig,
		run_http_query,
	};

	#[cfg(feature = "test")]
	pub use graphql_harness_test::assertions::{
		assert_graphql_errors, assert_graphql_success, extract_field,
	};
	#[cfg(feature = "test")]
	pub use graphql_harness_test::{
		ClientError, GraphQLOperation, GraphQLResponse, OperationDescriptor, SetOptions,
		TestClient, TestClientConfig, create_test_client, gql,
	};
}
