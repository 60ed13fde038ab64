//! In-process GraphQL test client
//!
//! Every call builds a fresh mock request/response pair, runs the server's
//! context factory on it while building the context, resolves options and
//! executes the operation through [`run_http_query`] with method POST. No
//! socket is opened.

use std::sync::Arc;

use async_graphql::Executor;
use graphql_harness_http::{MockRequestOptions, MockResponseOptions, Response, create_mocks};
use graphql_harness_server::{
	ExecutionContext, ExecutionError, GraphQLServer, HttpQueryRequest, QueryPayload,
	run_http_query,
};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::ClientError;
use crate::operation::{GraphQLOperation, OperationDescriptor};
use crate::response::GraphQLResponse;

/// Configuration for [`create_test_client`]
pub struct TestClientConfig<E> {
	pub server: GraphQLServer<E>,
	/// Overrides merged over the default mock request (`POST` to the server path)
	pub extend_mock_request: MockRequestOptions,
	/// Overrides applied to every mock response
	pub extend_mock_response: MockResponseOptions,
}

impl<E> TestClientConfig<E> {
	pub fn new(server: GraphQLServer<E>) -> Self {
		Self {
			server,
			extend_mock_request: MockRequestOptions::default(),
			extend_mock_response: MockResponseOptions::default(),
		}
	}

	pub fn extend_mock_request(mut self, options: MockRequestOptions) -> Self {
		self.extend_mock_request = options;
		self
	}

	pub fn extend_mock_response(mut self, options: MockResponseOptions) -> Self {
		self.extend_mock_response = options;
		self
	}
}

/// Replacement override sets for [`TestClient::set_options`]
///
/// A `None` field leaves the corresponding override set untouched.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
	pub request: Option<MockRequestOptions>,
	pub response: Option<MockResponseOptions>,
}

impl SetOptions {
	pub fn request(mut self, options: MockRequestOptions) -> Self {
		self.request = Some(options);
		self
	}

	pub fn response(mut self, options: MockResponseOptions) -> Self {
		self.response = Some(options);
		self
	}
}

/// Build a [`TestClient`] from a configuration bundle
///
/// # Examples
///
/// ```
/// use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
/// use graphql_harness_http::MockRequestOptions;
/// use graphql_harness_server::GraphQLServer;
/// use graphql_harness_test::{GraphQLResponse, TestClientConfig, create_test_client};
/// use serde_json::json;
///
/// struct Query;
///
/// #[Object]
/// impl Query {
///     async fn ping(&self) -> &str {
///         "pong"
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let server = GraphQLServer::new(Schema::new(Query, EmptyMutation, EmptySubscription));
/// let client = create_test_client(
///     TestClientConfig::new(server)
///         .extend_mock_request(MockRequestOptions::new().header("x-request-id", "42")),
/// );
///
/// let response: GraphQLResponse = client.query("{ ping }").await.unwrap();
/// assert_eq!(response.data, Some(json!({"ping": "pong"})));
/// # });
/// ```
pub fn create_test_client<E>(config: TestClientConfig<E>) -> TestClient<E> {
	TestClient {
		server: Arc::new(config.server),
		mock_request: Arc::new(RwLock::new(config.extend_mock_request)),
		mock_response: Arc::new(RwLock::new(config.extend_mock_response)),
	}
}

/// GraphQL client driving a [`GraphQLServer`] in-process
///
/// Clones share the server and the override sets.
pub struct TestClient<E> {
	server: Arc<GraphQLServer<E>>,
	mock_request: Arc<RwLock<MockRequestOptions>>,
	mock_response: Arc<RwLock<MockResponseOptions>>,
}

impl<E> Clone for TestClient<E> {
	fn clone(&self) -> Self {
		Self {
			server: Arc::clone(&self.server),
			mock_request: Arc::clone(&self.mock_request),
			mock_response: Arc::clone(&self.mock_response),
		}
	}
}

impl<E> TestClient<E> {
	/// Client with no overrides
	pub fn new(server: GraphQLServer<E>) -> Self {
		create_test_client(TestClientConfig::new(server))
	}

	pub fn server(&self) -> &GraphQLServer<E> {
		&self.server
	}

	/// Replace the override sets present in `options`
	///
	/// The new overrides apply to every later call until replaced again.
	pub async fn set_options(&self, options: SetOptions) {
		if let Some(request) = options.request {
			*self.mock_request.write().await = request;
		}
		if let Some(response) = options.response {
			*self.mock_response.write().await = response;
		}
	}

	/// Current mock request overrides
	pub async fn mock_request_options(&self) -> MockRequestOptions {
		self.mock_request.read().await.clone()
	}

	/// Current mock response overrides
	pub async fn mock_response_options(&self) -> MockResponseOptions {
		self.mock_response.read().await.clone()
	}

	/// Build the execution context for one call
	///
	/// The mock request defaults to `POST` on the server's configured path with
	/// the current request overrides merged over it. The server's context
	/// factory runs on the pair, and a factory error fails the call. The mock
	/// response status is then set to 404 so a response that was never written
	/// by the server is easy to spot. A `body`, if given, is attached to the
	/// request as JSON.
	pub async fn create_mock_context(
		&self,
		body: Option<Value>,
	) -> Result<ExecutionContext, ClientError> {
		let defaults = MockRequestOptions::new()
			.method(Method::POST.as_str())
			.url(self.server.config().path.as_str());
		let request_options = self.mock_request.read().await.merged_over(&defaults);
		let response_options = self.mock_response.read().await.clone();

		let (request, response) = create_mocks(&request_options, &response_options)?;
		let mut context = self
			.server
			.create_context(request, response)
			.await
			.map_err(ExecutionError::from)?;
		context.response.set_status(StatusCode::NOT_FOUND);

		if let Some(body) = body {
			context.request.set_json(&body)?;
		}

		tracing::debug!(
			method = %context.request.method,
			uri = %context.request.uri,
			"created mock GraphQL context"
		);

		Ok(context)
	}
}

impl<E: Executor> TestClient<E> {
	/// Run a query
	///
	/// Same as [`TestClient::execute`]; the name only documents intent.
	pub async fn query<T: DeserializeOwned>(
		&self,
		operation: impl Into<OperationDescriptor>,
	) -> Result<GraphQLResponse<T>, ClientError> {
		self.execute(operation).await
	}

	/// Run a mutation
	///
	/// Same as [`TestClient::execute`]; the name only documents intent.
	pub async fn mutate<T: DeserializeOwned>(
		&self,
		operation: impl Into<OperationDescriptor>,
	) -> Result<GraphQLResponse<T>, ClientError> {
		self.execute(operation).await
	}

	/// Run one operation and decode the response body
	///
	/// Fails with [`ClientError::AmbiguousOperation`] when the descriptor has
	/// both a query and a mutation, or neither.
	pub async fn execute<T: DeserializeOwned>(
		&self,
		operation: impl Into<OperationDescriptor>,
	) -> Result<GraphQLResponse<T>, ClientError> {
		let (response, _) = self.execute_with_response(operation).await?;
		Ok(response)
	}

	/// Like [`TestClient::execute`], also returning the mock response as the
	/// server left it
	pub async fn execute_with_response<T: DeserializeOwned>(
		&self,
		operation: impl Into<OperationDescriptor>,
	) -> Result<(GraphQLResponse<T>, Response), ClientError> {
		let mut context = self.create_mock_context(None).await?;
		let options = self
			.server
			.create_graphql_server_options(&mut context)
			.await?;

		let operation = GraphQLOperation::try_from(operation.into())?;
		let payload = QueryPayload {
			query: Some(operation.operation.body().to_query_text()),
			variables: operation.variables,
			operation_name: operation.operation_name,
		};

		let ExecutionContext {
			request,
			mut response,
			..
		} = context;
		let result = run_http_query(HttpQueryRequest {
			method: Method::POST,
			options,
			query: payload,
			request: request.to_http_request(),
		})
		.await
		.map_err(ExecutionError::from)?;

		response.set_status(result.response_init.status);
		for (name, value) in &result.response_init.headers {
			response.headers.insert(name.clone(), value.clone());
		}
		response.body = result.graphql_response.into();

		let decoded = serde_json::from_slice(&response.body)?;
		Ok((decoded, response))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_graphql::{Context, Data, EmptySubscription, Object, Schema};
	use graphql_harness_http::Request;
	use graphql_harness_server::{ContextError, ServerConfig};
	use rstest::{fixture, rstest};
	use serde_json::json;

	struct Token(String);

	struct Query;

	#[Object]
	impl Query {
		async fn token(&self, ctx: &Context<'_>) -> Option<String> {
			ctx.data_opt::<Token>().map(|token| token.0.clone())
		}
	}

	struct Mutation;

	#[Object]
	impl Mutation {
		async fn echo(&self, value: i32) -> i32 {
			value
		}
	}

	type TestSchema = Schema<Query, Mutation, EmptySubscription>;

	fn token_context(request: &Request, _response: &mut Response) -> Result<Data, ContextError> {
		let mut data = Data::default();
		if let Some(token) = request.header("authorization") {
			data.insert(Token(token.to_string()));
		}
		Ok(data)
	}

	#[fixture]
	fn client() -> TestClient<TestSchema> {
		let schema = Schema::new(Query, Mutation, EmptySubscription);
		TestClient::new(GraphQLServer::builder(schema).context_fn(token_context).build())
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_context_defaults(client: TestClient<TestSchema>) {
		let context = client.create_mock_context(None).await.unwrap();

		assert_eq!(context.request.method, Method::POST);
		assert_eq!(context.request.path(), "/graphql");
		assert!(context.request.body.is_empty());
		assert_eq!(context.response.status, StatusCode::NOT_FOUND);
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_context_attaches_body(client: TestClient<TestSchema>) {
		let context = client
			.create_mock_context(Some(json!({"query": "{ token }"})))
			.await
			.unwrap();

		assert_eq!(
			context.request.json::<Value>().unwrap(),
			json!({"query": "{ token }"})
		);
		assert_eq!(context.request.header("content-type"), Some("application/json"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_query_and_mutate_share_executor(client: TestClient<TestSchema>) {
		let query: GraphQLResponse = client.query("{ token }").await.unwrap();
		let mutation: GraphQLResponse = client
			.mutate(OperationDescriptor::mutation("mutation { echo(value: 7) }"))
			.await
			.unwrap();

		assert_eq!(query.data, Some(json!({"token": null})));
		assert_eq!(mutation.data, Some(json!({"echo": 7})));
	}

	#[rstest]
	#[case(OperationDescriptor::default())]
	#[case(OperationDescriptor {
		query: Some("{ token }".into()),
		mutation: Some("mutation { echo(value: 1) }".into()),
		..Default::default()
	})]
	#[tokio::test]
	async fn test_ambiguous_operation(
		client: TestClient<TestSchema>,
		#[case] descriptor: OperationDescriptor,
	) {
		let error = client.query::<Value>(descriptor).await.unwrap_err();

		assert!(matches!(error, ClientError::AmbiguousOperation));
		assert_eq!(
			error.to_string(),
			"Either `query` or `mutation` must be passed, but not both"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_set_options_persists(client: TestClient<TestSchema>) {
		client
			.set_options(
				SetOptions::default()
					.request(MockRequestOptions::new().header("Authorization", "Bearer abc")),
			)
			.await;

		let first: GraphQLResponse = client.query("{ token }").await.unwrap();
		let second: GraphQLResponse = client.query("{ token }").await.unwrap();

		assert_eq!(first.data, Some(json!({"token": "Bearer abc"})));
		assert_eq!(second, first);
	}

	#[rstest]
	#[tokio::test]
	async fn test_set_options_leaves_absent_keys(client: TestClient<TestSchema>) {
		let response_overrides = MockResponseOptions::new().local("user", json!("ada"));
		client
			.set_options(SetOptions::default().response(response_overrides.clone()))
			.await;
		client
			.set_options(SetOptions::default().request(MockRequestOptions::new().url("/other")))
			.await;

		assert_eq!(client.mock_response_options().await, response_overrides);
		assert_eq!(
			client.mock_request_options().await.url.as_deref(),
			Some("/other")
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_clones_share_overrides(client: TestClient<TestSchema>) {
		let clone = client.clone();

		clone
			.set_options(
				SetOptions::default().request(MockRequestOptions::new().header("authorization", "t")),
			)
			.await;

		let response: GraphQLResponse = client.query("{ token }").await.unwrap();
		assert_eq!(response.data, Some(json!({"token": "t"})));
	}

	#[rstest]
	#[tokio::test]
	async fn test_response_status_replaces_sentinel(client: TestClient<TestSchema>) {
		let (_, response) = client
			.execute_with_response::<Value>("{ token }")
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.header("content-type"), Some("application/json"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_context_runs_context_factory() {
		let schema = Schema::new(Query, Mutation, EmptySubscription);
		let server = GraphQLServer::builder(schema)
			.context_fn(|request: &Request, response: &mut Response| {
				response
					.insert_header("x-context", "built")
					.map_err(|e| ContextError::new(e.to_string()))?;
				token_context(request, response)
			})
			.build();
		let client = TestClient::new(server);
		client
			.set_options(
				SetOptions::default().request(MockRequestOptions::new().header("authorization", "t")),
			)
			.await;

		let context = client.create_mock_context(None).await.unwrap();

		assert_eq!(context.response.header("x-context"), Some("built"));
		assert_eq!(context.response.status, StatusCode::NOT_FOUND);
		assert!(context.data.get(&std::any::TypeId::of::<Token>()).is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_context_fails_with_context_factory() {
		let schema = Schema::new(Query, Mutation, EmptySubscription);
		let server = GraphQLServer::builder(schema)
			.context_fn(|_request: &Request, _response: &mut Response| {
				Err(ContextError::new("session expired"))
			})
			.build();
		let client = TestClient::new(server);

		let error = client.create_mock_context(None).await.unwrap_err();

		assert!(matches!(
			error,
			ClientError::Execution(ExecutionError::Context(_))
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_mismatched_data_is_decode_error(client: TestClient<TestSchema>) {
		#[derive(Debug, serde::Deserialize)]
		struct Missing {
			#[allow(dead_code)]
			missing: String,
		}

		let error = client.query::<Missing>("{ token }").await.unwrap_err();

		assert!(matches!(error, ClientError::Decode(_)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_query_size_limit_surfaces_as_execution_error() {
		let schema = Schema::new(Query, Mutation, EmptySubscription);
		let server = GraphQLServer::builder(schema)
			.config(ServerConfig::default().with_max_query_size(4))
			.build();
		let client = TestClient::new(server);

		let error = client.query::<Value>("{ token }").await.unwrap_err();

		match error {
			ClientError::Execution(ExecutionError::HttpQuery(error)) => {
				assert_eq!(error.status, StatusCode::PAYLOAD_TOO_LARGE);
			}
			other => panic!("expected a query size error, got {other:?}"),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_validation_error_surfaces_as_execution_error(client: TestClient<TestSchema>) {
		let error = client.query::<Value>("{ missing }").await.unwrap_err();

		match error {
			ClientError::Execution(ExecutionError::HttpQuery(error)) => {
				assert_eq!(error.status, StatusCode::BAD_REQUEST);
				let body: GraphQLResponse = serde_json::from_str(&error.message).unwrap();
				assert_eq!(body.data, None);
				assert_eq!(body.errors.len(), 1);
			}
			other => panic!("expected a validation error, got {other:?}"),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_context_error_propagates() {
		let schema = Schema::new(Query, Mutation, EmptySubscription);
		let server = GraphQLServer::builder(schema)
			.context_fn(|_request: &Request, _response: &mut Response| {
				Err(ContextError::new("session expired"))
			})
			.build();
		let client = TestClient::new(server);

		let error = client.query::<Value>("{ token }").await.unwrap_err();

		assert!(matches!(error, ClientError::Execution(_)));
		assert_eq!(error.to_string(), "session expired");
	}
}
