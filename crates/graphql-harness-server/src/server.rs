use std::sync::Arc;

use async_graphql::{Data, ServerError};
use graphql_harness_http::{Request, Response};

use crate::ExecutionError;
use crate::config::ServerConfig;
use crate::context::{ContextError, ContextFactory, ExecutionContext};
use crate::options::{ErrorFormatter, ServerOptions};

/// GraphQL server bound to a schema
///
/// Cloning is cheap as long as the schema is; async-graphql schemas are
/// reference counted.
pub struct GraphQLServer<E> {
	schema: E,
	context: Option<Arc<dyn ContextFactory>>,
	format_error: Option<ErrorFormatter>,
	config: ServerConfig,
}

impl<E> GraphQLServer<E> {
	/// Server with no context factory and default settings
	pub fn new(schema: E) -> Self {
		Self::builder(schema).build()
	}

	pub fn builder(schema: E) -> GraphQLServerBuilder<E> {
		GraphQLServerBuilder {
			schema,
			context: None,
			format_error: None,
			config: ServerConfig::default(),
		}
	}

	pub fn schema(&self) -> &E {
		&self.schema
	}

	pub fn config(&self) -> &ServerConfig {
		&self.config
	}

	/// Bundle a request/response pair into the context for one call
	///
	/// Runs the configured [`ContextFactory`], which may also write to the
	/// response. Without a factory the resolver data is empty.
	pub async fn create_context(
		&self,
		request: Request,
		mut response: Response,
	) -> Result<ExecutionContext, ContextError> {
		let data = match &self.context {
			Some(factory) => factory.create(&request, &mut response).await?,
			None => Data::default(),
		};

		tracing::debug!(
			path = request.path(),
			has_context = self.context.is_some(),
			"created GraphQL execution context"
		);

		Ok(ExecutionContext::new(request, response).with_data(data))
	}
}

impl<E: Clone> GraphQLServer<E> {
	/// Resolve the options one request executes with
	///
	/// Moves the resolver data out of `context`, so a context yields options
	/// once.
	pub async fn create_graphql_server_options(
		&self,
		context: &mut ExecutionContext,
	) -> Result<ServerOptions<E>, ExecutionError> {
		Ok(ServerOptions {
			schema: self.schema.clone(),
			data: std::mem::take(&mut context.data),
			introspection: self.config.introspection,
			max_query_size: self.config.max_query_size,
			format_error: self.format_error.clone(),
		})
	}
}

impl<E: Clone> Clone for GraphQLServer<E> {
	fn clone(&self) -> Self {
		Self {
			schema: self.schema.clone(),
			context: self.context.clone(),
			format_error: self.format_error.clone(),
			config: self.config.clone(),
		}
	}
}

/// Builder for [`GraphQLServer`]
///
/// # Examples
///
/// ```
/// use async_graphql::{Data, EmptyMutation, EmptySubscription, Object, Schema};
/// use graphql_harness_http::{Request, Response};
/// use graphql_harness_server::{GraphQLServer, ServerConfig};
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
/// let server = GraphQLServer::builder(Schema::new(Query, EmptyMutation, EmptySubscription))
///     .config(ServerConfig::default().with_path("/api/graphql"))
///     .context_fn(|_request: &Request, _response: &mut Response| Ok(Data::default()))
///     .build();
///
/// assert_eq!(server.config().path, "/api/graphql");
/// ```
pub struct GraphQLServerBuilder<E> {
	schema: E,
	context: Option<Arc<dyn ContextFactory>>,
	format_error: Option<ErrorFormatter>,
	config: ServerConfig,
}

impl<E> GraphQLServerBuilder<E> {
	pub fn context(mut self, factory: impl ContextFactory + 'static) -> Self {
		self.context = Some(Arc::new(factory));
		self
	}

	/// Use a synchronous closure as the context factory
	pub fn context_fn<F>(self, factory: F) -> Self
	where
		F: Fn(&Request, &mut Response) -> Result<Data, ContextError> + Send + Sync + 'static,
	{
		self.context(factory)
	}

	pub fn format_error<F>(mut self, format: F) -> Self
	where
		F: Fn(ServerError) -> ServerError + Send + Sync + 'static,
	{
		self.format_error = Some(Arc::new(format));
		self
	}

	pub fn config(mut self, config: ServerConfig) -> Self {
		self.config = config;
		self
	}

	pub fn build(self) -> GraphQLServer<E> {
		GraphQLServer {
			schema: self.schema,
			context: self.context,
			format_error: self.format_error,
			config: self.config,
		}
	}
}
