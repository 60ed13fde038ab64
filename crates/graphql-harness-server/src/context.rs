//! Per-request execution context
//!
//! The web layer wraps a request/response pair into an [`ExecutionContext`],
//! running the application's [`ContextFactory`] on the way. The data the
//! factory produces travels with the context until options are resolved.

use async_graphql::Data;
use async_trait::async_trait;
use graphql_harness_http::{Request, Response};

/// Error raised by a [`ContextFactory`]
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
	#[error("{0}")]
	Message(String),

	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ContextError {
	pub fn new(message: impl Into<String>) -> Self {
		Self::Message(message.into())
	}
}

/// Builds the per-request resolver data from the incoming request
///
/// The factory may also write to the response (headers, locals), the way
/// middleware would.
///
/// # Examples
///
/// ```
/// use async_graphql::Data;
/// use async_trait::async_trait;
/// use graphql_harness_http::{Request, Response};
/// use graphql_harness_server::{ContextError, ContextFactory};
///
/// struct ApiKey(String);
///
/// struct ApiKeyContext;
///
/// #[async_trait]
/// impl ContextFactory for ApiKeyContext {
///     async fn create(&self, request: &Request, _response: &mut Response) -> Result<Data, ContextError> {
///         let key = request
///             .header("x-api-key")
///             .ok_or_else(|| ContextError::new("missing x-api-key header"))?;
///         let mut data = Data::default();
///         data.insert(ApiKey(key.to_string()));
///         Ok(data)
///     }
/// }
/// ```
#[async_trait]
pub trait ContextFactory: Send + Sync {
	async fn create(&self, request: &Request, response: &mut Response) -> Result<Data, ContextError>;
}

#[async_trait]
impl<F> ContextFactory for F
where
	F: Fn(&Request, &mut Response) -> Result<Data, ContextError> + Send + Sync,
{
	async fn create(&self, request: &Request, response: &mut Response) -> Result<Data, ContextError> {
		self(request, response)
	}
}

/// Request/response pair for a single GraphQL call
///
/// Built fresh for each call and dropped once the call completes. `data` is
/// what the context factory produced; it is moved into the server options.
pub struct ExecutionContext {
	pub request: Request,
	pub response: Response,
	pub data: Data,
}

impl ExecutionContext {
	pub fn new(request: Request, response: Response) -> Self {
		Self {
			request,
			response,
			data: Data::default(),
		}
	}

	pub fn with_data(mut self, data: Data) -> Self {
		self.data = data;
		self
	}

	pub fn into_parts(self) -> (Request, Response) {
		(self.request, self.response)
	}
}

impl std::fmt::Debug for ExecutionContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExecutionContext")
			.field("request", &self.request)
			.field("response", &self.response)
			.finish_non_exhaustive()
	}
}
