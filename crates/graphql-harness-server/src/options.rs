use std::fmt;
use std::sync::Arc;

use async_graphql::{Data, ServerError};

/// Hook applied to every error in a response before it is serialized
pub type ErrorFormatter = Arc<dyn Fn(ServerError) -> ServerError + Send + Sync>;

/// Options resolved for a single GraphQL request
///
/// Produced by [`GraphQLServer::create_graphql_server_options`] and consumed
/// by [`run_http_query`].
///
/// [`GraphQLServer::create_graphql_server_options`]: crate::GraphQLServer::create_graphql_server_options
/// [`run_http_query`]: crate::run_http_query
pub struct ServerOptions<E> {
	/// Schema the operation runs against
	pub schema: E,
	/// Resolver data built by the context factory
	pub data: Data,
	pub introspection: bool,
	pub max_query_size: Option<usize>,
	pub format_error: Option<ErrorFormatter>,
}

impl<E> ServerOptions<E> {
	pub fn new(schema: E) -> Self {
		Self {
			schema,
			data: Data::default(),
			introspection: true,
			max_query_size: None,
			format_error: None,
		}
	}

	pub(crate) fn format_errors(&self, errors: Vec<ServerError>) -> Vec<ServerError> {
		match &self.format_error {
			Some(format) => errors.into_iter().map(|error| format(error)).collect(),
			None => errors,
		}
	}
}

impl<E> fmt::Debug for ServerOptions<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServerOptions")
			.field("introspection", &self.introspection)
			.field("max_query_size", &self.max_query_size)
			.field("format_error", &self.format_error.is_some())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let options = ServerOptions::new(());

		assert!(options.introspection);
		assert!(options.max_query_size.is_none());
		assert!(options.format_error.is_none());
	}

	#[rstest]
	fn test_format_errors_without_formatter_is_identity() {
		let options = ServerOptions::new(());
		let errors = vec![ServerError::new("boom", None)];

		let formatted = options.format_errors(errors);

		assert_eq!(formatted.len(), 1);
		assert_eq!(formatted[0].message, "boom");
	}

	#[rstest]
	fn test_format_errors_applies_formatter() {
		let mut options = ServerOptions::new(());
		options.format_error = Some(Arc::new(|mut error: ServerError| {
			error.message = format!("[masked] {}", error.message);
			error
		}));

		let formatted = options.format_errors(vec![
			ServerError::new("first", None),
			ServerError::new("second", None),
		]);

		let messages: Vec<_> = formatted.iter().map(|e| e.message.as_str()).collect();
		assert_eq!(messages, vec!["[masked] first", "[masked] second"]);
	}

	#[rstest]
	fn test_debug_hides_data() {
		let options = ServerOptions::new(());

		let rendered = format!("{:?}", options);

		assert!(rendered.starts_with("ServerOptions"));
		assert!(rendered.contains("introspection: true"));
	}
}
