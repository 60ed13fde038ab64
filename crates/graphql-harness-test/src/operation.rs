//! GraphQL operations sent by the test client
//!
//! An operation body is either raw query text or a document parsed with
//! [`gql`]. [`GraphQLOperation`] holds exactly one query or mutation, so an
//! ambiguous operation cannot be built through it. [`OperationDescriptor`] is
//! the untyped form (useful for fixtures loaded from JSON) and is checked when
//! it is converted.

use graphql_parser::query::{Document, ParseError, parse_query};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ClientError;

/// A parsed GraphQL document
pub type GraphQLDocument = Document<'static, String>;

/// Failure to parse query text into a [`GraphQLDocument`]
#[derive(Debug, thiserror::Error)]
#[error("Invalid GraphQL document: {0}")]
pub struct DocumentError(#[from] ParseError);

/// Parse query text into a document
///
/// # Examples
///
/// ```
/// use graphql_harness_test::gql;
///
/// let document = gql("query Me { currentUser { id } }").unwrap();
/// assert_eq!(document.definitions.len(), 1);
///
/// assert!(gql("query {").is_err());
/// ```
pub fn gql(text: &str) -> Result<GraphQLDocument, DocumentError> {
	Ok(parse_query::<String>(text)?.into_static())
}

/// Text of a GraphQL operation, raw or parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationBody {
	Text(String),
	Document(GraphQLDocument),
}

impl OperationBody {
	/// Query text sent to the server
	///
	/// Text is passed through unchanged; documents are printed in canonical
	/// form.
	pub fn to_query_text(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Document(document) => document.to_string(),
		}
	}
}

impl From<&str> for OperationBody {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for OperationBody {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<GraphQLDocument> for OperationBody {
	fn from(document: GraphQLDocument) -> Self {
		Self::Document(document)
	}
}

impl From<OperationBody> for String {
	fn from(body: OperationBody) -> Self {
		match body {
			OperationBody::Text(text) => text,
			OperationBody::Document(document) => document.to_string(),
		}
	}
}

/// Query or mutation, never both
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
	Query(OperationBody),
	Mutation(OperationBody),
}

impl Operation {
	pub fn body(&self) -> &OperationBody {
		match self {
			Self::Query(body) | Self::Mutation(body) => body,
		}
	}
}

/// A single operation with its variables and operation name
///
/// # Examples
///
/// ```
/// use graphql_harness_test::GraphQLOperation;
/// use serde_json::json;
///
/// let operation = GraphQLOperation::mutation("mutation Rename($name: String!) { rename(name: $name) }")
///     .variables(json!({"name": "ada"}))
///     .operation_name("Rename");
///
/// assert_eq!(operation.operation_name.as_deref(), Some("Rename"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLOperation {
	pub operation: Operation,
	pub variables: Option<Value>,
	pub operation_name: Option<String>,
}

impl GraphQLOperation {
	pub fn query(body: impl Into<OperationBody>) -> Self {
		Self::from(Operation::Query(body.into()))
	}

	pub fn mutation(body: impl Into<OperationBody>) -> Self {
		Self::from(Operation::Mutation(body.into()))
	}

	pub fn variables(mut self, variables: Value) -> Self {
		self.variables = Some(variables);
		self
	}

	pub fn operation_name(mut self, operation_name: impl Into<String>) -> Self {
		self.operation_name = Some(operation_name.into());
		self
	}
}

impl From<Operation> for GraphQLOperation {
	fn from(operation: Operation) -> Self {
		Self {
			operation,
			variables: None,
			operation_name: None,
		}
	}
}

/// Untyped operation, as a caller would write it in JSON
///
/// Bare text or a document converts into a query descriptor.
///
/// ```json
/// { "query": "{ currentUser { id } }", "variables": {}, "operationName": null }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationDescriptor {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub query: Option<OperationBody>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mutation: Option<OperationBody>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub variables: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub operation_name: Option<String>,
}

impl OperationDescriptor {
	pub fn query(body: impl Into<OperationBody>) -> Self {
		Self {
			query: Some(body.into()),
			..Default::default()
		}
	}

	pub fn mutation(body: impl Into<OperationBody>) -> Self {
		Self {
			mutation: Some(body.into()),
			..Default::default()
		}
	}
}

impl From<&str> for OperationDescriptor {
	fn from(text: &str) -> Self {
		Self::query(text)
	}
}

impl From<String> for OperationDescriptor {
	fn from(text: String) -> Self {
		Self::query(text)
	}
}

impl From<GraphQLDocument> for OperationDescriptor {
	fn from(document: GraphQLDocument) -> Self {
		Self::query(document)
	}
}

impl TryFrom<OperationDescriptor> for GraphQLOperation {
	type Error = ClientError;

	fn try_from(descriptor: OperationDescriptor) -> Result<Self, Self::Error> {
		let operation = match (descriptor.query, descriptor.mutation) {
			(Some(query), None) => Operation::Query(query),
			(None, Some(mutation)) => Operation::Mutation(mutation),
			_ => return Err(ClientError::AmbiguousOperation),
		};

		Ok(Self {
			operation,
			variables: descriptor.variables,
			operation_name: descriptor.operation_name,
		})
	}
}

impl From<GraphQLOperation> for OperationDescriptor {
	fn from(operation: GraphQLOperation) -> Self {
		let (query, mutation) = match operation.operation {
			Operation::Query(body) => (Some(body), None),
			Operation::Mutation(body) => (None, Some(body)),
		};

		Self {
			query,
			mutation,
			variables: operation.variables,
			operation_name: operation.operation_name,
		}
	}
}
