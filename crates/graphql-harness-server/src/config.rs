//! Server configuration
//!
//! Settings are plain serde structs with defaults for every field, so a partial
//! TOML document is enough:
//!
//! ```toml
//! path = "/api/graphql"
//! introspection = false
//! max_query_size = 32768
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default mount path of the GraphQL endpoint
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to read configuration file: {0}")]
	Io(#[from] std::io::Error),

	#[error("Failed to parse configuration: {0}")]
	Parse(#[from] toml::de::Error),
}

/// GraphQL server settings
///
/// # Examples
///
/// ```
/// use graphql_harness_server::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.path, "/graphql");
/// assert!(config.introspection);
/// assert_eq!(config.max_query_size, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
	/// Path the endpoint is mounted on; mock requests default to it
	pub path: String,
	/// Whether introspection queries are allowed
	pub introspection: bool,
	/// Maximum accepted query text size in bytes
	pub max_query_size: Option<usize>,
}

impl ServerConfig {
	/// Parse settings from a TOML string
	///
	/// # Examples
	///
	/// ```
	/// use graphql_harness_server::ServerConfig;
	///
	/// let config = ServerConfig::from_toml_str("introspection = false").unwrap();
	/// assert!(!config.introspection);
	/// assert_eq!(config.path, "/graphql");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Load settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	pub fn with_introspection(mut self, enabled: bool) -> Self {
		self.introspection = enabled;
		self
	}

	pub fn with_max_query_size(mut self, size: usize) -> Self {
		self.max_query_size = Some(size);
		self
	}
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			path: DEFAULT_GRAPHQL_PATH.to_string(),
			introspection: true,
			max_query_size: None,
		}
	}
}
