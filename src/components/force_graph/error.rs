//! Errors raised while loading and validating a graph description.

use std::fmt;

use thiserror::Error;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEnd {
	/// The `source` key.
	Source,
	/// The `target` key.
	Target,
}

impl fmt::Display for LinkEnd {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LinkEnd::Source => f.write_str("source"),
			LinkEnd::Target => f.write_str("target"),
		}
	}
}

/// Load and construction failures. Any of these rejects the whole graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The description could not be found on the page.
	#[error("graph description not found: {0}")]
	Missing(String),

	/// The description is not valid JSON or does not match the expected shape.
	#[error("malformed graph description: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two nodes share the same id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// A link names a node that does not exist.
	#[error("link {index} references unknown {end} node `{id}`")]
	UnresolvedLink {
		/// Position of the link in the description.
		index: usize,
		/// Which endpoint failed.
		end: LinkEnd,
		/// The id that matched no node.
		id: String,
	},

	/// A configuration value is out of its valid range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}
