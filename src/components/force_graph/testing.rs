//! Shared builders for unit tests.

use super::config::GraphConfig;
use super::state::ForceGraphState;
use super::types::{GraphData, GraphLink, GraphNode};

pub(crate) fn node(id: &str) -> GraphNode {
	GraphNode {
		id: id.into(),
		title: id.to_uppercase(),
		style: None,
		web_link: None,
		x: None,
		y: None,
	}
}

pub(crate) fn node_at(id: &str, x: f64, y: f64) -> GraphNode {
	GraphNode {
		x: Some(x),
		y: Some(y),
		..node(id)
	}
}

pub(crate) fn link(source: &str, target: &str) -> GraphLink {
	GraphLink {
		source: source.into(),
		target: target.into(),
	}
}

/// Nodes named by `ids`, linked by `pairs`.
pub(crate) fn graph(ids: &[&str], pairs: &[(&str, &str)]) -> GraphData {
	GraphData {
		nodes: ids.iter().map(|id| node(id)).collect(),
		links: pairs.iter().map(|(s, t)| link(s, t)).collect(),
	}
}

/// Full state with default configuration and an 800x600 viewport.
pub(crate) fn state(data: &GraphData) -> ForceGraphState {
	ForceGraphState::new(data, 800.0, 600.0, GraphConfig::default()).unwrap()
}
