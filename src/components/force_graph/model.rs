//! Normalized in-memory graph.
//!
//! Nodes live in a single arena addressed by [`NodeIdx`]; links hold indices
//! into it, resolved once at construction. The simulation, the interaction
//! controller and the focus machine all borrow from this registry.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::info;

use super::error::{GraphError, LinkEnd};
use super::theme::{ResolvedStyle, StyleDefaults, resolve_style};
use super::types::GraphData;

/// Stable index of a node in the [`GraphModel`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(
	/// Position in [`GraphModel::nodes`].
	pub usize,
);

/// Distance between consecutive rings of the initial placement spiral.
const INITIAL_RADIUS: f64 = 10.0;

/// A simulated node.
#[derive(Clone, Debug)]
pub struct Node {
	/// Unique id from the description.
	pub id: String,
	/// Label text.
	pub title: String,
	/// Current x position.
	pub x: f64,
	/// Current y position.
	pub y: f64,
	/// Current x velocity.
	pub vx: f64,
	/// Current y velocity.
	pub vy: f64,
	/// Pinned position. While set, the simulation holds the node here.
	pub pin: Option<(f64, f64)>,
	/// Intrinsic style, resolved against the defaults at load.
	pub style: ResolvedStyle,
	/// Address opened on activation.
	pub web_link: Option<String>,
}

impl Node {
	/// Whether the node is held at a pinned position.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}
}

/// A link between two nodes of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// First endpoint.
	pub source: NodeIdx,
	/// Second endpoint.
	pub target: NodeIdx,
}

impl Link {
	/// The endpoint opposite to `idx`, if `idx` is an endpoint.
	pub fn other(&self, idx: NodeIdx) -> Option<NodeIdx> {
		if self.source == idx {
			Some(self.target)
		} else if self.target == idx {
			Some(self.source)
		} else {
			None
		}
	}
}

/// Deterministic spiral placement for the `i`th node without a position.
pub fn initial_position(i: usize) -> (f64, f64) {
	let angle = PI * (3.0 - 5f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let a = i as f64 * angle;
	(radius * a.cos(), radius * a.sin())
}

/// Node arena plus resolved links and adjacency.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, NodeIdx>,
	/// Incident link indices per node.
	incident: Vec<Vec<usize>>,
}

impl GraphModel {
	/// Build the model, rejecting duplicate ids and dangling link endpoints.
	pub fn new(data: &GraphData, defaults: &StyleDefaults) -> Result<Self, GraphError> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.clone(), NodeIdx(i)).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
			let (x, y) = match (node.x, node.y) {
				(Some(x), Some(y)) if x.is_finite() && y.is_finite() => (x, y),
				_ => initial_position(i),
			};
			nodes.push(Node {
				id: node.id.clone(),
				title: node.title.clone(),
				x,
				y,
				vx: 0.0,
				vy: 0.0,
				pin: None,
				style: resolve_style(node.style.as_ref(), defaults),
				web_link: node.web_link.clone().filter(|l| !l.trim().is_empty()),
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		let mut incident = vec![Vec::new(); nodes.len()];
		for (i, link) in data.links.iter().enumerate() {
			let source = *index
				.get(&link.source)
				.ok_or_else(|| GraphError::UnresolvedLink {
					index: i,
					end: LinkEnd::Source,
					id: link.source.clone(),
				})?;
			let target = *index
				.get(&link.target)
				.ok_or_else(|| GraphError::UnresolvedLink {
					index: i,
					end: LinkEnd::Target,
					id: link.target.clone(),
				})?;
			incident[source.0].push(i);
			if target != source {
				incident[target.0].push(i);
			}
			links.push(Link { source, target });
		}

		info!(
			"initiative-map: built graph with {} nodes, {} links",
			nodes.len(),
			links.len()
		);

		Ok(Self {
			nodes,
			links,
			index,
			incident,
		})
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// All nodes in arena order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// All links in description order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Node at `idx`, if in range.
	pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
		self.nodes.get(idx.0)
	}

	pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> Option<&mut Node> {
		self.nodes.get_mut(idx.0)
	}

	/// Look up a node by its id.
	pub fn find(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	/// Indices of links with `idx` as an endpoint.
	pub fn incident_links(&self, idx: NodeIdx) -> &[usize] {
		self.incident.get(idx.0).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Nodes sharing a link with `idx`, in link order. A self-loop yields `idx`.
	pub fn neighbors(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
		self.incident_links(idx)
			.iter()
			.filter_map(move |&l| self.links[l].other(idx))
	}

	/// Number of link endpoints at `idx`. A self-loop counts twice.
	pub fn degree(&self, idx: NodeIdx) -> usize {
		self.incident_links(idx)
			.iter()
			.map(|&l| if self.links[l].source == self.links[l].target { 2 } else { 1 })
			.sum()
	}

	/// Current `(x, y)` of every node, in arena order.
	pub fn positions(&self) -> Vec<(f64, f64)> {
		self.nodes.iter().map(|n| (n.x, n.y)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::testing::{link, node};

	fn abc() -> GraphData {
		GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![link("a", "b")],
		}
	}

	#[test]
	fn resolves_links_to_arena_indices() {
		let model = GraphModel::new(&abc(), &StyleDefaults::default()).unwrap();

		assert_eq!(model.len(), 3);
		assert_eq!(
			model.links(),
			&[Link {
				source: NodeIdx(0),
				target: NodeIdx(1)
			}]
		);
		assert_eq!(model.find("c"), Some(NodeIdx(2)));
		assert_eq!(model.neighbors(NodeIdx(0)).collect::<Vec<_>>(), vec![NodeIdx(1)]);
		assert_eq!(model.neighbors(NodeIdx(1)).collect::<Vec<_>>(), vec![NodeIdx(0)]);
		assert_eq!(model.neighbors(NodeIdx(2)).count(), 0);
		assert_eq!(model.degree(NodeIdx(0)), 1);
	}

	#[test]
	fn dangling_link_rejects_the_whole_graph() {
		let mut data = abc();
		data.links.push(link("c", "zzz"));

		let err = GraphModel::new(&data, &StyleDefaults::default()).unwrap_err();
		match err {
			GraphError::UnresolvedLink { index, end, id } => {
				assert_eq!(index, 1);
				assert_eq!(end, LinkEnd::Target);
				assert_eq!(id, "zzz");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let mut data = abc();
		data.nodes.push(node("b"));

		assert!(matches!(
			GraphModel::new(&data, &StyleDefaults::default()),
			Err(GraphError::DuplicateNode(id)) if id == "b"
		));
	}

	#[test]
	fn every_node_gets_a_finite_distinct_position() {
		let mut data = abc();
		data.nodes[1].x = Some(5.0);
		data.nodes[1].y = Some(-7.0);
		data.nodes[2].x = Some(f64::NAN);
		data.nodes[2].y = Some(1.0);
		let model = GraphModel::new(&data, &StyleDefaults::default()).unwrap();

		let positions = model.positions();
		assert_eq!(positions[1], (5.0, -7.0));
		assert_eq!(positions[2], initial_position(2));
		assert!(positions.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
		assert_ne!(positions[0], positions[2]);
		assert!(model.nodes().iter().all(|n| n.vx == 0.0 && n.vy == 0.0 && !n.is_pinned()));
	}

	#[test]
	fn self_loop_counts_twice_and_neighbors_itself() {
		let data = GraphData {
			nodes: vec![node("a")],
			links: vec![link("a", "a")],
		};
		let model = GraphModel::new(&data, &StyleDefaults::default()).unwrap();

		assert_eq!(model.degree(NodeIdx(0)), 2);
		assert_eq!(model.neighbors(NodeIdx(0)).collect::<Vec<_>>(), vec![NodeIdx(0)]);
	}

	#[test]
	fn blank_web_link_is_dropped() {
		let mut data = abc();
		data.nodes[0].web_link = Some("  ".into());
		data.nodes[1].web_link = Some("https://example.org".into());
		let model = GraphModel::new(&data, &StyleDefaults::default()).unwrap();

		assert_eq!(model.nodes()[0].web_link, None);
		assert_eq!(model.nodes()[1].web_link.as_deref(), Some("https://example.org"));
	}
}
