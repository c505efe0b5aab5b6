//! Hover focus state machine and the visual overlay derived from it.
//!
//! Hovering a node focuses it: the node and its direct neighbors are
//! emphasized, everything else is dimmed. The overlay is recomputed from the
//! focus state and the intrinsic styles on demand and never written back into
//! the model.

use std::collections::BTreeSet;

use super::model::{GraphModel, Node, NodeIdx};
use super::theme::Theme;

/// Pointer hover input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent {
	/// The pointer entered a node.
	Enter(NodeIdx),
	/// The pointer left whatever node it was over.
	Leave,
}

/// Hover focus: nothing, or one node with its neighborhood.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
	/// No node is hovered.
	#[default]
	Idle,
	/// A node is hovered.
	Focused {
		/// The hovered node.
		node: NodeIdx,
		/// Nodes sharing a link with `node`.
		neighbors: BTreeSet<NodeIdx>,
		/// Indices of links incident to `node`.
		links: BTreeSet<usize>,
	},
}

/// Classification of a single element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// No focus is active; intrinsic style applies.
	Normal,
	/// Focused node, one of its neighbors, or an incident link.
	Emphasized,
	/// Anything else while a node is focused.
	Dimmed,
}

impl FocusState {
	/// Pure transition function. Entering an unknown node is ignored, and
	/// entering the node already in focus keeps the current state.
	pub fn transition(self, event: HoverEvent, model: &GraphModel) -> FocusState {
		match event {
			HoverEvent::Leave => FocusState::Idle,
			HoverEvent::Enter(idx) if model.node(idx).is_none() => self,
			HoverEvent::Enter(idx) if self.focused() == Some(idx) => self,
			HoverEvent::Enter(idx) => FocusState::Focused {
				node: idx,
				neighbors: model.neighbors(idx).collect(),
				links: model.incident_links(idx).iter().copied().collect(),
			},
		}
	}

	/// The hovered node, if any.
	pub fn focused(&self) -> Option<NodeIdx> {
		match self {
			FocusState::Idle => None,
			FocusState::Focused { node, .. } => Some(*node),
		}
	}

	/// How node `idx` should be drawn.
	pub fn node_emphasis(&self, idx: NodeIdx) -> Emphasis {
		match self {
			FocusState::Idle => Emphasis::Normal,
			FocusState::Focused {
				node, neighbors, ..
			} if *node == idx || neighbors.contains(&idx) => Emphasis::Emphasized,
			FocusState::Focused { .. } => Emphasis::Dimmed,
		}
	}

	/// How the link at index `link` should be drawn.
	pub fn link_emphasis(&self, link: usize) -> Emphasis {
		match self {
			FocusState::Idle => Emphasis::Normal,
			FocusState::Focused { links, .. } if links.contains(&link) => Emphasis::Emphasized,
			FocusState::Focused { .. } => Emphasis::Dimmed,
		}
	}
}

/// Resolved drawing attributes for a node circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeVisual<'a> {
	/// Fill color.
	pub fill: &'a str,
	/// Outline color.
	pub stroke: &'a str,
	/// Outline width.
	pub stroke_width: f64,
	/// Focus classification.
	pub emphasis: Emphasis,
}

/// Resolved drawing attributes for a link line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkVisual<'a> {
	/// Line color.
	pub stroke: &'a str,
	/// Line width.
	pub stroke_width: f64,
	/// Line opacity.
	pub opacity: f64,
	/// Focus classification.
	pub emphasis: Emphasis,
}

/// Resolved drawing attributes for a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelVisual<'a> {
	/// Text color.
	pub color: &'a str,
	/// Focus classification of the owning node.
	pub emphasis: Emphasis,
}

/// Visual state of every element, in model order.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualOverlay<'a> {
	/// One entry per node.
	pub nodes: Vec<NodeVisual<'a>>,
	/// One entry per link.
	pub links: Vec<LinkVisual<'a>>,
	/// One entry per node label.
	pub labels: Vec<LabelVisual<'a>>,
}

impl<'a> VisualOverlay<'a> {
	/// Derive the visuals of every element from `focus`.
	pub fn new(focus: &FocusState, model: &'a GraphModel, theme: &'a Theme) -> Self {
		let nodes = model.nodes();
		Self {
			nodes: nodes
				.iter()
				.enumerate()
				.map(|(i, n)| node_visual(n, focus.node_emphasis(NodeIdx(i)), theme))
				.collect(),
			links: (0..model.links().len())
				.map(|l| link_visual(focus.link_emphasis(l), theme))
				.collect(),
			labels: nodes
				.iter()
				.enumerate()
				.map(|(i, n)| label_visual(n, focus.node_emphasis(NodeIdx(i))))
				.collect(),
		}
	}
}

fn node_visual<'a>(node: &'a Node, emphasis: Emphasis, theme: &'a Theme) -> NodeVisual<'a> {
	let focus = &theme.focus;
	let (fill, stroke, stroke_width) = match emphasis {
		Emphasis::Normal => (
			node.style.fill.as_str(),
			node.style.stroke.as_str(),
			node.style.stroke_width,
		),
		Emphasis::Emphasized => (
			focus.emphasized_fill.as_str(),
			focus.emphasized_stroke.as_str(),
			focus.emphasized_stroke_width,
		),
		Emphasis::Dimmed => (
			focus.dimmed_fill.as_str(),
			focus.dimmed_stroke.as_str(),
			focus.dimmed_stroke_width,
		),
	};
	NodeVisual {
		fill,
		stroke,
		stroke_width,
		emphasis,
	}
}

fn link_visual(emphasis: Emphasis, theme: &Theme) -> LinkVisual<'_> {
	let style = match emphasis {
		Emphasis::Normal => &theme.link,
		Emphasis::Emphasized => &theme.focus.emphasized_link,
		Emphasis::Dimmed => &theme.focus.dimmed_link,
	};
	LinkVisual {
		stroke: &style.stroke,
		stroke_width: style.stroke_width,
		opacity: style.opacity,
		emphasis,
	}
}

fn label_visual(node: &Node, emphasis: Emphasis) -> LabelVisual<'_> {
	let color = match emphasis {
		Emphasis::Normal => &node.style.font_color,
		Emphasis::Emphasized | Emphasis::Dimmed => node
			.style
			.hover_font_color
			.as_ref()
			.unwrap_or(&node.style.font_color),
	};
	LabelVisual { color, emphasis }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::testing::graph;
	use crate::components::force_graph::theme::StyleDefaults;
	use crate::components::force_graph::types::NodeStyle;
	use proptest::prelude::*;

	fn abc() -> GraphModel {
		let mut data = graph(&["a", "b", "c"], &[("a", "b")]);
		data.nodes[2].style = Some(NodeStyle {
			color: Some("#0a0".into()),
			font_color: Some("navy".into()),
			hover_font_color: Some("white".into()),
			..NodeStyle::default()
		});
		GraphModel::new(&data, &StyleDefaults::default()).unwrap()
	}

	const A: NodeIdx = NodeIdx(0);
	const B: NodeIdx = NodeIdx(1);
	const C: NodeIdx = NodeIdx(2);

	#[test]
	fn hovering_a_emphasizes_a_and_its_neighbor() {
		let model = abc();
		let focus = FocusState::Idle.transition(HoverEvent::Enter(A), &model);

		match &focus {
			FocusState::Focused {
				node,
				neighbors,
				links,
			} => {
				assert_eq!(*node, A);
				assert_eq!(neighbors.iter().copied().collect::<Vec<_>>(), vec![B]);
				assert_eq!(links.iter().copied().collect::<Vec<_>>(), vec![0]);
			}
			FocusState::Idle => panic!("expected focus"),
		}
		assert_eq!(focus.node_emphasis(A), Emphasis::Emphasized);
		assert_eq!(focus.node_emphasis(B), Emphasis::Emphasized);
		assert_eq!(focus.node_emphasis(C), Emphasis::Dimmed);
		assert_eq!(focus.link_emphasis(0), Emphasis::Emphasized);
	}

	#[test]
	fn overlay_uses_palette_while_focused() {
		let model = abc();
		let theme = Theme::default();
		let focus = FocusState::Idle.transition(HoverEvent::Enter(A), &model);
		let overlay = VisualOverlay::new(&focus, &model, &theme);

		assert_eq!(overlay.nodes[0].fill, "#333");
		assert_eq!(overlay.nodes[1].stroke_width, 2.0);
		assert_eq!(overlay.nodes[2].fill, "lightgray");
		assert_eq!(overlay.links[0].stroke, "black");
		assert_eq!(overlay.links[0].opacity, 1.0);
		assert_eq!(overlay.labels[0].color, "black");
		assert_eq!(overlay.labels[2].color, "white");
		assert_eq!(overlay.labels[2].emphasis, Emphasis::Dimmed);
	}

	#[test]
	fn leaving_restores_intrinsic_style() {
		let model = abc();
		let theme = Theme::default();
		let idle = VisualOverlay::new(&FocusState::Idle, &model, &theme);

		let focus = FocusState::Idle
			.transition(HoverEvent::Enter(A), &model)
			.transition(HoverEvent::Leave, &model);
		let overlay = VisualOverlay::new(&focus, &model, &theme);

		assert_eq!(focus, FocusState::Idle);
		assert_eq!(overlay, idle);
		assert_eq!(overlay.nodes[0].fill, "#888");
		assert_eq!(overlay.nodes[2].fill, "#0a0");
		assert_eq!(overlay.nodes[0].stroke_width, 1.5);
		assert_eq!(overlay.labels[2].color, "navy");
		assert_eq!(overlay.links[0].stroke, "#000");
		assert_eq!(overlay.links[0].opacity, 0.2);
	}

	#[test]
	fn switching_nodes_is_direct() {
		let model = abc();
		let focus = FocusState::Idle
			.transition(HoverEvent::Enter(A), &model)
			.transition(HoverEvent::Enter(C), &model);

		assert_eq!(focus.focused(), Some(C));
		assert_eq!(focus.node_emphasis(A), Emphasis::Dimmed);
		assert_eq!(focus.link_emphasis(0), Emphasis::Dimmed);
	}

	#[test]
	fn unknown_node_is_ignored() {
		let model = abc();
		let focus = FocusState::Idle.transition(HoverEvent::Enter(NodeIdx(99)), &model);
		assert_eq!(focus, FocusState::Idle);
	}

	proptest! {
		#[test]
		fn prop_leave_always_restores_idle_overlay(hovers in prop::collection::vec(0usize..4, 0..20)) {
			let model = abc();
			let theme = Theme::default();
			let idle = VisualOverlay::new(&FocusState::Idle, &model, &theme);

			let mut focus = FocusState::Idle;
			for h in hovers {
				focus = focus.transition(HoverEvent::Enter(NodeIdx(h)), &model);
			}
			focus = focus.transition(HoverEvent::Leave, &model);

			prop_assert_eq!(VisualOverlay::new(&focus, &model, &theme), idle);
		}

		#[test]
		fn prop_focused_node_is_always_emphasized(h in 0usize..3) {
			let model = abc();
			let focus = FocusState::Idle.transition(HoverEvent::Enter(NodeIdx(h)), &model);
			prop_assert_eq!(focus.node_emphasis(NodeIdx(h)), Emphasis::Emphasized);
			for n in model.neighbors(NodeIdx(h)) {
				prop_assert_eq!(focus.node_emphasis(n), Emphasis::Emphasized);
			}
		}
	}
}
