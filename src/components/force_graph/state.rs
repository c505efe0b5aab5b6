//! Graph session state and event dispatch.
//!
//! Owns the model, the simulation, the interaction controller and the focus
//! state. Every frame and every input event goes through
//! [`ForceGraphState::dispatch`], which applies it in a fixed order and hands
//! back the side effects the host has to carry out.

use log::info;

use super::config::GraphConfig;
use super::error::GraphError;
use super::focus::{FocusState, HoverEvent, VisualOverlay};
use super::interaction::{InteractionController, ViewTransform, WheelInput};
use super::model::{GraphModel, NodeIdx};
use super::simulation::Simulation;
use super::theme::Theme;
use super::types::GraphData;

/// Input delivered to the graph, in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphEvent {
	/// Animation frame: advance the simulation one step.
	Frame,
	/// Button pressed or finger down.
	PointerDown {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
	},
	/// Pointer moved, pressed or not.
	PointerMove {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
	},
	/// Button released or last finger lifted.
	PointerUp,
	/// Pointer left the canvas; drops hover and any gesture.
	PointerLeave,
	/// Wheel scroll.
	Wheel(WheelInput),
	/// Two-finger pinch: `factor` is the ratio of finger distances.
	Pinch {
		/// Current over previous finger distance.
		factor: f64,
		/// Midpoint x.
		x: f64,
		/// Midpoint y.
		y: f64,
	},
	/// Double click; shift zooms out.
	DoubleClick {
		/// Canvas x.
		x: f64,
		/// Canvas y.
		y: f64,
		/// Shift held.
		shift: bool,
	},
	/// Viewport changed size.
	Resize {
		/// New width in pixels.
		width: f64,
		/// New height in pixels.
		height: f64,
	},
}

/// Side effect requested by the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
	/// Open an external page in a new browsing context.
	OpenLink(String),
}

/// Core graph state combining the simulation with interaction and focus.
///
/// Created once when the component mounts, then driven by the animation loop
/// and the DOM event handlers.
pub struct ForceGraphState {
	/// Nodes, links and positions.
	pub model: GraphModel,
	/// Layout engine.
	pub simulation: Simulation,
	/// Drag, pan and zoom.
	pub interaction: InteractionController,
	/// Hover focus.
	pub focus: FocusState,
	/// Colors and fonts used by the renderer.
	pub theme: Theme,
	/// Viewport width in pixels.
	pub width: f64,
	/// Viewport height in pixels.
	pub height: f64,
	needs_redraw: bool,
}

impl ForceGraphState {
	/// Build the model from `data` and start a fresh simulation.
	pub fn new(data: &GraphData, width: f64, height: f64, config: GraphConfig) -> Result<Self, GraphError> {
		config.validate()?;
		let model = GraphModel::new(data, &config.theme.node)?;
		let simulation = Simulation::new(&model, &config.simulation);
		info!(
			"state: {} nodes, {} links in a {width}x{height} viewport",
			model.len(),
			model.links().len()
		);

		Ok(Self {
			model,
			simulation,
			interaction: InteractionController::new(config.interaction, width, height),
			focus: FocusState::Idle,
			theme: config.theme,
			width,
			height,
			needs_redraw: true,
		})
	}

	/// Current pan and zoom.
	pub fn transform(&self) -> ViewTransform {
		self.interaction.transform()
	}

	/// Topmost node under a canvas point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIdx> {
		self.interaction.node_at(&self.model, sx, sy)
	}

	/// Current per-element visual state.
	pub fn overlay(&self) -> VisualOverlay<'_> {
		VisualOverlay::new(&self.focus, &self.model, &self.theme)
	}

	/// Whether anything changed since the last call.
	pub fn take_redraw(&mut self) -> bool {
		std::mem::take(&mut self.needs_redraw)
	}

	fn hover(&mut self, event: HoverEvent) {
		let next = std::mem::take(&mut self.focus).transition(event, &self.model);
		if next != self.focus {
			self.needs_redraw = true;
		}
		self.focus = next;
	}

	/// Apply one event and return the side effects it asks for.
	pub fn dispatch(&mut self, event: GraphEvent) -> Vec<Request> {
		let mut requests = Vec::new();
		let changed = match event {
			GraphEvent::Frame => self.simulation.step(&mut self.model),
			GraphEvent::PointerDown { x, y } => {
				let hit = self.node_at_position(x, y);
				self.interaction
					.pointer_down(x, y, hit, &mut self.model, &mut self.simulation)
			}
			GraphEvent::PointerMove { x, y } => {
				let moved = self.interaction.pointer_move(x, y, &mut self.model);
				let hover = match self.node_at_position(x, y) {
					Some(idx) => HoverEvent::Enter(idx),
					None => HoverEvent::Leave,
				};
				self.hover(hover);
				moved
			}
			GraphEvent::PointerUp => {
				let activated = self
					.interaction
					.pointer_up(&mut self.model, &mut self.simulation);
				if let Some(url) = activated
					.and_then(|idx| self.model.node(idx))
					.and_then(|n| n.web_link.clone())
				{
					info!("state: opening {url}");
					requests.push(Request::OpenLink(url));
				}
				false
			}
			GraphEvent::PointerLeave => {
				self.interaction.cancel(&mut self.model, &mut self.simulation);
				self.hover(HoverEvent::Leave);
				false
			}
			GraphEvent::Wheel(input) => self.interaction.wheel(&input),
			GraphEvent::Pinch { factor, x, y } => self.interaction.pinch(factor, x, y),
			GraphEvent::DoubleClick { x, y, shift } => {
				self.node_at_position(x, y).is_none() && self.interaction.double_click(x, y, shift)
			}
			GraphEvent::Resize { width, height } => {
				self.interaction
					.resize((self.width, self.height), (width, height));
				self.width = width;
				self.height = height;
				true
			}
		};
		self.needs_redraw |= changed;
		requests
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::focus::Emphasis;
	use crate::components::force_graph::testing::{graph, link, node_at, state};

	fn linked_pair() -> GraphData {
		let mut data = GraphData {
			nodes: vec![node_at("a", 0.0, 0.0), node_at("b", 100.0, 0.0)],
			links: vec![link("a", "b")],
		};
		data.nodes[1].web_link = Some("https://example.org/b".into());
		data
	}

	#[test]
	fn invalid_graph_is_rejected() {
		let data = graph(&["a"], &[("a", "ghost")]);
		let err = ForceGraphState::new(&data, 800.0, 600.0, GraphConfig::default()).err();
		assert!(matches!(err, Some(GraphError::UnresolvedLink { .. })));
	}

	#[test]
	fn inverted_zoom_bounds_are_rejected_before_any_input() {
		let mut config = GraphConfig::default();
		config.interaction.min_zoom = 5.0;
		config.interaction.max_zoom = 1.0;
		let err = ForceGraphState::new(&linked_pair(), 800.0, 600.0, config).err();
		assert!(matches!(err, Some(GraphError::InvalidConfig(_))));

		let mut config = GraphConfig::default();
		config.interaction.viewport.half_width = -10.0;
		let err = ForceGraphState::new(&linked_pair(), 800.0, 600.0, config).err();
		assert!(matches!(err, Some(GraphError::InvalidConfig(_))));
	}

	#[test]
	fn frames_advance_until_rest() {
		let mut s = state(&graph(&["a", "b"], &[("a", "b")]));
		assert!(s.take_redraw());

		s.dispatch(GraphEvent::Frame);
		assert!(s.take_redraw());
		assert!(!s.take_redraw());

		while !s.simulation.is_at_rest() {
			s.dispatch(GraphEvent::Frame);
		}
		s.take_redraw();
		s.dispatch(GraphEvent::Frame);
		assert!(!s.take_redraw());
	}

	#[test]
	fn hover_focuses_and_leave_restores() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::PointerMove { x: 400.0, y: 300.0 });
		assert_eq!(s.focus.focused(), Some(NodeIdx(0)));
		assert_eq!(s.overlay().nodes[1].emphasis, Emphasis::Emphasized);

		s.dispatch(GraphEvent::PointerMove { x: 450.0, y: 500.0 });
		assert_eq!(s.focus, FocusState::Idle);
		assert_eq!(s.overlay().nodes[0].emphasis, Emphasis::Normal);
	}

	#[test]
	fn click_on_linked_node_requests_open() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::PointerDown { x: 500.0, y: 300.0 });
		let requests = s.dispatch(GraphEvent::PointerUp);

		assert_eq!(requests, vec![Request::OpenLink("https://example.org/b".into())]);
	}

	#[test]
	fn click_without_link_or_after_drag_requests_nothing() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::PointerDown { x: 400.0, y: 300.0 });
		assert!(s.dispatch(GraphEvent::PointerUp).is_empty());

		s.dispatch(GraphEvent::PointerDown { x: 500.0, y: 300.0 });
		s.dispatch(GraphEvent::PointerMove { x: 540.0, y: 320.0 });
		assert!(s.dispatch(GraphEvent::PointerUp).is_empty());
	}

	#[test]
	fn leaving_canvas_releases_drag_and_focus() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::PointerDown { x: 400.0, y: 300.0 });
		s.dispatch(GraphEvent::PointerMove { x: 420.0, y: 300.0 });
		assert!(s.model.nodes()[0].is_pinned());

		s.dispatch(GraphEvent::PointerLeave);
		assert!(!s.model.nodes()[0].is_pinned());
		assert_eq!(s.focus, FocusState::Idle);
		assert_eq!(s.interaction.dragged(), None);
	}

	#[test]
	fn double_click_on_node_does_not_zoom() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::DoubleClick { x: 400.0, y: 300.0, shift: false });
		assert_eq!(s.transform().k, 1.0);

		s.dispatch(GraphEvent::DoubleClick { x: 10.0, y: 10.0, shift: false });
		assert_eq!(s.transform().k, 2.0);
	}

	#[test]
	fn resize_keeps_origin_centered() {
		let mut s = state(&linked_pair());
		s.dispatch(GraphEvent::Resize { width: 1000.0, height: 400.0 });
		assert_eq!(s.transform().screen_to_graph(500.0, 200.0), (0.0, 0.0));
		assert_eq!((s.width, s.height), (1000.0, 400.0));
	}
}
