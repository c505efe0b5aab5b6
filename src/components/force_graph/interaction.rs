//! Pointer interaction: node dragging and the pan/zoom view transform.
//!
//! Dragging pins a node and reheats the simulation; panning and zooming only
//! change the [`ViewTransform`] used for drawing and never touch node
//! coordinates. Screen coordinates are canvas pixels; graph coordinates are
//! the simulation's world units.

use log::debug;

use super::config::InteractionConfig;
use super::model::{GraphModel, NodeIdx};
use super::simulation::Simulation;

/// Pan and zoom transform applied to the entire graph view.
/// `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in pixels.
	pub x: f64,
	/// Vertical translation in pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Canvas pixels to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Graph coordinates to canvas pixels.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Multiply the scale by `factor`, clamped to `[min, max]`, keeping the
	/// graph point under the screen anchor fixed.
	pub fn zoom_at(&mut self, factor: f64, ax: f64, ay: f64, min: f64, max: f64) {
		if !(factor.is_finite() && factor > 0.0 && ax.is_finite() && ay.is_finite()) {
			return;
		}
		let new_k = (self.k * factor).clamp(min, max);
		let ratio = new_k / self.k;
		self.x = ax - (ax - self.x) * ratio;
		self.y = ay - (ay - self.y) * ratio;
		self.k = new_k;
	}
}

/// Wheel input as delivered by the browser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
	/// Pointer x in canvas pixels.
	pub x: f64,
	/// Pointer y in canvas pixels.
	pub y: f64,
	/// Vertical scroll amount, in `delta_mode` units.
	pub delta_y: f64,
	/// 0 = pixels, 1 = lines, 2 = pages.
	pub delta_mode: u32,
	/// Ctrl held.
	pub ctrl: bool,
	/// Meta (command) held.
	pub meta: bool,
}

impl WheelInput {
	/// Wheel scroll counts as zoom only while ctrl or meta is held.
	pub fn is_zoom(&self) -> bool {
		self.ctrl || self.meta
	}

	/// Multiplicative zoom factor for this wheel step.
	pub fn zoom_factor(&self) -> f64 {
		let unit = match self.delta_mode {
			0 => 0.002,
			1 => 0.05,
			_ => 1.0,
		};
		let boost = if self.ctrl { 10.0 } else { 1.0 };
		2f64.powf(-self.delta_y * unit * boost)
	}
}

/// Pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	Dragging {
		node: NodeIdx,
		/// Pointer position at press, in graph coordinates.
		pointer_start: (f64, f64),
		/// Node position at press.
		node_start: (f64, f64),
		/// Pointer position at press, in screen pixels.
		screen_start: (f64, f64),
		moved: bool,
	},
	Panning {
		screen_start: (f64, f64),
		transform_start: (f64, f64),
		moved: bool,
	},
}

/// Pointer gesture tracking plus the current view transform.
pub struct InteractionController {
	config: InteractionConfig,
	transform: ViewTransform,
	gesture: Gesture,
}

impl InteractionController {
	/// Controller whose transform puts the graph origin at the viewport center.
	pub fn new(config: InteractionConfig, width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			config,
			gesture: Gesture::Idle,
		}
	}

	/// Current pan and zoom.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Node currently being dragged, if any.
	pub fn dragged(&self) -> Option<NodeIdx> {
		match self.gesture {
			Gesture::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Whether a drag or pan is in progress.
	pub fn is_active(&self) -> bool {
		self.gesture != Gesture::Idle
	}

	/// Keep the view centered when the viewport changes size.
	pub fn resize(&mut self, old: (f64, f64), new: (f64, f64)) {
		self.transform.x += (new.0 - old.0) / 2.0;
		self.transform.y += (new.1 - old.1) / 2.0;
	}

	/// Topmost node under a screen point. Small nodes stay grabbable when
	/// zoomed out.
	pub fn node_at(&self, model: &GraphModel, sx: f64, sy: f64) -> Option<NodeIdx> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let min_radius = self.config.min_hit_radius / self.transform.k;
		model
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| {
				let r = n.style.radius.max(min_radius);
				(n.x - gx).powi(2) + (n.y - gy).powi(2) <= r * r
			})
			.map(|(i, _)| NodeIdx(i))
	}

	// ----- Drag protocol, in graph coordinates -----

	/// Pin `node` where it is and reheat the simulation. Ignored while
	/// another gesture is active.
	pub fn drag_start(&mut self, node: NodeIdx, model: &mut GraphModel, sim: &mut Simulation) -> bool {
		if self.is_active() {
			return false;
		}
		let Some(n) = model.node_mut(node) else {
			return false;
		};
		n.pin = Some((n.x, n.y));
		let node_start = (n.x, n.y);

		let reheat = self.config.reheat;
		sim.set_alpha_target(reheat);
		if sim.is_at_rest() || sim.alpha() < reheat {
			sim.restart(reheat);
		}
		debug!("interaction: drag start on node {}", node.0);

		self.gesture = Gesture::Dragging {
			node,
			pointer_start: node_start,
			node_start,
			screen_start: self.transform.graph_to_screen(node_start.0, node_start.1),
			moved: false,
		};
		true
	}

	/// Move the dragged node's pin to `(gx, gy)`, clamped to the viewport
	/// rectangle. Non-finite coordinates are ignored.
	pub fn drag_move(&mut self, gx: f64, gy: f64, model: &mut GraphModel) -> bool {
		let Gesture::Dragging { node, .. } = self.gesture else {
			return false;
		};
		if !(gx.is_finite() && gy.is_finite()) {
			return false;
		}
		let (x, y) = self.config.viewport.clamp(gx, gy);
		match model.node_mut(node) {
			Some(n) => {
				n.pin = Some((x, y));
				n.x = x;
				n.y = y;
				true
			}
			None => false,
		}
	}

	/// Release the dragged node and let the simulation cool down. Returns the
	/// node if the press never moved beyond the click slop.
	pub fn drag_end(&mut self, model: &mut GraphModel, sim: &mut Simulation) -> Option<NodeIdx> {
		let Gesture::Dragging { node, moved, .. } = self.gesture else {
			return None;
		};
		self.gesture = Gesture::Idle;
		if let Some(n) = model.node_mut(node) {
			n.pin = None;
		}
		sim.set_alpha_target(0.0);
		debug!("interaction: drag end on node {}", node.0);
		(!moved).then_some(node)
	}

	// ----- Screen-space pointer handling -----

	/// Press: grab `hit` if a node is under the pointer, otherwise start panning.
	pub fn pointer_down(
		&mut self,
		sx: f64,
		sy: f64,
		hit: Option<NodeIdx>,
		model: &mut GraphModel,
		sim: &mut Simulation,
	) -> bool {
		if self.is_active() || !(sx.is_finite() && sy.is_finite()) {
			return false;
		}
		match hit {
			Some(node) => {
				if !self.drag_start(node, model, sim) {
					return false;
				}
				if let Gesture::Dragging {
					pointer_start,
					screen_start,
					..
				} = &mut self.gesture
				{
					*pointer_start = self.transform.screen_to_graph(sx, sy);
					*screen_start = (sx, sy);
				}
				true
			}
			None => {
				self.gesture = Gesture::Panning {
					screen_start: (sx, sy),
					transform_start: (self.transform.x, self.transform.y),
					moved: false,
				};
				true
			}
		}
	}

	/// Pointer motion. Returns whether anything visible changed.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, model: &mut GraphModel) -> bool {
		if !(sx.is_finite() && sy.is_finite()) {
			return false;
		}
		let slop = self.config.click_slop;
		let exceeds = |start: (f64, f64)| (sx - start.0).hypot(sy - start.1) > slop;

		match &mut self.gesture {
			Gesture::Idle => false,
			Gesture::Dragging {
				pointer_start,
				node_start,
				screen_start,
				moved,
				..
			} => {
				*moved |= exceeds(*screen_start);
				let (px, py) = self.transform.screen_to_graph(sx, sy);
				let target = (
					node_start.0 + px - pointer_start.0,
					node_start.1 + py - pointer_start.1,
				);
				self.drag_move(target.0, target.1, model)
			}
			Gesture::Panning {
				screen_start,
				transform_start,
				moved,
			} => {
				*moved |= exceeds(*screen_start);
				self.transform.x = transform_start.0 + (sx - screen_start.0);
				self.transform.y = transform_start.1 + (sy - screen_start.1);
				true
			}
		}
	}

	/// Release. Returns the node to activate for a click without movement.
	pub fn pointer_up(&mut self, model: &mut GraphModel, sim: &mut Simulation) -> Option<NodeIdx> {
		match self.gesture {
			Gesture::Dragging { .. } => self.drag_end(model, sim),
			Gesture::Panning { .. } => {
				self.gesture = Gesture::Idle;
				None
			}
			Gesture::Idle => None,
		}
	}

	/// Abort any gesture without activating anything.
	pub fn cancel(&mut self, model: &mut GraphModel, sim: &mut Simulation) {
		let _ = self.drag_end(model, sim);
		self.gesture = Gesture::Idle;
	}

	// ----- Zoom -----

	fn zoom(&mut self, factor: f64, ax: f64, ay: f64) -> bool {
		let before = self.transform;
		self.transform
			.zoom_at(factor, ax, ay, self.config.min_zoom, self.config.max_zoom);
		self.transform != before
	}

	/// Wheel zoom; plain scrolling is left to the page.
	pub fn wheel(&mut self, input: &WheelInput) -> bool {
		input.is_zoom() && self.zoom(input.zoom_factor(), input.x, input.y)
	}

	/// Pinch zoom by the ratio of finger distances.
	pub fn pinch(&mut self, factor: f64, cx: f64, cy: f64) -> bool {
		self.zoom(factor, cx, cy)
	}

	/// Double click zooms in, or out with shift held.
	pub fn double_click(&mut self, sx: f64, sy: f64, shift: bool) -> bool {
		let factor = if shift {
			1.0 / self.config.double_click_zoom
		} else {
			self.config.double_click_zoom
		};
		self.zoom(factor, sx, sy)
	}
}
