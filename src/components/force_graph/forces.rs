//! Force rules applied by the simulation on every step.
//!
//! Each force adds a velocity delta to nodes; integration happens afterwards
//! in [`Simulation::step`](super::simulation::Simulation::step).

use super::model::{GraphModel, Link, Node, NodeIdx};
use super::quadtree::QuadTree;

/// Seeded linear congruential generator used to break exact ties.
#[derive(Clone, Debug)]
pub struct Jiggle {
	state: u32,
}

impl Jiggle {
	/// Generator starting from `seed`.
	pub fn new(seed: u32) -> Self {
		Self { state: seed }
	}

	fn next_unit(&mut self) -> f64 {
		self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.state as f64 / 4_294_967_296.0
	}

	/// An offset in `[-5e-7, 5e-7)`, used in place of an exact zero distance.
	pub fn next(&mut self) -> f64 {
		(self.next_unit() - 0.5) * 1e-6
	}

	/// `v` unchanged unless it is exactly zero.
	fn or_jiggle(&mut self, v: f64) -> f64 {
		if v == 0.0 { self.next() } else { v }
	}
}

/// A composable force rule.
pub trait Force {
	/// Add this force's contribution to node velocities for one step.
	fn apply(&mut self, nodes: &mut [Node], alpha: f64, jiggle: &mut Jiggle);
}

/// Spring force pulling linked nodes toward a target distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	links: Vec<Link>,
	distance: f64,
	/// Per-link stiffness, `1 / min(degree)` of the endpoints.
	strengths: Vec<f64>,
	/// Share of the correction taken by the target end.
	bias: Vec<f64>,
}

impl LinkForce {
	/// Springs for every link of `model` with rest length `distance`.
	pub fn new(model: &GraphModel, distance: f64) -> Self {
		let links = model.links().to_vec();
		let degree: Vec<f64> = (0..model.len())
			.map(|i| model.degree(NodeIdx(i)) as f64)
			.collect();

		let strengths = links
			.iter()
			.map(|l| 1.0 / degree[l.source.0].min(degree[l.target.0]).max(1.0))
			.collect();
		let bias = links
			.iter()
			.map(|l| {
				let (s, t) = (degree[l.source.0], degree[l.target.0]);
				if s + t > 0.0 { s / (s + t) } else { 0.5 }
			})
			.collect();

		Self {
			links,
			distance,
			strengths,
			bias,
		}
	}
}

impl Force for LinkForce {
	fn apply(&mut self, nodes: &mut [Node], alpha: f64, jiggle: &mut Jiggle) {
		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (link.source.0, link.target.0);
			let x = jiggle.or_jiggle(nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx);
			let y = jiggle.or_jiggle(nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy);
			let l = (x * x + y * y).sqrt();
			let l = (l - self.distance) / l * alpha * self.strengths[i];
			let (x, y) = (x * l, y * l);

			let b = self.bias[i];
			nodes[t].vx -= x * b;
			nodes[t].vy -= y * b;
			nodes[s].vx += x * (1.0 - b);
			nodes[s].vy += y * (1.0 - b);
		}
	}
}

/// Mutual repulsion (or attraction, for positive strength) between all nodes,
/// approximated with a Barnes-Hut quadtree.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	strength: f64,
	theta2: f64,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBodyForce {
	/// Charge `strength` per node; `theta` is the Barnes-Hut opening angle.
	pub fn new(strength: f64, theta: f64, distance_min: f64, distance_max: Option<f64>) -> Self {
		Self {
			strength,
			theta2: theta * theta,
			distance_min2: distance_min * distance_min,
			distance_max2: distance_max.map_or(f64::INFINITY, |d| d * d),
		}
	}
}

impl Force for ManyBodyForce {
	fn apply(&mut self, nodes: &mut [Node], alpha: f64, jiggle: &mut Jiggle) {
		let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
		let mut tree = QuadTree::build(&points);
		tree.accumulate_weights(&points, &vec![self.strength; points.len()]);
		let Self {
			theta2,
			distance_min2,
			distance_max2,
			strength,
		} = *self;

		for (i, node) in nodes.iter_mut().enumerate() {
			let (xi, yi) = points[i];
			tree.visit(|quad| {
				if quad.value == 0.0 {
					return true;
				}
				let (mut x, mut y) = (quad.cx - xi, quad.cy - yi);
				let mut l = x * x + y * y;
				let w = quad.width();

				let holds_self = quad.is_leaf() && quad.points.contains(&i);
				if !holds_self && w * w / theta2 < l {
					if l < distance_max2 {
						if x == 0.0 {
							x = jiggle.next();
							l += x * x;
						}
						if y == 0.0 {
							y = jiggle.next();
							l += y * y;
						}
						if l < distance_min2 {
							l = (distance_min2 * l).sqrt();
						}
						node.vx += x * quad.value * alpha / l;
						node.vy += y * quad.value * alpha / l;
					}
					return true;
				}
				if !quad.is_leaf() {
					return false;
				}

				for &j in quad.points.iter().filter(|&&j| j != i) {
					let x = jiggle.or_jiggle(points[j].0 - xi);
					let y = jiggle.or_jiggle(points[j].1 - yi);
					let mut l = x * x + y * y;
					if l >= distance_max2 {
						continue;
					}
					if l < distance_min2 {
						l = (distance_min2 * l).sqrt();
					}
					let w = strength * alpha / l;
					node.vx += x * w;
					node.vy += y * w;
				}
				true
			});
		}
	}
}

/// Pushes apart nodes whose circles (radius plus padding) overlap.
#[derive(Clone, Debug)]
pub struct CollideForce {
	radii: Vec<f64>,
	strength: f64,
}

impl CollideForce {
	/// Collision radius of each node is its style radius plus `padding`.
	pub fn new(model: &GraphModel, padding: f64, strength: f64) -> Self {
		Self {
			radii: model
				.nodes()
				.iter()
				.map(|n| n.style.radius + padding)
				.collect(),
			strength,
		}
	}
}

impl Force for CollideForce {
	fn apply(&mut self, nodes: &mut [Node], _alpha: f64, jiggle: &mut Jiggle) {
		let predicted: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x + n.vx, n.y + n.vy)).collect();
		let mut tree = QuadTree::build(&predicted);
		tree.accumulate_radii(&self.radii);
		let radii = &self.radii;
		let strength = self.strength;

		for i in 0..nodes.len() {
			let ri = radii[i];
			let ri2 = ri * ri;
			let (xi, yi) = predicted[i];

			tree.visit(|quad| {
				if quad.is_leaf() {
					for &j in quad.points.iter().filter(|&&j| j > i) {
						let rj = radii[j];
						let r = ri + rj;
						let mut x = xi - nodes[j].x - nodes[j].vx;
						let mut y = yi - nodes[j].y - nodes[j].vy;
						let mut l = x * x + y * y;
						if l >= r * r {
							continue;
						}
						if x == 0.0 {
							x = jiggle.next();
							l += x * x;
						}
						if y == 0.0 {
							y = jiggle.next();
							l += y * y;
						}
						let d = l.sqrt();
						let k = (r - d) / d * strength;
						let (x, y) = (x * k, y * k);
						let rj2 = rj * rj;
						let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };

						nodes[i].vx += x * share;
						nodes[i].vy += y * share;
						nodes[j].vx -= x * (1.0 - share);
						nodes[j].vy -= y * (1.0 - share);
					}
					return true;
				}
				let r = quad.r + ri;
				quad.x0 > xi + r || quad.x1 < xi - r || quad.y0 > yi + r || quad.y1 < yi - r
			});
		}
	}
}

/// Independent pull of x and y toward the origin.
#[derive(Clone, Debug)]
pub struct CenterForce {
	strength: f64,
}

impl CenterForce {
	/// Pull of `strength` per step, scaled by alpha.
	pub fn new(strength: f64) -> Self {
		Self { strength }
	}
}

impl Force for CenterForce {
	fn apply(&mut self, nodes: &mut [Node], alpha: f64, _jiggle: &mut Jiggle) {
		for node in nodes {
			node.vx += (0.0 - node.x) * self.strength * alpha;
			node.vy += (0.0 - node.y) * self.strength * alpha;
		}
	}
}
