//! Force simulation engine.
//!
//! A cooling schedule drives the layout: every step moves `alpha` a fixed
//! fraction toward `alpha_target`, scales all forces by it, and integrates
//! node velocities with damping. Once alpha falls below `alpha_min` the
//! engine rests and [`Simulation::step`] does nothing until reheated.

use log::debug;

use super::config::SimulationConfig;
use super::forces::{CenterForce, CollideForce, Force, Jiggle, LinkForce, ManyBodyForce};
use super::model::{GraphModel, Node, initial_position};

/// Cooling force simulation over a [`GraphModel`].
pub struct Simulation {
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	forces: Vec<Box<dyn Force>>,
	jiggle: Jiggle,
}

impl Simulation {
	/// Engine with the standard link, many-body, collision and centering forces.
	pub fn new(model: &GraphModel, config: &SimulationConfig) -> Self {
		let mut sim = Self::without_forces(config);
		sim.add_force(LinkForce::new(model, config.link_distance));
		sim.add_force(ManyBodyForce::new(
			config.charge,
			config.theta,
			config.distance_min,
			config.distance_max,
		));
		sim.add_force(CollideForce::new(
			model,
			config.collision_padding,
			config.collision_strength,
		));
		sim.add_force(CenterForce::new(config.center_strength));
		sim
	}

	/// Engine with the configured cooling schedule and no forces.
	pub fn without_forces(config: &SimulationConfig) -> Self {
		Self {
			alpha: config.alpha,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay.clamp(0.0, 1.0),
			alpha_target: 0.0,
			velocity_decay: config.velocity_decay.clamp(0.0, 1.0),
			forces: Vec::new(),
			jiggle: Jiggle::new(config.seed),
		}
	}

	/// Append a force; forces run in insertion order.
	pub fn add_force(&mut self, force: impl Force + 'static) {
		self.forces.push(Box::new(force));
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy alpha is relaxing toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Whether alpha has dropped below `alpha_min`.
	pub fn is_at_rest(&self) -> bool {
		self.alpha < self.alpha_min
	}

	/// Reheat to `energy` and resume stepping. Energies below `alpha_min`
	/// are raised to it, so the engine always takes at least one more step.
	pub fn restart(&mut self, energy: f64) {
		if !energy.is_finite() {
			return;
		}
		let energy = energy.max(self.alpha_min);
		if self.is_at_rest() {
			debug!("simulation: resuming at alpha {energy}");
		}
		self.alpha = energy;
	}

	/// Value alpha relaxes toward. Non-zero keeps the layout live.
	pub fn set_alpha_target(&mut self, target: f64) {
		if target.is_finite() {
			self.alpha_target = target.max(0.0);
		}
	}

	/// Advance one increment. Returns `false` without touching the model
	/// when the engine is at rest.
	pub fn step(&mut self, model: &mut GraphModel) -> bool {
		if self.is_at_rest() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		let nodes = model.nodes_mut();
		sanitize(nodes);
		for force in &mut self.forces {
			force.apply(nodes, self.alpha, &mut self.jiggle);
		}

		let keep = 1.0 - self.velocity_decay;
		for node in nodes.iter_mut() {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
		// A runaway force can still overflow; never hand that to the renderer.
		sanitize(nodes);

		if self.is_at_rest() {
			debug!("simulation: at rest");
		}
		true
	}

	/// Run up to `n` steps. Returns how many actually advanced.
	pub fn tick(&mut self, model: &mut GraphModel, n: usize) -> usize {
		(0..n).take_while(|_| self.step(model)).count()
	}

	/// Step until rest or `max_steps`. Returns the number of steps taken.
	pub fn run_to_rest(&mut self, model: &mut GraphModel, max_steps: usize) -> usize {
		self.tick(model, max_steps)
	}
}

/// Re-seed non-finite positions and zero non-finite velocities.
fn sanitize(nodes: &mut [Node]) {
	for (i, node) in nodes.iter_mut().enumerate() {
		if !(node.x.is_finite() && node.y.is_finite()) {
			(node.x, node.y) = node.pin.unwrap_or_else(|| initial_position(i));
		}
		if !(node.vx.is_finite() && node.vy.is_finite()) {
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}
