//! Tunable parameters for the simulation, interaction and theme.
//!
//! Every struct deserializes with `#[serde(default)]`, so a page can override
//! any subset of fields and keep the documented defaults for the rest.

use serde::Deserialize;

use super::error::GraphError;
use super::theme::Theme;

/// Force and cooling parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
	/// Target separation of linked nodes (300).
	pub link_distance: f64,
	/// Many-body strength; negative repels (-3000).
	pub charge: f64,
	/// Barnes-Hut opening angle (0.9). Zero computes every pair exactly.
	pub theta: f64,
	/// Distances below this are softened in the many-body force (1).
	pub distance_min: f64,
	/// Pairs further apart than this ignore each other. Unbounded if unset.
	pub distance_max: Option<f64>,
	/// Extra spacing added to every node's radius for collisions (10).
	pub collision_padding: f64,
	/// Fraction of an overlap resolved per step (1).
	pub collision_strength: f64,
	/// Pull of every node toward the origin, per axis (0.05).
	pub center_strength: f64,
	/// Starting energy (1).
	pub alpha: f64,
	/// Energy below which the simulation rests (0.001).
	pub alpha_min: f64,
	/// Fraction of the gap to the alpha target closed per step.
	/// Defaults to `1 - 0.001^(1/300)`, reaching rest in about 300 steps.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per step (0.4).
	pub velocity_decay: f64,
	/// Seed of the jitter generator used to separate coincident nodes.
	pub seed: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 300.0,
			charge: -3000.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			collision_padding: 10.0,
			collision_strength: 1.0,
			center_strength: 0.05,
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			seed: 1,
		}
	}
}

/// Rectangle centered on the origin that dragged nodes are clamped to.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportBounds {
	/// Half the allowed width, in graph units.
	pub half_width: f64,
	/// Half the allowed height, in graph units.
	pub half_height: f64,
}

impl Default for ViewportBounds {
	fn default() -> Self {
		Self {
			half_width: 950.0,
			half_height: 810.0,
		}
	}
}

impl ViewportBounds {
	/// Nearest point of the rectangle to `(x, y)`.
	pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		(
			x.clamp(-self.half_width, self.half_width),
			y.clamp(-self.half_height, self.half_height),
		)
	}
}

/// Drag and zoom parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
	/// Energy the simulation is reheated to while a node is dragged (0.3).
	pub reheat: f64,
	/// Drag clamp rectangle (±950 × ±810).
	pub viewport: ViewportBounds,
	/// Smallest zoom scale (0.2).
	pub min_zoom: f64,
	/// Largest zoom scale (10).
	pub max_zoom: f64,
	/// Pointer travel in pixels below which a press counts as a click (3).
	pub click_slop: f64,
	/// Minimum on-screen hit radius of a node in pixels (5).
	pub min_hit_radius: f64,
	/// Zoom factor applied by a double click (2).
	pub double_click_zoom: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			reheat: 0.3,
			viewport: ViewportBounds::default(),
			min_zoom: 0.2,
			max_zoom: 10.0,
			click_slop: 3.0,
			min_hit_radius: 5.0,
			double_click_zoom: 2.0,
		}
	}
}

/// Everything the graph component can be tuned with.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
	/// Force and cooling parameters.
	pub simulation: SimulationConfig,
	/// Drag and zoom parameters.
	pub interaction: InteractionConfig,
	/// Colors, fonts and style defaults.
	pub theme: Theme,
}

impl GraphConfig {
	/// Parse a (possibly partial) JSON configuration and check its ranges.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		let config: Self = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values the simulation or the view transform cannot work with.
	pub fn validate(&self) -> Result<(), GraphError> {
		self.simulation.validate()?;
		self.interaction.validate()
	}
}

fn check(name: &str, value: f64, valid: bool) -> Result<(), GraphError> {
	if value.is_finite() && valid {
		Ok(())
	} else {
		Err(GraphError::InvalidConfig(format!("{name} = {value}")))
	}
}

impl SimulationConfig {
	fn validate(&self) -> Result<(), GraphError> {
		check("simulation.link_distance", self.link_distance, self.link_distance >= 0.0)?;
		check("simulation.charge", self.charge, true)?;
		check("simulation.theta", self.theta, self.theta >= 0.0)?;
		check("simulation.distance_min", self.distance_min, self.distance_min >= 0.0)?;
		if let Some(max) = self.distance_max {
			check("simulation.distance_max", max, max >= 0.0)?;
		}
		check("simulation.collision_padding", self.collision_padding, true)?;
		check("simulation.collision_strength", self.collision_strength, true)?;
		check("simulation.center_strength", self.center_strength, true)?;
		check("simulation.alpha", self.alpha, self.alpha >= 0.0)?;
		check("simulation.alpha_min", self.alpha_min, self.alpha_min >= 0.0)?;
		check("simulation.alpha_decay", self.alpha_decay, (0.0..=1.0).contains(&self.alpha_decay))?;
		check(
			"simulation.velocity_decay",
			self.velocity_decay,
			(0.0..=1.0).contains(&self.velocity_decay),
		)
	}
}

impl InteractionConfig {
	fn validate(&self) -> Result<(), GraphError> {
		check("interaction.reheat", self.reheat, self.reheat >= 0.0)?;
		let ViewportBounds {
			half_width,
			half_height,
		} = self.viewport;
		check("interaction.viewport.half_width", half_width, half_width >= 0.0)?;
		check("interaction.viewport.half_height", half_height, half_height >= 0.0)?;
		check("interaction.min_zoom", self.min_zoom, self.min_zoom > 0.0)?;
		check("interaction.max_zoom", self.max_zoom, self.max_zoom >= self.min_zoom)?;
		check("interaction.click_slop", self.click_slop, self.click_slop >= 0.0)?;
		check("interaction.min_hit_radius", self.min_hit_radius, self.min_hit_radius >= 0.0)?;
		check(
			"interaction.double_click_zoom",
			self.double_click_zoom,
			self.double_click_zoom > 0.0,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_documented_values() {
		let config = GraphConfig::default();

		assert_eq!(config.simulation.link_distance, 300.0);
		assert_eq!(config.simulation.charge, -3000.0);
		assert_eq!(config.simulation.center_strength, 0.05);
		assert!((config.simulation.alpha_decay - 0.0228).abs() < 1e-4);
		assert_eq!(config.interaction.reheat, 0.3);
		assert_eq!((config.interaction.min_zoom, config.interaction.max_zoom), (0.2, 10.0));
		assert_eq!(config.interaction.viewport.clamp(5000.0, -5000.0), (950.0, -810.0));
	}

	#[test]
	fn partial_override_keeps_the_rest() {
		let config = GraphConfig::from_json(
			r#"{ "simulation": { "charge": -500 }, "interaction": { "viewport": { "half_width": 100 } } }"#,
		)
		.unwrap();

		assert_eq!(config.simulation.charge, -500.0);
		assert_eq!(config.simulation.link_distance, 300.0);
		assert_eq!(config.interaction.viewport.half_width, 100.0);
		assert_eq!(config.interaction.viewport.half_height, 810.0);
	}

	#[test]
	fn out_of_range_overrides_are_rejected() {
		for json in [
			r#"{ "interaction": { "min_zoom": 5, "max_zoom": 1 } }"#,
			r#"{ "interaction": { "min_zoom": 0 } }"#,
			r#"{ "interaction": { "viewport": { "half_width": -10 } } }"#,
			r#"{ "interaction": { "double_click_zoom": -2 } }"#,
			r#"{ "simulation": { "velocity_decay": 1.5 } }"#,
			r#"{ "simulation": { "distance_max": -1 } }"#,
		] {
			assert!(
				matches!(GraphConfig::from_json(json), Err(GraphError::InvalidConfig(_))),
				"accepted {json}"
			);
		}
	}

	#[test]
	fn equal_zoom_bounds_are_allowed() {
		let config =
			GraphConfig::from_json(r#"{ "interaction": { "min_zoom": 2, "max_zoom": 2 } }"#).unwrap();
		assert_eq!(config.interaction.min_zoom, 2.0);
		assert!(GraphConfig::default().validate().is_ok());
	}

	#[test]
	fn unknown_shape_is_a_parse_error() {
		assert!(matches!(
			GraphConfig::from_json(r#"{ "simulation": { "charge": "strong" } }"#),
			Err(GraphError::Parse(_))
		));
	}
}
