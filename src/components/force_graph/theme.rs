//! Visual defaults, style resolution and the focus palette.
//!
//! All colors are CSS strings passed straight through to the canvas. The only
//! place a missing per-node attribute is replaced by a default is
//! [`resolve_style`].

use serde::Deserialize;

use super::types::NodeStyle;

/// Default values for every per-node style attribute.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleDefaults {
	/// Node radius (10).
	/// Circle radius.
	pub radius: f64,
	/// Node fill (`#888`).
	pub color: String,
	/// Node outline (`#fff`).
	pub stroke_color: String,
	/// Node outline width (1.5).
	pub stroke_width: f64,
	/// Label offset from the node center (-12, i.e. above the node).
	pub y_label: f64,
	/// Label font size in pixels (10).
	pub font_size: f64,
	/// Label font weight (`normal`).
	pub font_weight: String,
	/// Label color (`black`).
	pub font_color: String,
}

impl Default for StyleDefaults {
	fn default() -> Self {
		Self {
			radius: 10.0,
			color: "#888".into(),
			stroke_color: "#fff".into(),
			stroke_width: 1.5,
			y_label: -12.0,
			font_size: 10.0,
			font_weight: "normal".into(),
			font_color: "black".into(),
		}
	}
}

/// A node style with every attribute filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
	/// Circle radius.
	pub radius: f64,
	/// Fill color.
	pub fill: String,
	/// Outline color.
	pub stroke: String,
	/// Outline width.
	pub stroke_width: f64,
	/// Vertical label offset from the node center.
	pub label_offset: f64,
	/// Label size in pixels.
	pub font_size: f64,
	/// Label weight.
	pub font_weight: String,
	/// Label color.
	pub font_color: String,
	/// Label color while focus is active, if the node overrides it.
	pub hover_font_color: Option<String>,
}

/// Map an optional per-node style record onto a fully populated style.
///
/// Non-finite or negative numeric overrides are treated as missing.
pub fn resolve_style(style: Option<&NodeStyle>, defaults: &StyleDefaults) -> ResolvedStyle {
	let empty = NodeStyle::default();
	let s = style.unwrap_or(&empty);
	let number = |v: Option<f64>, fallback: f64| v.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(fallback);

	ResolvedStyle {
		radius: number(s.radius, defaults.radius),
		fill: s.color.clone().unwrap_or_else(|| defaults.color.clone()),
		stroke: s
			.stroke_color
			.clone()
			.unwrap_or_else(|| defaults.stroke_color.clone()),
		stroke_width: number(s.stroke_width, defaults.stroke_width),
		label_offset: s
			.y_label
			.filter(|v| v.is_finite())
			.unwrap_or(defaults.y_label),
		font_size: s
			.font_size
			.as_ref()
			.and_then(|f| f.px())
			.unwrap_or(defaults.font_size),
		font_weight: s
			.font_weight
			.clone()
			.unwrap_or_else(|| defaults.font_weight.clone()),
		font_color: s
			.font_color
			.clone()
			.unwrap_or_else(|| defaults.font_color.clone()),
		hover_font_color: s.hover_font_color.clone(),
	}
}

/// Stroke attributes of a link.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkStyle {
	/// Line color.
	pub stroke: String,
	/// Line width.
	pub stroke_width: f64,
	/// Line opacity.
	pub opacity: f64,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			stroke: "#000".into(),
			stroke_width: 5.0,
			opacity: 0.2,
		}
	}
}

/// Colors applied while a node is focused.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FocusPalette {
	/// Fill of the focused node and its neighbors.
	pub emphasized_fill: String,
	/// Outline of the focused node and its neighbors.
	pub emphasized_stroke: String,
	/// Outline width of the focused node and its neighbors.
	pub emphasized_stroke_width: f64,
	/// Fill of unrelated nodes.
	pub dimmed_fill: String,
	/// Outline of unrelated nodes.
	pub dimmed_stroke: String,
	/// Outline width of unrelated nodes.
	pub dimmed_stroke_width: f64,
	/// Links incident to the focused node.
	pub emphasized_link: LinkStyle,
	/// All other links.
	pub dimmed_link: LinkStyle,
}

impl Default for FocusPalette {
	fn default() -> Self {
		Self {
			emphasized_fill: "#333".into(),
			emphasized_stroke: "#fff".into(),
			emphasized_stroke_width: 2.0,
			dimmed_fill: "lightgray".into(),
			dimmed_stroke: "lightgray".into(),
			dimmed_stroke_width: 1.0,
			emphasized_link: LinkStyle {
				stroke: "black".into(),
				stroke_width: 3.0,
				opacity: 1.0,
			},
			dimmed_link: LinkStyle {
				stroke: "#999".into(),
				stroke_width: 5.0,
				opacity: 0.2,
			},
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Theme {
	/// Canvas background.
	pub background: String,
	/// Label font family.
	pub font_family: String,
	/// Per-node fallbacks.
	pub node: StyleDefaults,
	/// Intrinsic link style.
	pub link: LinkStyle,
	/// Focus overlay colors.
	pub focus: FocusPalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: "#fff".into(),
			font_family: "sans-serif".into(),
			node: StyleDefaults::default(),
			link: LinkStyle::default(),
			focus: FocusPalette::default(),
		}
	}
}
