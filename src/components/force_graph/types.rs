//! Graph description structures, deserialized once at startup.

use serde::{Deserialize, Deserializer};

use super::error::GraphError;

/// Optional per-node visual attributes.
///
/// Every field is optional; missing values are filled in by
/// [`resolve_style`](super::theme::resolve_style) from a single defaults table.
/// Colors and font weights are passed through to the renderer as CSS strings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct NodeStyle {
	/// Circle radius in world units.
	pub radius: Option<f64>,
	/// Fill color.
	pub color: Option<String>,
	/// Outline color.
	pub stroke_color: Option<String>,
	/// Outline width in world units.
	pub stroke_width: Option<f64>,
	/// Vertical label offset from the node center (negative is above).
	pub y_label: Option<f64>,
	/// Label font size, either a number of pixels or a CSS length like `"12px"`.
	pub font_size: Option<FontSize>,
	/// Label font weight (`"normal"`, `"bold"`, `"600"`, ...).
	pub font_weight: Option<String>,
	/// Label color.
	pub font_color: Option<String>,
	/// Label color while any node is focused. Data-specific override for nodes
	/// whose labels sit on dark fills.
	pub hover_font_color: Option<String>,
}

/// Font size as it appears in the description.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FontSize {
	/// Plain number of pixels.
	Px(f64),
	/// CSS length string. Only `px` and unitless values are understood.
	Css(String),
}

impl FontSize {
	/// Size in pixels, if it can be determined.
	pub fn px(&self) -> Option<f64> {
		let px = match self {
			FontSize::Px(v) => *v,
			FontSize::Css(s) => s.trim().trim_end_matches("px").trim().parse().ok()?,
		};
		(px.is_finite() && px > 0.0).then_some(px)
	}
}

/// A node in the graph description.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Links reference nodes by this value.
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	/// Display title, drawn as the node label.
	pub title: String,
	/// Visual overrides.
	#[serde(default)]
	pub style: Option<NodeStyle>,
	/// Address opened when the node is activated.
	#[serde(default, rename = "web_links", alias = "web_link")]
	pub web_link: Option<String>,
	/// Optional initial x position.
	#[serde(default)]
	pub x: Option<f64>,
	/// Optional initial y position.
	#[serde(default)]
	pub y: Option<f64>,
}

/// An undirected relationship between two nodes, by id.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	#[serde(deserialize_with = "string_or_number")]
	pub source: String,
	/// Target node ID.
	#[serde(deserialize_with = "string_or_number")]
	pub target: String,
}

/// Complete graph description: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Every node, in arena order.
	pub nodes: Vec<GraphNode>,
	/// Every link, in arena order.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse a JSON graph description.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Accept ids written either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Str(String),
		Int(i64),
		Float(f64),
	}

	Ok(match Id::deserialize(deserializer)? {
		Id::Str(s) => s,
		Id::Int(i) => i.to_string(),
		Id::Float(f) => f.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_published_data_shape() {
		let json = r##"{
			"nodes": [
				{ "id": "1", "title": "Org", "style": { "radius": 20, "color": "#f00", "font_size": "14px" },
				  "web_links": "https://example.org" },
				{ "id": 2, "title": "Initiative" }
			],
			"links": [ { "source": "1", "target": 2 } ]
		}"##;
		let data = GraphData::from_json(json).unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[1].id, "2");
		assert_eq!(data.links[0].target, "2");
		assert_eq!(data.nodes[0].web_link.as_deref(), Some("https://example.org"));
		let style = data.nodes[0].style.as_ref().unwrap();
		assert_eq!(style.radius, Some(20.0));
		assert_eq!(style.font_size.as_ref().and_then(FontSize::px), Some(14.0));
		assert!(data.nodes[1].style.is_none());
	}

	#[test]
	fn font_size_accepts_numbers_and_rejects_garbage() {
		assert_eq!(FontSize::Px(12.0).px(), Some(12.0));
		assert_eq!(FontSize::Css(" 9 px".into()).px(), Some(9.0));
		assert_eq!(FontSize::Css("large".into()).px(), None);
		assert_eq!(FontSize::Px(-1.0).px(), None);
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let err = GraphData::from_json("{ nodes: ").unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}

	#[test]
	fn missing_required_keys_are_parse_errors() {
		for json in [
			r#"{ "nodes": [{ "id": "a", "title": "A" }] }"#,
			r#"{ "links": [] }"#,
			r#"{ "nodes": [{ "id": "a" }], "links": [] }"#,
		] {
			assert!(
				matches!(GraphData::from_json(json), Err(GraphError::Parse(_))),
				"accepted {json}"
			);
		}
	}
}
