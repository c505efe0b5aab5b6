//! initiative-map: Interactive force-directed map of initiatives and the
//! organizations behind them.
//!
//! This crate provides a WASM-based graph visualization component that lays
//! out entities with a force simulation and supports dragging, pan/zoom and
//! hover focus.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, ForceGraphState, GraphConfig, GraphData, GraphError, GraphEvent, GraphLink,
	GraphNode, Request,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("initiative-map: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Result<String, GraphError> {
	let missing = || GraphError::Missing(format!("no <script id=\"{id}\"> element"));
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(missing)?;
	let script: HtmlScriptElement = document
		.get_element_by_id(id)
		.ok_or_else(missing)?
		.dyn_into()
		.map_err(|_| missing())?;
	script.text().map_err(|_| missing())
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
pub fn load_graph_data() -> Result<GraphData, GraphError> {
	let data = GraphData::from_json(&script_text("graph-data")?)?;
	info!(
		"initiative-map: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

/// Load optional overrides from a script element with id="graph-config".
/// A missing element means defaults; an invalid one is reported and ignored.
pub fn load_graph_config() -> GraphConfig {
	let Ok(text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("initiative-map: ignoring graph config: {e}");
		GraphConfig::default()
	})
}

/// Main application component.
/// Loads graph data from DOM and renders the force-directed visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph = match load_graph_data() {
		Ok(data) => {
			let graph_signal = Signal::derive(move || data.clone());
			let config = load_graph_config();
			Some(view! { <ForceGraphCanvas data=graph_signal config=config fullscreen=true /> })
		}
		Err(e) => {
			error!("initiative-map: {e}");
			None
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Initiative Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{graph}
			<div class="graph-overlay">
				<h1>"Initiative Map"</h1>
				<p class="subtitle">
					"Hover to highlight connections. Drag nodes to rearrange. Ctrl+scroll or pinch to zoom. Click a node to open its page."
				</p>
			</div>
		</div>
	}
}
