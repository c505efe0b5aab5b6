//! Force-directed graph visualization component.
//!
//! Renders an interactive node-link diagram on an HTML canvas with:
//! - A force simulation (links, many-body repulsion, collision, centering)
//! - Node dragging with live re-layout, pan and clamped zoom
//! - Hover focus that emphasizes a node and its neighbors and dims the rest
//! - Per-node styles resolved against configurable defaults
//!
//! The simulation, interaction and focus logic is plain Rust driven through
//! [`ForceGraphState::dispatch`]; only the canvas component and renderer touch the
//! DOM.
//!
//! # Example
//!
//! ```ignore
//! use initiative_map::{ForceGraphCanvas, GraphData};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [{ "id": "a", "title": "A" }, { "id": "b", "title": "B" }],
//!     "links": [{ "source": "a", "target": "b" }]
//! }"#)?;
//!
//! view! { <ForceGraphCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
pub mod config;
mod error;
pub mod focus;
mod forces;
pub mod interaction;
pub mod model;
mod quadtree;
mod render;
pub mod simulation;
mod state;
#[cfg(test)]
mod testing;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use config::{GraphConfig, InteractionConfig, SimulationConfig, ViewportBounds};
pub use error::{GraphError, LinkEnd};
pub use forces::{CenterForce, CollideForce, Force, Jiggle, LinkForce, ManyBodyForce};
pub use state::{ForceGraphState, GraphEvent, Request};
pub use theme::Theme;
pub use types::{FontSize, GraphData, GraphLink, GraphNode, NodeStyle};
