//! Canvas rendering for the force graph.
//!
//! Draws in three world-space passes under the view transform so later
//! elements sit on top:
//! 1. Links as straight lines
//! 2. Nodes as filled, stroked circles
//! 3. Labels centered above their node

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::focus::{LabelVisual, LinkVisual, NodeVisual};
use super::model::Node;
use super::state::ForceGraphState;

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let transform = state.transform();
	let overlay = state.overlay();
	let nodes = state.model.nodes();

	ctx.set_fill_style_str(&state.theme.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	for (link, visual) in state.model.links().iter().zip(&overlay.links) {
		draw_link(ctx, &nodes[link.source.0], &nodes[link.target.0], visual);
	}
	ctx.set_global_alpha(1.0);

	for (node, visual) in nodes.iter().zip(&overlay.nodes) {
		draw_node(ctx, node, visual);
	}

	ctx.set_text_align("center");
	for (node, visual) in nodes.iter().zip(&overlay.labels) {
		draw_label(ctx, node, visual, &state.theme.font_family);
	}

	ctx.restore();
}

fn draw_link(ctx: &CanvasRenderingContext2d, source: &Node, target: &Node, visual: &LinkVisual) {
	ctx.set_global_alpha(visual.opacity);
	ctx.set_stroke_style_str(visual.stroke);
	ctx.set_line_width(visual.stroke_width);
	ctx.begin_path();
	ctx.move_to(source.x, source.y);
	ctx.line_to(target.x, target.y);
	ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &Node, visual: &NodeVisual) {
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.style.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(visual.fill);
	ctx.fill();

	if visual.stroke_width > 0.0 {
		ctx.set_stroke_style_str(visual.stroke);
		ctx.set_line_width(visual.stroke_width);
		ctx.stroke();
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, node: &Node, visual: &LabelVisual, family: &str) {
	if node.title.is_empty() {
		return;
	}
	let style = &node.style;
	ctx.set_font(&format!(
		"{} {}px {}",
		style.font_weight, style.font_size, family
	));
	ctx.set_fill_style_str(visual.color);
	let _ = ctx.fill_text(&node.title, node.x, node.y + style.label_offset);
}
