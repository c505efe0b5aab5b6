//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and translates mouse, wheel
//! and touch events into [`GraphEvent`]s. An animation loop runs via
//! `requestAnimationFrame`, stepping the simulation and redrawing whenever
//! something changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::interaction::WheelInput;
use super::render;
use super::state::{ForceGraphState, GraphEvent, Request};
use super::types::GraphData;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

/// Apply `event` and carry out whatever the graph asks for.
fn dispatch(state: &SharedState, event: GraphEvent) {
	let requests = match *state.borrow_mut() {
		Some(ref mut s) => s.dispatch(event),
		None => return,
	};
	let Some(window) = web_sys::window() else {
		return;
	};
	for request in requests {
		match request {
			Request::OpenLink(url) => {
				if window.open_with_url_and_target(&url, "_blank").is_err() {
					error!("graph: could not open {url}");
				}
			}
		}
	}
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Client coordinates relative to the canvas' top-left corner.
fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Positions of the first two touches, if present.
fn touch_points(canvas: &HtmlCanvasElement, ev: &TouchEvent) -> Vec<(f64, f64)> {
	let touches = ev.touches();
	(0..touches.length().min(2))
		.filter_map(|i| touches.get(i))
		.map(|t| local_point(canvas, t.client_x(), t.client_y()))
		.collect()
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing. A graph that fails validation is logged and
/// never drawn.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = GraphConfig::default())] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("graph: canvas has no 2d context");
			return;
		};

		match ForceGraphState::new(&data.get(), w, h, config.clone()) {
			Ok(state) => *context_init.borrow_mut() = Some(state),
			Err(e) => {
				error!("graph: {e}");
				return;
			}
		}

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				dispatch(&context_resize, GraphEvent::Resize { width: nw, height: nh });
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			dispatch(&context_anim, GraphEvent::Frame);
			if let Some(ref mut s) = *context_anim.borrow_mut() {
				if s.take_redraw() {
					render::render(s, &ctx);
				}
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pointer = move |client_x: i32, client_y: i32| {
		canvas_ref.get().map(|c| {
			let canvas: HtmlCanvasElement = c.into();
			local_point(&canvas, client_x, client_y)
		})
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(ev.client_x(), ev.client_y()) {
			dispatch(&context_md, GraphEvent::PointerDown { x, y });
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(ev.client_x(), ev.client_y()) {
			dispatch(&context_mm, GraphEvent::PointerMove { x, y });
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| dispatch(&context_mu, GraphEvent::PointerUp);

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| dispatch(&context_ml, GraphEvent::PointerLeave);

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(ev.client_x(), ev.client_y()) {
			let shift = ev.shift_key();
			dispatch(&context_dc, GraphEvent::DoubleClick { x, y, shift });
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some((x, y)) = pointer(ev.client_x(), ev.client_y()) else {
			return;
		};
		let input = WheelInput {
			x,
			y,
			delta_y: ev.delta_y(),
			delta_mode: ev.delta_mode(),
			ctrl: ev.ctrl_key(),
			meta: ev.meta_key(),
		};
		// Plain scrolling belongs to the page.
		if input.is_zoom() {
			ev.prevent_default();
			dispatch(&context_wh, GraphEvent::Wheel(input));
		}
	};

	// Distance between the two fingers of an active pinch.
	let pinch: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));

	let (context_ts, pinch_ts) = (context.clone(), pinch.clone());
	let on_touchstart = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		ev.prevent_default();
		match touch_points(&canvas, &ev)[..] {
			[(x, y)] => dispatch(&context_ts, GraphEvent::PointerDown { x, y }),
			[a, b] => {
				// A second finger turns the gesture into a pinch.
				dispatch(&context_ts, GraphEvent::PointerLeave);
				pinch_ts.set(Some((a.0 - b.0).hypot(a.1 - b.1)));
			}
			_ => {}
		}
	};

	let (context_tm, pinch_tm) = (context.clone(), pinch.clone());
	let on_touchmove = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		ev.prevent_default();
		match touch_points(&canvas, &ev)[..] {
			[(x, y)] => dispatch(&context_tm, GraphEvent::PointerMove { x, y }),
			[a, b] => {
				let distance = (a.0 - b.0).hypot(a.1 - b.1);
				if let Some(last) = pinch_tm.get().filter(|d| *d > 0.0) {
					let (x, y) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
					dispatch(&context_tm, GraphEvent::Pinch { factor: distance / last, x, y });
				}
				pinch_tm.set(Some(distance));
			}
			_ => {}
		}
	};

	let (context_te, pinch_te) = (context.clone(), pinch);
	let on_touchend = move |ev: TouchEvent| {
		if ev.touches().length() < 2 {
			pinch_te.set(None);
		}
		if ev.touches().length() == 0 {
			dispatch(&context_te, GraphEvent::PointerUp);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
