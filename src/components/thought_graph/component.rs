use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::{NodeSummary, ThoughtGraphState};
use super::types::GraphDocument;

/// DOM id of the rendering surface, used by the PNG exporter.
pub const CANVAS_ELEMENT_ID: &str = "thought-graph-canvas";

/// A press that travels less than this before release counts as a click.
const CLICK_SLOP: f64 = 4.0;

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Canvas-backed view of the current document. Each new document drops
/// the previous surface state wholesale and builds a fresh one; only the
/// animation-frame loop survives across documents.
#[component]
pub fn ThoughtGraphCanvas(
	#[prop(into)] document: Signal<Option<GraphDocument>>,
	on_select: WriteSignal<Option<NodeSummary>>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ThoughtGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let loop_started = Rc::new(Cell::new(false));

	let (state_init, animate_init, loop_init) =
		(state.clone(), animate.clone(), loop_started.clone());
	Effect::new(move |_| {
		let Some(doc) = document.get() else {
			return;
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let w = width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		});
		let h = height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		});
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		info!(
			"rebuilding graph surface: {} nodes, {} edges",
			doc.nodes.len(),
			doc.edges.len()
		);
		*state_init.borrow_mut() = Some(ThoughtGraphState::new(&doc, w, h));
		on_select.set(None);

		if loop_init.get() {
			return;
		}
		loop_init.set(true);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(1.0 / 60.0);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = web_sys::window()
				.unwrap()
				.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				let (nx, ny) = s.node_position(idx).unwrap_or_default();
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.node_start_x = nx as f32;
				s.drag.node_start_y = ny as f32;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
					if dx.hypot(dy) > CLICK_SLOP {
						s.drag.moved = true;
					}
					if s.drag.moved {
						let k = s.transform.k;
						let (nx, ny) = (
							s.drag.node_start_x + (dx / k) as f32,
							s.drag.node_start_y + (dy / k) as f32,
						);
						s.set_node_position(idx, nx, ny);
					}
				}
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
				let cursor = if s.hovered().is_some() { "pointer" } else { "default" };
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				let (idx, moved) = (s.drag.node_idx, s.drag.moved);
				s.drag = Default::default();
				if let Some(idx) = idx {
					if moved {
						// keep dropped nodes reachable: the view can't pan or zoom
						s.clamp_into_view(idx);
					} else {
						let summary = s.select(idx);
						on_select.set(Some(summary));
					}
				}
			} else if s.selected.is_some() {
				s.clear_selection();
				on_select.set(None);
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag = Default::default();
			s.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			id=CANVAS_ELEMENT_ID
			class="thought-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: default;"
		/>
	}
}
