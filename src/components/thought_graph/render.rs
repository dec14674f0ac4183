use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::ThoughtGraphState;

const BACKDROP: &str = "#1a1a2e";
const DIM_FILL: &str = "#191927";
const DIM_BORDER: &str = "#262636";
const LABEL_BG: &str = "rgba(12, 12, 30, 0.75)";
const GLOW_BLUR: f64 = 18.0;

pub fn render(state: &ThoughtGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKDROP);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut positions: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});

	draw_edges(state, ctx, &positions);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(
	state: &ThoughtGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let k = state.transform.k.max(0.2);

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.from), positions.get(&edge.to))
		else {
			continue;
		};

		ctx.set_stroke_style_str(edge.style.render_color());
		ctx.set_line_width(edge.style.render_width());
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}

	// labels in a second pass so no line crosses over text
	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.from), positions.get(&edge.to))
		else {
			continue;
		};
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		draw_edge_label(ctx, &edge.style.label, mx, my, k);
	}
}

/// White text over a dark semi-opaque pill, readable on any backdrop.
fn draw_edge_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, k: f64) {
	let font_px = 11.0 / k;
	ctx.set_font(&format!("{}px sans-serif", font_px));
	let text_w = ctx
		.measure_text(label)
		.map(|m| m.width())
		.unwrap_or(label.chars().count() as f64 * font_px * 0.6);
	let (pad_x, pad_y) = (5.0 / k, 3.0 / k);

	ctx.set_fill_style_str(LABEL_BG);
	ctx.fill_rect(
		x - text_w / 2.0 - pad_x,
		y - font_px / 2.0 - pad_y,
		text_w + 2.0 * pad_x,
		font_px + 2.0 * pad_y,
	);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.92)");
	let _ = ctx.fill_text(label, x - text_w / 2.0, y + font_px * 0.35);
}

fn draw_nodes(state: &ThoughtGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k.max(0.2);

	state.graph.visit_nodes(|node| {
		let style = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = style.size;

		let (fill, border) = if style.dimmed {
			(DIM_FILL, DIM_BORDER)
		} else {
			(style.colors.fill, style.colors.border)
		};

		if !style.dimmed {
			ctx.set_shadow_color(style.colors.glow);
			ctx.set_shadow_blur(GLOW_BLUR);
		}
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_color("transparent");

		ctx.set_stroke_style_str(border);
		ctx.set_line_width(2.0);
		ctx.stroke();

		let alpha = if style.dimmed { 0.35 } else { 0.9 };
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha));
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&style.label, x, y + radius + 14.0 / k);
		ctx.set_text_align("start");
	});
}
