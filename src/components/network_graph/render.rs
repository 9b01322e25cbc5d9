use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_RADIUS, NetworkState};

const BACKGROUND: &str = "#f4f4f8";
const LABEL_RGB: &str = "43, 45, 58";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap) = (2.0 / k, 6.0 / k, 4.0 / k);
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	state.graph.visit_edges(|n1, n2, edge| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let is_highlighted =
			has_highlight && state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());

		// t=0: every edge at base, t=1: highlighted edges at full strength, others faded
		let (alpha, width) = if is_highlighted {
			(0.85 + 0.15 * t, line_width * (1.0 + 0.4 * t))
		} else {
			(0.85 - 0.65 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&edge.user_data.color);
		ctx.set_line_width(width);
		let pattern = if edge.user_data.dashed {
			js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap))
		} else {
			js_sys::Array::new()
		};
		let _ = ctx.set_line_dash(&pattern);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		ctx.stroke();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
}

fn fill_node(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str, shadow: bool) {
	if shadow {
		ctx.set_shadow_color("rgba(0, 0, 0, 0.35)");
		ctx.set_shadow_blur(6.0);
		ctx.set_shadow_offset_x(1.5);
		ctx.set_shadow_offset_y(1.5);
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	if shadow {
		ctx.set_shadow_color("transparent");
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_x(0.0);
		ctx.set_shadow_offset_y(0.0);
	}
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		fill_node(ctx, x, y, radius, &info.color, info.shadow);
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba({LABEL_RGB}, {})", alpha * 0.85));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);

		let (radius, glow_radius) = if is_hovered {
			(
				NODE_RADIUS * (1.0 + 0.35 * t),
				NODE_RADIUS * (1.8 + 1.2 * t),
			)
		} else {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(96, 100, 130, {})", alpha));
				let _ = gradient.add_color_stop(1.0, "rgba(96, 100, 130, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		fill_node(ctx, x, y, radius, &info.color, info.shadow);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba({LABEL_RGB}, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgb({LABEL_RGB})"));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
	});
}

/// Draws the hovered node's label box in screen space.
fn draw_tooltip(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let Some(tip) = state.tooltip() else {
		return;
	};
	let (sx, sy) = state.graph_to_screen(tip.x, tip.y);
	let links = match tip.links {
		1 => "1 significant link".to_string(),
		n => format!("{n} significant links"),
	};

	ctx.set_font("12px sans-serif");
	let width = [&tip.label, &links]
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max)
		+ 16.0;
	let (bx, by) = (
		(sx + 14.0).min(state.width - width - 4.0).max(4.0),
		(sy - 46.0).max(4.0),
	);

	ctx.set_global_alpha(0.95);
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(bx, by, width, 40.0);
	ctx.set_stroke_style_str("#b0b2c1");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, width, 40.0);
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str(&format!("rgb({LABEL_RGB})"));
	let _ = ctx.fill_text(&tip.label, bx + 8.0, by + 16.0);
	ctx.set_fill_style_str("#606482");
	let _ = ctx.fill_text(&links, bx + 8.0, by + 32.0);
}
