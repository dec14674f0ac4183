use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::palette::{self, CategoryColors};
use super::types::GraphDocument;

/// Baseline dot size for every node, in world units.
pub const BASE_NODE_SIZE: f64 = 14.0;
/// Temporary enlargement while the pointer rests on a node.
pub const HOVER_SCALE: f64 = 1.6;
/// Persistent enlargement toggled by clicking a node.
pub const EXPAND_SCALE: f64 = 1.8;
/// Extra world-space radius accepted around a node when hit-testing.
pub const HIT_SLOP: f64 = 4.0;
/// Margin kept between a dragged node and the canvas border.
pub const CLAMP_INSET: f64 = 24.0;

const STABILIZATION_TICKS: u32 = 180;
const FIT_DELAY_SECS: f64 = 0.4;
const FIT_MARGIN: f64 = 60.0;
const SIZE_EASE_RATE: f64 = 12.0;

/// Presentation record carried by each layout node.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub id: String,
	pub label: String,
	pub category: Option<String>,
	pub colors: CategoryColors,
	pub size: f64,
	pub target_size: f64,
	pub expanded: bool,
	pub dimmed: bool,
}

/// How an edge is currently emphasized relative to the click selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
	Default,
	Highlighted,
	Dimmed,
}

/// Presentation record for one edge.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Relation with underscores replaced by spaces.
	pub label: String,
	pub weight: f64,
	/// Width in the default state: `1 + 5 * weight`.
	pub base_width: f64,
	/// Space the label wants along the edge: `clamp(120 + 10 * chars, 120, 420)`.
	pub length: f64,
	pub emphasis: EdgeEmphasis,
}

impl EdgeStyle {
	pub fn render_width(&self) -> f64 {
		match self.emphasis {
			EdgeEmphasis::Default => self.base_width,
			EdgeEmphasis::Highlighted => self.base_width + 2.0,
			EdgeEmphasis::Dimmed => (self.base_width * 0.4).max(0.4),
		}
	}

	pub fn render_color(&self) -> &'static str {
		match self.emphasis {
			EdgeEmphasis::Default => "rgba(148, 163, 184, 0.55)",
			EdgeEmphasis::Highlighted => "rgba(240, 244, 255, 0.95)",
			EdgeEmphasis::Dimmed => "rgba(125, 130, 150, 0.18)",
		}
	}
}

/// One edge of the current document, endpoints resolved to layout indices.
pub struct EdgeRecord {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub style: EdgeStyle,
}

/// What the info panel shows for the current click selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
	pub label: String,
	pub category: Option<String>,
	pub neighbor_labels: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Copy)]
enum LayoutPhase {
	Settling { ticks_left: u32 },
	FitPending { delay_left: f64 },
	Settled,
}

/// Room an edge wants along its run so the label stays readable.
fn label_space(label: &str) -> f64 {
	(120.0 + 10.0 * label.chars().count() as f64).clamp(120.0, 420.0)
}

/// All mutable presentation state for one rendered document. Discarded
/// and rebuilt whenever a new document arrives.
pub struct ThoughtGraphState {
	pub graph: ForceGraph<NodeStyle, ()>,
	pub edges: Vec<EdgeRecord>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	hovered: Option<DefaultNodeIdx>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	phase: LayoutPhase,
}

impl ThoughtGraphState {
	pub fn new(doc: &GraphDocument, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		// edges reserve room for their labels; the mean of that sets how
		// wide the initial ring of nodes starts out
		let spread = if doc.edges.is_empty() {
			100.0
		} else {
			doc.edges
				.iter()
				.map(|e| label_space(&e.relation.replace('_', " ")))
				.sum::<f64>() / doc.edges.len() as f64
				/ 2.0
		};

		for (i, node) in doc.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / doc.nodes.len().max(1) as f64;
			let idx = graph.add_node(NodeData {
				x: (spread * angle.cos()) as f32,
				y: (spread * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeStyle {
					id: node.id.clone(),
					label: node.label.clone(),
					category: node.category.clone(),
					colors: palette::colors_for(node.category.as_deref()),
					size: BASE_NODE_SIZE,
					target_size: BASE_NODE_SIZE,
					expanded: false,
					dimmed: false,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for edge in &doc.edges {
			let (Some(&from), Some(&to)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to))
			else {
				warn!("dropping edge with unknown endpoint: {} -> {}", edge.from, edge.to);
				continue;
			};
			let label = edge.relation.replace('_', " ");
			let weight = edge.effective_weight();
			let length = label_space(&label);
			graph.add_edge(from, to, EdgeData::default());
			edges.push(EdgeRecord {
				from,
				to,
				style: EdgeStyle {
					label,
					weight,
					base_width: 1.0 + 5.0 * weight,
					length,
					emphasis: EdgeEmphasis::Default,
				},
			});
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			selected: None,
			width,
			height,
			hovered: None,
			id_to_idx,
			phase: LayoutPhase::Settling {
				ticks_left: STABILIZATION_TICKS,
			},
		}
	}

	pub fn node_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// hit radius is in world-space, scales with the view like nodes
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.size + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	pub fn set_node_position(&mut self, idx: DefaultNodeIdx, x: f32, y: f32) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	/// Read a field of one node's presentation record.
	pub fn with_style<R>(&self, idx: DefaultNodeIdx, f: impl Fn(&NodeStyle) -> R) -> Option<R> {
		let mut out = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				out = Some(f(&node.data.user_data));
			}
		});
		out
	}

	fn neighbor_set(&self, idx: DefaultNodeIdx) -> HashSet<DefaultNodeIdx> {
		let mut set = HashSet::new();
		for edge in &self.edges {
			if edge.from == idx {
				set.insert(edge.to);
			} else if edge.to == idx {
				set.insert(edge.from);
			}
		}
		set
	}

	/// Click on node `idx`: highlight its one-hop neighborhood, dim the
	/// rest, toggle the node's expanded flag, and report what the info
	/// panel should show.
	pub fn select(&mut self, idx: DefaultNodeIdx) -> NodeSummary {
		let neighbors = self.neighbor_set(idx);
		self.selected = Some(idx);

		let mut summary = NodeSummary {
			label: String::new(),
			category: None,
			neighbor_labels: Vec::new(),
		};
		self.graph.visit_nodes_mut(|node| {
			let i = node.index();
			let style = &mut node.data.user_data;
			style.dimmed = i != idx && !neighbors.contains(&i);
			if i == idx {
				style.expanded = !style.expanded;
				summary.label = style.label.clone();
				summary.category = style.category.clone();
			}
		});
		// stable order: node insertion order, not hash order
		self.graph.visit_nodes(|node| {
			if neighbors.contains(&node.index()) {
				summary.neighbor_labels.push(node.data.user_data.label.clone());
			}
		});

		for edge in &mut self.edges {
			edge.style.emphasis = if edge.from == idx || edge.to == idx {
				EdgeEmphasis::Highlighted
			} else {
				EdgeEmphasis::Dimmed
			};
		}
		self.retarget_sizes();
		summary
	}

	/// Click on empty canvas: everything back to its default presentation.
	pub fn clear_selection(&mut self) {
		self.selected = None;
		self.graph.visit_nodes_mut(|node| {
			let style = &mut node.data.user_data;
			style.dimmed = false;
			style.expanded = false;
		});
		for edge in &mut self.edges {
			edge.style.emphasis = EdgeEmphasis::Default;
		}
		self.retarget_sizes();
	}

	pub fn set_hover(&mut self, idx: Option<DefaultNodeIdx>) {
		if self.hovered == idx {
			return;
		}
		self.hovered = idx;
		self.retarget_sizes();
	}

	pub fn hovered(&self) -> Option<DefaultNodeIdx> {
		self.hovered
	}

	/// Expanded wins over hover; otherwise hover wins over baseline.
	fn retarget_sizes(&mut self) {
		let hovered = self.hovered;
		self.graph.visit_nodes_mut(|node| {
			let i = node.index();
			let style = &mut node.data.user_data;
			style.target_size = if style.expanded {
				BASE_NODE_SIZE * EXPAND_SCALE
			} else if hovered == Some(i) {
				BASE_NODE_SIZE * HOVER_SCALE
			} else {
				BASE_NODE_SIZE
			};
		});
	}

	/// Pull a node back inside the visible canvas after a drag. Returns
	/// true when the position had to change.
	pub fn clamp_into_view(&mut self, idx: DefaultNodeIdx) -> bool {
		let Some((gx, gy)) = self.node_position(idx) else {
			return false;
		};
		let (sx, sy) = self.graph_to_screen(gx, gy);
		let cx = sx.clamp(CLAMP_INSET, (self.width - CLAMP_INSET).max(CLAMP_INSET));
		let cy = sy.clamp(CLAMP_INSET, (self.height - CLAMP_INSET).max(CLAMP_INSET));
		if (cx - sx).abs() < f64::EPSILON && (cy - sy).abs() < f64::EPSILON {
			return false;
		}
		let (nx, ny) = self.screen_to_graph(cx, cy);
		self.set_node_position(idx, nx as f32, ny as f32);
		true
	}

	/// One animation frame: bounded physics, the one-shot fit, and the
	/// size easing that drives hover/expand animation.
	pub fn tick(&mut self, dt: f64) {
		match self.phase {
			LayoutPhase::Settling { ticks_left } => {
				self.graph.update(dt as f32);
				self.phase = if ticks_left <= 1 {
					LayoutPhase::FitPending {
						delay_left: FIT_DELAY_SECS,
					}
				} else {
					LayoutPhase::Settling {
						ticks_left: ticks_left - 1,
					}
				};
			}
			LayoutPhase::FitPending { delay_left } => {
				let delay_left = delay_left - dt;
				if delay_left <= 0.0 {
					self.fit_view();
					self.phase = LayoutPhase::Settled;
				} else {
					self.phase = LayoutPhase::FitPending { delay_left };
				}
			}
			LayoutPhase::Settled => {}
		}

		let ease = (SIZE_EASE_RATE * dt).min(1.0);
		self.graph.visit_nodes_mut(|node| {
			let style = &mut node.data.user_data;
			style.size += (style.target_size - style.size) * ease;
		});
	}

	fn fit_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let (bw, bh) = (x1 - x0 + 2.0 * FIT_MARGIN, y1 - y0 + 2.0 * FIT_MARGIN);
		let k = (self.width / bw).min(self.height / bh).min(1.0);
		self.transform.k = k;
		self.transform.x = self.width / 2.0 - k * (x0 + x1) / 2.0;
		self.transform.y = self.height / 2.0 - k * (y0 + y1) / 2.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::thought_graph::types::{GraphEdge, GraphNode};

	fn node(id: &str, label: &str, category: Option<&str>) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: label.into(),
			category: category.map(Into::into),
		}
	}

	fn edge(from: &str, to: &str, relation: &str, weight: Option<f64>) -> GraphEdge {
		GraphEdge {
			from: from.into(),
			to: to.into(),
			relation: relation.into(),
			weight,
		}
	}

	fn sample() -> GraphDocument {
		GraphDocument {
			nodes: vec![
				node("tired", "Tired", Some("emotion")),
				node("procrastinate", "Procrastinate", Some("habit")),
				node("gym", "Gym", None),
			],
			edges: vec![edge("procrastinate", "tired", "causes", Some(0.5))],
			insights: vec!["one insight".into()],
		}
	}

	fn state() -> ThoughtGraphState {
		ThoughtGraphState::new(&sample(), 800.0, 600.0)
	}

	#[test]
	fn builds_one_record_per_node_and_edge() {
		let s = state();
		assert_eq!(s.node_count(), 3);
		assert_eq!(s.edges.len(), 1);
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let mut doc = sample();
		doc.edges.push(edge("tired", "ghost", "worsens", None));
		let s = ThoughtGraphState::new(&doc, 800.0, 600.0);
		assert_eq!(s.edges.len(), 1);
	}

	#[test]
	fn edge_width_scales_with_weight() {
		let s = state();
		assert!((s.edges[0].style.base_width - 3.5).abs() < 1e-9);

		let mut doc = sample();
		doc.edges[0].weight = None;
		let s = ThoughtGraphState::new(&doc, 800.0, 600.0);
		assert!((s.edges[0].style.base_width - 2.5).abs() < 1e-9);
	}

	#[test]
	fn edge_length_reserves_label_space() {
		let mut doc = sample();
		doc.edges[0].relation = "causes".into();
		doc.edges.push(edge(
			"tired",
			"gym",
			"a_very_long_relation_label_that_keeps_going_and_going_forever",
			None,
		));
		let s = ThoughtGraphState::new(&doc, 800.0, 600.0);
		assert!((s.edges[0].style.length - 180.0).abs() < 1e-9);
		assert!((s.edges[1].style.length - 420.0).abs() < 1e-9);
	}

	#[test]
	fn edge_length_spreads_initial_layout() {
		let radius = |s: &ThoughtGraphState, id: &str| {
			let (x, y) = s.node_position(s.node_index(id).unwrap()).unwrap();
			x.hypot(y)
		};

		// one edge labeled "causes": length 180, so the ring starts at 90
		let s = state();
		assert!((radius(&s, "tired") - 90.0).abs() < 1e-3);

		// a label long enough to hit the 420 cap widens the ring to 210
		let mut doc = sample();
		doc.edges[0].relation = "x".repeat(60);
		let s = ThoughtGraphState::new(&doc, 800.0, 600.0);
		assert!((radius(&s, "tired") - 210.0).abs() < 1e-3);
	}

	#[test]
	fn relation_underscores_become_spaces() {
		let mut doc = sample();
		doc.edges[0].relation = "relates_to".into();
		let s = ThoughtGraphState::new(&doc, 800.0, 600.0);
		assert_eq!(s.edges[0].style.label, "relates to");
	}

	#[test]
	fn selecting_dims_non_neighbors_and_emphasizes_incident_edges() {
		let mut s = state();
		let idx = s.node_index("procrastinate").unwrap();
		let summary = s.select(idx);

		assert_eq!(s.selected, Some(idx));
		assert_eq!(summary.label, "Procrastinate");
		assert_eq!(summary.category.as_deref(), Some("habit"));
		assert_eq!(summary.neighbor_labels, vec!["Tired".to_string()]);

		let tired = s.node_index("tired").unwrap();
		let gym = s.node_index("gym").unwrap();
		assert_eq!(s.with_style(idx, |n| n.dimmed), Some(false));
		assert_eq!(s.with_style(tired, |n| n.dimmed), Some(false));
		assert_eq!(s.with_style(gym, |n| n.dimmed), Some(true));
		assert_eq!(s.edges[0].style.emphasis, EdgeEmphasis::Highlighted);

		// highlighted edge is wider and brighter than default
		let base = EdgeStyle {
			emphasis: EdgeEmphasis::Default,
			..s.edges[0].style.clone()
		};
		assert!(s.edges[0].style.render_width() > base.render_width());
		assert_ne!(s.edges[0].style.render_color(), base.render_color());
	}

	#[test]
	fn isolated_node_reports_no_neighbors() {
		let mut s = state();
		let gym = s.node_index("gym").unwrap();
		let summary = s.select(gym);
		assert!(summary.neighbor_labels.is_empty());
		assert_eq!(summary.category, None);
		assert_eq!(s.edges[0].style.emphasis, EdgeEmphasis::Dimmed);
	}

	#[test]
	fn select_toggles_expanded_size() {
		let mut s = state();
		let idx = s.node_index("tired").unwrap();

		s.select(idx);
		assert_eq!(s.with_style(idx, |n| n.expanded), Some(true));
		assert_eq!(
			s.with_style(idx, |n| n.target_size),
			Some(BASE_NODE_SIZE * EXPAND_SCALE)
		);

		s.select(idx);
		assert_eq!(s.with_style(idx, |n| n.expanded), Some(false));
		assert_eq!(s.with_style(idx, |n| n.target_size), Some(BASE_NODE_SIZE));
	}

	#[test]
	fn deselect_restores_initial_presentation() {
		let mut s = state();
		let idx = s.node_index("procrastinate").unwrap();
		s.select(idx);
		s.clear_selection();

		assert_eq!(s.selected, None);
		for id in ["tired", "procrastinate", "gym"] {
			let i = s.node_index(id).unwrap();
			assert_eq!(s.with_style(i, |n| n.dimmed), Some(false));
			assert_eq!(s.with_style(i, |n| n.expanded), Some(false));
			assert_eq!(s.with_style(i, |n| n.target_size), Some(BASE_NODE_SIZE));
		}
		assert_eq!(s.edges[0].style.emphasis, EdgeEmphasis::Default);
		assert!((s.edges[0].style.render_width() - 3.5).abs() < 1e-9);
	}

	#[test]
	fn hover_enlarges_unless_expanded() {
		let mut s = state();
		let idx = s.node_index("gym").unwrap();

		s.set_hover(Some(idx));
		assert_eq!(
			s.with_style(idx, |n| n.target_size),
			Some(BASE_NODE_SIZE * HOVER_SCALE)
		);
		s.set_hover(None);
		assert_eq!(s.with_style(idx, |n| n.target_size), Some(BASE_NODE_SIZE));

		// expanded supersedes hover on both enter and leave
		s.select(idx);
		s.set_hover(Some(idx));
		assert_eq!(
			s.with_style(idx, |n| n.target_size),
			Some(BASE_NODE_SIZE * EXPAND_SCALE)
		);
		s.set_hover(None);
		assert_eq!(
			s.with_style(idx, |n| n.target_size),
			Some(BASE_NODE_SIZE * EXPAND_SCALE)
		);
	}

	#[test]
	fn sizes_ease_toward_target() {
		let mut s = state();
		let idx = s.node_index("tired").unwrap();
		s.select(idx);
		for _ in 0..240 {
			s.tick(1.0 / 60.0);
		}
		let size = s.with_style(idx, |n| n.size).unwrap();
		assert!((size - BASE_NODE_SIZE * EXPAND_SCALE).abs() < 0.1);
	}

	#[test]
	fn drag_clamps_back_into_viewport() {
		let mut s = state();
		let idx = s.node_index("tired").unwrap();

		// drop the node far outside the right edge of an 800x600 canvas
		let (gx, gy) = s.screen_to_graph(5000.0, -300.0);
		s.set_node_position(idx, gx as f32, gy as f32);
		assert!(s.clamp_into_view(idx));

		let (gx, gy) = s.node_position(idx).unwrap();
		let (sx, sy) = s.graph_to_screen(gx, gy);
		assert!(sx <= 800.0 - CLAMP_INSET + 1e-6 && sx >= CLAMP_INSET - 1e-6);
		assert!(sy >= CLAMP_INSET - 1e-6 && sy <= 600.0 - CLAMP_INSET + 1e-6);

		// a node already inside is left alone
		assert!(!s.clamp_into_view(idx));
	}
}
