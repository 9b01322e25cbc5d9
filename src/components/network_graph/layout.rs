use std::collections::{HashMap, VecDeque};
use std::f64::consts::PI;

use crate::analysis::{AnalysisError, GraphModel};

/// Accepted layout names, default first.
pub const LAYOUT_NAMES: &[&str] = &["kamada-kawai", "force-directed", "circle"];

const STRESS_ITERATIONS: usize = 300;
const STRESS_TOLERANCE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutAlgorithm {
	/// Static placement whose distances track shortest-path lengths.
	#[default]
	KamadaKawai,
	/// Live spring/charge simulation.
	ForceDirected,
	/// Static ring in node order.
	Circle,
}

impl LayoutAlgorithm {
	pub fn from_name(name: &str) -> Result<Self, AnalysisError> {
		match name.trim().to_ascii_lowercase().as_str() {
			"kamada-kawai" | "kk" => Ok(Self::KamadaKawai),
			"force-directed" | "force" => Ok(Self::ForceDirected),
			"circle" => Ok(Self::Circle),
			other => Err(AnalysisError::Render(format!(
				"unknown layout algorithm `{other}` (expected one of: {})",
				LAYOUT_NAMES.join(", ")
			))),
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::KamadaKawai => "kamada-kawai",
			Self::ForceDirected => "force-directed",
			Self::Circle => "circle",
		}
	}

	/// Whether the force simulation keeps moving nodes after placement.
	pub fn simulates(self) -> bool {
		matches!(self, Self::ForceDirected)
	}

	/// Starting positions around the origin, one per model node in order.
	pub fn place(self, model: &GraphModel, radius: f64) -> Vec<(f64, f64)> {
		match self {
			Self::KamadaKawai => stress_layout(model, radius),
			Self::ForceDirected => ring(model.nodes.len(), 100.0_f64.min(radius)),
			Self::Circle => ring(model.nodes.len(), radius),
		}
	}
}

fn ring(n: usize, radius: f64) -> Vec<(f64, f64)> {
	if n == 1 {
		return vec![(0.0, 0.0)];
	}
	(0..n)
		.map(|i| {
			let angle = (i as f64) * 2.0 * PI / n as f64;
			(radius * angle.cos(), radius * angle.sin())
		})
		.collect()
}

/// Hop counts between every pair of nodes; `None` when unreachable.
fn hop_distances(model: &GraphModel) -> Vec<Vec<Option<usize>>> {
	let n = model.nodes.len();
	let id_to_idx: HashMap<usize, usize> = model
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id, i))
		.collect();

	let mut adjacency = vec![Vec::new(); n];
	for edge in &model.edges {
		if let (Some(&a), Some(&b)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
			adjacency[a].push(b);
			adjacency[b].push(a);
		}
	}

	(0..n)
		.map(|source| {
			let mut dist = vec![None; n];
			dist[source] = Some(0);
			let mut queue = VecDeque::from([source]);
			while let Some(v) = queue.pop_front() {
				let next = dist[v].map_or(0, |d| d + 1);
				for &w in &adjacency[v] {
					if dist[w].is_none() {
						dist[w] = Some(next);
						queue.push_back(w);
					}
				}
			}
			dist
		})
		.collect()
}

/// Kamada-Kawai style placement by localized stress majorization.
///
/// Unreachable pairs are held one hop beyond the graph's diameter.
fn stress_layout(model: &GraphModel, radius: f64) -> Vec<(f64, f64)> {
	let n = model.nodes.len();
	if n < 2 {
		return ring(n, radius);
	}

	let hops = hop_distances(model);
	let diameter = hops.iter().flatten().flatten().copied().max().unwrap_or(1).max(1);
	let ideal: Vec<Vec<f64>> = hops
		.iter()
		.map(|row| {
			row.iter()
				.map(|d| d.unwrap_or(diameter + 1) as f64)
				.collect()
		})
		.collect();

	let mut pos = ring(n, diameter as f64 / 2.0);
	for _ in 0..STRESS_ITERATIONS {
		let mut moved = 0.0_f64;
		for i in 0..n {
			let (mut sx, mut sy, mut weight) = (0.0, 0.0, 0.0);
			for j in (0..n).filter(|&j| j != i) {
				let d = ideal[i][j];
				let w = 1.0 / (d * d);
				let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
				let norm = (dx * dx + dy * dy).sqrt().max(1e-9);
				sx += w * (pos[j].0 + d * dx / norm);
				sy += w * (pos[j].1 + d * dy / norm);
				weight += w;
			}
			let next = (sx / weight, sy / weight);
			moved = moved.max((next.0 - pos[i].0).abs() + (next.1 - pos[i].1).abs());
			pos[i] = next;
		}
		if moved < STRESS_TOLERANCE {
			break;
		}
	}

	fit(&mut pos, radius);
	pos
}

/// Centres positions on the origin and scales them to `radius`.
fn fit(pos: &mut [(f64, f64)], radius: f64) {
	let n = pos.len() as f64;
	let (cx, cy) = pos
		.iter()
		.fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x / n, ay + y / n));
	let extent = pos
		.iter()
		.map(|(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
		.fold(0.0_f64, f64::max);
	let scale = if extent > 1e-9 { radius / extent } else { 1.0 };
	for p in pos.iter_mut() {
		*p = ((p.0 - cx) * scale, (p.1 - cy) * scale);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::{EDGE_DARK_COLOR, Edge, NODE_COLOR, Node};

	fn model(n: usize, links: &[(usize, usize)]) -> GraphModel {
		GraphModel {
			nodes: (1..=n)
				.map(|id| Node {
					id,
					label: format!("n{id}"),
					color: NODE_COLOR.into(),
					shadow: true,
				})
				.collect(),
			edges: links
				.iter()
				.map(|&(from, to)| Edge {
					from,
					to,
					color: EDGE_DARK_COLOR.into(),
					dashed: false,
				})
				.collect(),
		}
	}

	fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
		((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
	}

	#[test]
	fn names_parse() {
		assert_eq!(LayoutAlgorithm::from_name("kamada-kawai"), Ok(LayoutAlgorithm::KamadaKawai));
		assert_eq!(LayoutAlgorithm::from_name(" Circle "), Ok(LayoutAlgorithm::Circle));
		assert_eq!(LayoutAlgorithm::from_name("force"), Ok(LayoutAlgorithm::ForceDirected));
		for name in LAYOUT_NAMES {
			assert_eq!(LayoutAlgorithm::from_name(name).unwrap().name(), *name);
		}
		assert_eq!(LayoutAlgorithm::default().name(), LAYOUT_NAMES[0]);
	}

	#[test]
	fn unknown_name_is_a_render_error() {
		let err = LayoutAlgorithm::from_name("spectral").unwrap_err();
		assert!(matches!(err, AnalysisError::Render(msg) if msg.contains("spectral")));
	}

	#[test]
	fn only_force_directed_simulates() {
		assert!(LayoutAlgorithm::ForceDirected.simulates());
		assert!(!LayoutAlgorithm::KamadaKawai.simulates());
		assert!(!LayoutAlgorithm::Circle.simulates());
	}

	#[test]
	fn circle_sits_on_the_radius() {
		let pos = LayoutAlgorithm::Circle.place(&model(6, &[]), 50.0);
		assert_eq!(pos.len(), 6);
		for p in pos {
			assert!((dist(p, (0.0, 0.0)) - 50.0).abs() < 1e-9);
		}
	}

	#[test]
	fn single_node_is_centred() {
		for layout in [LayoutAlgorithm::Circle, LayoutAlgorithm::KamadaKawai] {
			assert_eq!(layout.place(&model(1, &[]), 50.0), vec![(0.0, 0.0)]);
		}
		assert!(LayoutAlgorithm::KamadaKawai.place(&model(0, &[]), 50.0).is_empty());
	}

	#[test]
	fn hops_follow_undirected_edges() {
		let hops = hop_distances(&model(4, &[(2, 1), (2, 3)]));
		assert_eq!(hops[0][2], Some(2));
		assert_eq!(hops[2][0], Some(2));
		assert_eq!(hops[0][3], None);
	}

	#[test]
	fn stress_layout_stretches_paths() {
		let pos = LayoutAlgorithm::KamadaKawai.place(&model(3, &[(1, 2), (2, 3)]), 100.0);
		let (d12, d23, d13) = (dist(pos[0], pos[1]), dist(pos[1], pos[2]), dist(pos[0], pos[2]));
		assert!(d13 > 1.5 * d12);
		assert!(d13 > 1.5 * d23);
	}

	#[test]
	fn stress_layout_fits_radius_and_is_deterministic() {
		let m = model(5, &[(1, 2), (2, 3), (3, 4), (1, 4)]);
		let a = LayoutAlgorithm::KamadaKawai.place(&m, 80.0);
		let b = LayoutAlgorithm::KamadaKawai.place(&m, 80.0);
		assert_eq!(a, b);
		assert_eq!(a.len(), 5);
		assert!(a.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
		let extent = a.iter().map(|&p| dist(p, (0.0, 0.0))).fold(0.0, f64::max);
		assert!((extent - 80.0).abs() < 1e-6);
	}
}
