//! Seeded force-directed (Fruchterman–Reingold) layout.
//!
//! Positions depend only on the node/edge set and the seed, so re-rendering
//! the same ontology reproduces the same picture. Adding or removing a node or
//! edge can move everything; force layouts are not stable under insertion.

use fleetgraph_ontology::AbstractGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

pub const LAYOUT_SEED: u64 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: LAYOUT_SEED,
            iterations: 50,
        }
    }
}

/// Node positions in `[-1, 1]²`, in [`AbstractGraph::node_ids`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub positions: Vec<(String, Point)>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions
            .iter()
            .find(|(node, _)| node == id)
            .map(|(_, p)| *p)
    }
}

pub fn spring_layout(graph: &AbstractGraph, config: &LayoutConfig) -> Layout {
    let ids = graph.node_ids();
    let n = ids.len();
    let index = graph.node_positions();

    let mut pos: Vec<[f64; 2]> = match n {
        0 => Vec::new(),
        1 => vec![[0.0, 0.0]],
        _ => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect()
        }
    };

    if n > 1 {
        // Undirected adjacency: direction and parallel edges do not change attraction.
        let mut adjacent = vec![vec![false; n]; n];
        for e in &graph.edges {
            if let (Some(&a), Some(&b)) = (index.get(e.source.as_str()), index.get(e.target.as_str())) {
                if a != b {
                    adjacent[a][b] = true;
                    adjacent[b][a] = true;
                }
            }
        }
        fruchterman_reingold(&mut pos, &adjacent, config.iterations);
        rescale(&mut pos);
    }

    Layout {
        positions: ids
            .into_iter()
            .zip(pos)
            .map(|(id, [x, y])| (id.to_string(), Point { x, y }))
            .collect(),
    }
}

fn fruchterman_reingold(pos: &mut [[f64; 2]], adjacent: &[Vec<bool>], iterations: usize) {
    let n = pos.len();
    let k = (1.0 / n as f64).sqrt();

    let span = |axis: usize| {
        let (lo, hi) = pos
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
        hi - lo
    };
    let mut temperature = span(0).max(span(1)) * 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![[0.0_f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                let attraction = if adjacent[i][j] { distance / k } else { 0.0 };
                let force = k * k / (distance * distance) - attraction;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt().max(0.01);
            p[0] += d[0] * temperature / length;
            p[1] += d[1] * temperature / length;
        }
        temperature -= cooling;
    }
}

/// Centers on the origin and scales the widest coordinate to 1.
fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let mean = pos
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);
    let mut extent = 0.0_f64;
    for p in pos.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
        extent = extent.max(p[0].abs()).max(p[1].abs());
    }
    if extent > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= extent;
            p[1] /= extent;
        }
    }
}
