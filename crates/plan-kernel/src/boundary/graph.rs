use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::geometry::point::Point;

/// Undirected wall graph of one room, keyed by stable vertex ids.
///
/// Generic over the key so reconstruction can be exercised without a store.
#[derive(Debug, Clone)]
pub struct WallGraph<K> {
    positions: BTreeMap<K, Point>,
    adjacency: BTreeMap<K, BTreeSet<K>>,
}

impl<K: Copy + Ord> Default for WallGraph<K> {
    fn default() -> Self {
        Self {
            positions: BTreeMap::new(),
            adjacency: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Ord> WallGraph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wall between `a` and `b`. A wall whose two ends are the same
    /// vertex registers the vertex but contributes no edge.
    pub fn add_wall(&mut self, a: K, pa: Point, b: K, pb: Point) {
        self.positions.insert(a, pa);
        self.positions.insert(b, pb);
        self.adjacency.entry(a).or_default();
        self.adjacency.entry(b).or_default();
        if a != b {
            self.adjacency.entry(a).or_default().insert(b);
            self.adjacency.entry(b).or_default().insert(a);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn degree(&self, key: K) -> usize {
        self.adjacency.get(&key).map_or(0, BTreeSet::len)
    }

    /// All distinct vertex positions, in key order.
    pub fn points(&self) -> Vec<Point> {
        self.positions.values().copied().collect()
    }

    /// Leftmost vertex, lowest y among ties. Always on the outer boundary.
    pub fn start_vertex(&self) -> Option<K> {
        self.positions
            .iter()
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .map(|(k, _)| *k)
    }

    /// Greedy walk along the outside of the graph.
    ///
    /// At every vertex the walk takes the unvisited neighbor reached by the
    /// tightest clockwise turn from the arrival direction (the rightmost turn
    /// in y-up terms), which keeps the exterior on one side. The first step
    /// pretends the walk arrived heading towards -y. The start vertex becomes
    /// eligible again once three vertices are on the path; choosing it closes
    /// the ring. Hitting a vertex with no eligible neighbor ends the walk
    /// early with whatever was collected.
    pub fn trace(&self) -> Vec<Point> {
        let Some(start) = self.start_vertex() else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut visited = BTreeSet::from([start]);
        let mut current = start;
        // Direction pointing back along the (virtual) incoming edge.
        let mut back_angle = FRAC_PI_2;

        loop {
            let Some(here) = self.positions.get(&current).copied() else {
                break;
            };
            let Some(neighbors) = self.adjacency.get(&current) else {
                break;
            };

            let next = neighbors
                .iter()
                .copied()
                .filter(|n| !visited.contains(n) || (*n == start && path.len() >= 3))
                .filter_map(|n| {
                    let to = self.positions.get(&n)?;
                    Some((n, turn_delta(back_angle, here.angle_to(to))))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match next {
                Some((n, _)) if n == start => break,
                Some((n, _)) => {
                    if let Some(to) = self.positions.get(&n) {
                        back_angle = to.angle_to(&here);
                    }
                    visited.insert(n);
                    path.push(n);
                    current = n;
                }
                None => break,
            }
        }

        path.iter()
            .filter_map(|k| self.positions.get(k).copied())
            .collect()
    }
}

/// Counter-clockwise sweep from `back` to `out`, normalized to `(0, 2π]`.
///
/// Going straight back the way we came scores `2π`, the worst choice.
fn turn_delta(back: f64, out: f64) -> f64 {
    let delta = (out - back).rem_euclid(TAU);
    if delta <= 1e-12 {
        TAU
    } else {
        delta
    }
}
