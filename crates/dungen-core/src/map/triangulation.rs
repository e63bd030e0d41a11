//! Room connectivity: Bowyer-Watson triangulation, Prim's MST, and a
//! repair pass for under-connected rooms.
//!
//! The triangulation runs over room centers seeded with an oversized
//! scaffold triangle that strictly contains the map. Scaffold vertices are
//! plain local values; they never become rooms and every edge or triangle
//! touching them is discarded before the MST stage sees the graph.

use hashbrown::HashMap;
use log::debug;

use super::corridor::Corridor;
use super::grid::GridPoint;
use super::room::Room;

/// An edge between two room indices, key always ordered `(low, high)`.
type EdgeKey = (usize, usize);

fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a < b { (a, b) } else { (b, a) }
}

/// Triangle over node indices into the position table.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    nodes: [usize; 3],
}

impl Triangle {
    fn new(a: usize, b: usize, c: usize) -> Self {
        Self { nodes: [a, b, c] }
    }

    fn edges(&self) -> [EdgeKey; 3] {
        let [a, b, c] = self.nodes;
        [edge_key(a, b), edge_key(b, c), edge_key(c, a)]
    }

    fn has_node(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Point-in-circumcircle containment test.
    fn circumcircle_contains(&self, positions: &[(f64, f64)], point: (f64, f64)) -> bool {
        let (ax, az) = positions[self.nodes[0]];
        let (bx, bz) = positions[self.nodes[1]];
        let (cx, cz) = positions[self.nodes[2]];

        let d = 2.0 * (ax * (bz - cz) + bx * (cz - az) + cx * (az - bz));
        if d.abs() < f64::EPSILON {
            // Degenerate (collinear) triangle has no circumcircle.
            return false;
        }

        let a2 = ax * ax + az * az;
        let b2 = bx * bx + bz * bz;
        let c2 = cx * cx + cz * cz;
        let ux = (a2 * (bz - cz) + b2 * (cz - az) + c2 * (az - bz)) / d;
        let uz = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

        let radius_sq = (ax - ux).powi(2) + (az - uz).powi(2);
        let dist_sq = (point.0 - ux).powi(2) + (point.1 - uz).powi(2);
        dist_sq < radius_sq
    }
}

/// Candidate edges between real rooms, with their Euclidean lengths,
/// sorted by `(low, high)` room index so iteration order is deterministic.
pub fn triangulate(rooms: &[Room], map_size: GridPoint) -> Vec<(EdgeKey, f32)> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let n = rooms.len();
    let mut positions: Vec<(f64, f64)> = rooms
        .iter()
        .map(|r| {
            let (x, z) = r.center();
            (x as f64, z as f64)
        })
        .collect();

    // Scaffold vertices spanning at least twice the map extent on every
    // side; indices n, n+1, n+2.
    let w = map_size.x as f64;
    let h = map_size.z as f64;
    positions.push((2.5 * w, 1.5 * h));
    positions.push((-1.5 * w, 1.5 * h));
    positions.push((0.5 * w, -1.5 * h));

    let mut triangulation = vec![Triangle::new(n, n + 1, n + 2)];

    // Incremental insertion.
    for (room, &point) in positions.iter().enumerate().take(n) {
        let (bad, rest): (Vec<Triangle>, Vec<Triangle>) = triangulation
            .into_iter()
            .partition(|t| t.circumcircle_contains(&positions, point));

        // Boundary of the bad-triangle union: edges owned by exactly one
        // bad triangle. Shared edges sit between two bad triangles and die
        // with them.
        let mut edge_uses: HashMap<EdgeKey, usize> = HashMap::new();
        for triangle in &bad {
            for edge in triangle.edges() {
                *edge_uses.entry(edge).or_insert(0) += 1;
            }
        }

        triangulation = rest;
        for triangle in &bad {
            for (u, v) in triangle.edges() {
                if edge_uses[&(u, v)] == 1 {
                    triangulation.push(Triangle::new(u, v, room));
                }
            }
        }
    }

    // Collect edges between real rooms. Edges touching a scaffold vertex
    // are dropped along with the vertices themselves.
    let mut edges: HashMap<EdgeKey, f32> = HashMap::new();
    for triangle in &triangulation {
        for (u, v) in triangle.edges() {
            if u < n && v < n {
                let du = positions[u];
                let dv = positions[v];
                let length = ((du.0 - dv.0).powi(2) + (du.1 - dv.1).powi(2)).sqrt() as f32;
                edges.insert((u, v), length);
            }
        }
    }

    let mut sorted: Vec<(EdgeKey, f32)> = edges.into_iter().collect();
    sorted.sort_by_key(|&(key, _)| key);
    debug!(
        "triangulation produced {} candidate edges for {} rooms",
        sorted.len(),
        n
    );
    sorted
}

/// Prim's minimum spanning tree over the candidate edges.
///
/// Ties on length resolve to the first edge in `(low, high)` index order,
/// so the result is deterministic for symmetric inputs.
pub fn minimum_spanning_tree(rooms: &[Room], candidates: &[(EdgeKey, f32)]) -> Vec<Corridor> {
    let n = rooms.len();
    let mut result = Vec::new();
    if n < 2 {
        return result;
    }

    let mut in_tree = vec![false; n];
    in_tree[0] = true;
    let mut attached = 1;

    while attached < n {
        let mut best: Option<(EdgeKey, f32)> = None;
        for &((u, v), length) in candidates {
            if in_tree[u] == in_tree[v] {
                continue;
            }
            if best.is_none_or(|(_, best_len)| length < best_len) {
                best = Some(((u, v), length));
            }
        }

        let Some(((u, v), _)) = best else {
            // Candidate graph is disconnected; the repair pass picks up
            // whatever is left.
            break;
        };

        let (origin, far) = if in_tree[u] { (u, v) } else { (v, u) };
        result.push(Corridor::link(&rooms[origin], &rooms[far]));
        in_tree[far] = true;
        attached += 1;
    }

    result
}

/// Connect every room touched by fewer than two corridors to its nearest
/// room it is not already directly connected to. Repeats until no room is
/// under-connected or no valid target remains.
pub fn repair_connectivity(rooms: &[Room], corridors: &mut Vec<Corridor>) {
    loop {
        let Some(current) = rooms
            .iter()
            .find(|room| corridors.iter().filter(|c| c.touches(room.index)).count() < 2)
        else {
            return;
        };

        let mut closest: Option<(usize, f32)> = None;
        for other in rooms {
            if other.index == current.index {
                continue;
            }
            if corridors
                .iter()
                .any(|c| c.connects(current.index, other.index))
            {
                continue;
            }
            let distance = current.distance_to(other);
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((other.index, distance));
            }
        }

        let Some((target, _)) = closest else {
            // Every other room is already a direct neighbor; accept the
            // remaining under-connection.
            return;
        };

        debug!(
            "repairing under-connected room {} -> room {}",
            current.index, target
        );
        corridors.push(Corridor::link(&rooms[current.index], &rooms[target]));
    }
}

/// Full connectivity stage: triangulate, reduce to an MST, then repair.
pub fn build_connections(rooms: &[Room], map_size: GridPoint) -> Vec<Corridor> {
    let candidates = triangulate(rooms, map_size);
    let mut corridors = minimum_spanning_tree(rooms, &candidates);
    repair_connectivity(rooms, &mut corridors);
    corridors
}
