use std::cell::Cell;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Nearest drawn symbol to a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitCandidate {
    pub datum: usize,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

/// Voronoi point location over symbol anchors.
///
/// Anchors are triangulated once (Bowyer-Watson Delaunay). A query walks the
/// Delaunay neighbour graph greedily towards the pointer, which ends at the
/// site whose Voronoi cell contains the pointer. The walk starts from the
/// previous answer, so consecutive pointer moves only take a few steps.
#[derive(Debug, Clone, Default)]
pub struct HitTestIndex {
    sites: Vec<(f64, f64)>,
    owners: Vec<usize>,
    neighbors: Vec<Vec<usize>>,
    last: Cell<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    vertices: [usize; 3],
    center: (f64, f64),
    radius_sq: f64,
}

impl HitTestIndex {
    /// Builds the index from `(datum, x, y)` anchors.
    ///
    /// Non-finite anchors are ignored; coincident anchors keep the first datum.
    pub fn build<I>(anchors: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64, f64)>,
    {
        let mut unique: IndexMap<(OrderedFloat<f64>, OrderedFloat<f64>), usize> = IndexMap::new();
        for (datum, x, y) in anchors {
            if x.is_finite() && y.is_finite() {
                unique.entry((OrderedFloat(x), OrderedFloat(y))).or_insert(datum);
            }
        }
        let (sites, owners): (Vec<(f64, f64)>, Vec<usize>) = unique
            .into_iter()
            .map(|((x, y), datum)| ((x.0, y.0), datum))
            .unzip();
        let neighbors = delaunay_neighbors(&sites);
        Self {
            sites,
            owners,
            neighbors,
            last: Cell::new(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Delaunay neighbours of the site owned by `datum`.
    #[must_use]
    pub fn neighbors_of(&self, datum: usize) -> Vec<usize> {
        self.owners
            .iter()
            .position(|owner| *owner == datum)
            .map(|site| self.neighbors[site].iter().map(|n| self.owners[*n]).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn nearest(&self, x: f64, y: f64) -> Option<HitCandidate> {
        if self.sites.is_empty() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let distance_sq = |site: usize| {
            let (sx, sy) = self.sites[site];
            (sx - x).powi(2) + (sy - y).powi(2)
        };

        let mut current = self.last.get().min(self.sites.len() - 1);
        let mut current_distance = distance_sq(current);
        loop {
            let closer = self.neighbors[current]
                .iter()
                .map(|&neighbor| (neighbor, distance_sq(neighbor)))
                .filter(|(_, distance)| *distance < current_distance)
                .min_by_key(|(_, distance)| OrderedFloat(*distance));
            match closer {
                Some((neighbor, distance)) => {
                    current = neighbor;
                    current_distance = distance;
                }
                None => break,
            }
        }
        self.last.set(current);

        let (sx, sy) = self.sites[current];
        Some(HitCandidate {
            datum: self.owners[current],
            x: sx,
            y: sy,
            distance: current_distance.sqrt(),
        })
    }

    /// Like `nearest`, but rejects matches farther than `max_distance`.
    #[must_use]
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<HitCandidate> {
        self.nearest(x, y)
            .filter(|candidate| candidate.distance <= max_distance)
    }
}

fn circumcircle(points: &[(f64, f64)], vertices: [usize; 3]) -> Triangle {
    let (ax, ay) = points[vertices[0]];
    let (bx, by) = points[vertices[1]];
    let (cx, cy) = points[vertices[2]];
    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < f64::EPSILON {
        // Degenerate sliver: treat as containing everything so it is replaced.
        return Triangle {
            vertices,
            center: (0.0, 0.0),
            radius_sq: f64::INFINITY,
        };
    }
    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
    Triangle {
        vertices,
        center: (ux, uy),
        radius_sq: (ax - ux).powi(2) + (ay - uy).powi(2),
    }
}

/// Bowyer-Watson triangulation reduced to a neighbour list per site.
///
/// Edges of triangles touching the enclosing super-triangle are kept when
/// both endpoints are real sites, so hull edges and fully collinear inputs
/// still produce a connected graph.
fn delaunay_neighbors(sites: &[(f64, f64)]) -> Vec<Vec<usize>> {
    let n = sites.len();
    let mut neighbors = vec![Vec::new(); n];
    if n < 2 {
        return neighbors;
    }

    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(x, y) in sites {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let extent = (max_x - min_x).max(max_y - min_y).max(1.0);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    let mut points = sites.to_vec();
    points.push((mid_x - 100.0 * extent, mid_y - extent));
    points.push((mid_x, mid_y + 100.0 * extent));
    points.push((mid_x + 100.0 * extent, mid_y - extent));

    let mut triangles = vec![circumcircle(&points, [n, n + 1, n + 2])];
    for (index, &(px, py)) in sites.iter().enumerate() {
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) =
            triangles.into_iter().partition(|triangle| {
                let (cx, cy) = triangle.center;
                (px - cx).powi(2) + (py - cy).powi(2) < triangle.radius_sq
            });
        triangles = good;

        let edges: Vec<(usize, usize)> = bad
            .iter()
            .flat_map(|triangle| {
                let [a, b, c] = triangle.vertices;
                [(a, b), (b, c), (c, a)]
            })
            .collect();
        let boundary: Vec<(usize, usize)> = edges
            .iter()
            .filter(|(a, b)| {
                edges
                    .iter()
                    .filter(|(c, d)| (a == c && b == d) || (a == d && b == c))
                    .count()
                    == 1
            })
            .copied()
            .collect();

        for (a, b) in boundary {
            triangles.push(circumcircle(&points, [a, b, index]));
        }
    }

    for triangle in &triangles {
        let [a, b, c] = triangle.vertices;
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if u < n && v < n {
                neighbors[u].push(v);
                neighbors[v].push(u);
            }
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_corners_are_connected_to_adjacent_corners() {
        let index = HitTestIndex::build([
            (0, 0.0, 0.0),
            (1, 10.0, 0.0),
            (2, 10.0, 10.0),
            (3, 0.0, 10.0),
        ]);
        assert!(index.neighbors_of(0).contains(&1));
        assert!(index.neighbors_of(0).contains(&3));
    }

    #[test]
    fn collinear_sites_form_a_chain() {
        let index = HitTestIndex::build((0..5).map(|i| (i, i as f64 * 10.0, 0.0)));
        let hit = index.nearest(41.0, 3.0).expect("hit");
        assert_eq!(hit.datum, 4);
        let hit = index.nearest(-5.0, 0.0).expect("hit");
        assert_eq!(hit.datum, 0);
    }
}
