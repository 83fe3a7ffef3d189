//! Shapes imported from an external edge loop.
//!
//! The host hands over raw vertex positions and edges. The vertex order is
//! recovered by walking the edges, starting from a boundary vertex when the
//! loop is open, or from vertex 0 when it is closed.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};

use crate::{CurveError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Extents below this are treated as flat and left unscaled.
const FLAT_EXTENT: f64 = 1e-12;

/// Vertex data of an external mesh used as a shape source.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CustomSource {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Edges as vertex index pairs. Empty means `positions` is already
    /// ordered.
    pub edges: Vec<[usize; 2]>,
}

impl CustomSource {
    /// Source whose positions are already in loop order.
    #[must_use]
    pub fn ordered(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            edges: Vec::new(),
        }
    }

    /// Source with explicit edges to walk.
    #[must_use]
    pub fn with_edges(positions: Vec<Point3<f64>>, edges: Vec<[usize; 2]>) -> Self {
        Self { positions, edges }
    }

    /// Recover the loop order.
    ///
    /// Returns the vertex indices in walking order and whether the loop is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidGeometry`] if the edges do not form a
    /// single open or closed loop through every vertex.
    pub fn loop_order(&self) -> Result<(Vec<usize>, bool)> {
        let n = self.positions.len();
        if n == 0 {
            return Err(CurveError::invalid_geometry("custom source has no vertices"));
        }
        if self.edges.is_empty() {
            return Ok(((0..n).collect(), false));
        }

        let mut unique: HashSet<(usize, usize)> = HashSet::with_capacity(self.edges.len());
        let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::with_capacity(n);
        for &[a, b] in &self.edges {
            if a >= n || b >= n {
                return Err(CurveError::invalid_geometry(format!(
                    "edge ({a}, {b}) references a vertex outside 0..{n}"
                )));
            }
            if a == b {
                return Err(CurveError::invalid_geometry(format!(
                    "edge ({a}, {b}) is degenerate"
                )));
            }
            if !unique.insert((a.min(b), a.max(b))) {
                continue;
            }
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        if let Some((&v, _)) = adjacency.iter().find(|(_, nbrs)| nbrs.len() > 2) {
            return Err(CurveError::invalid_geometry(format!(
                "vertex {v} branches; custom shapes need a single edge loop"
            )));
        }
        if adjacency.len() != n {
            return Err(CurveError::invalid_geometry(format!(
                "{} of {n} vertices are not on any edge",
                n - adjacency.len()
            )));
        }

        let boundary = (0..n).find(|v| adjacency.get(v).is_some_and(|nbrs| nbrs.len() == 1));
        let closed = boundary.is_none();
        let start = boundary.unwrap_or(0);

        let mut order = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut prev = usize::MAX;
        let mut current = start;
        loop {
            order.push(current);
            visited[current] = true;
            let next = adjacency
                .get(&current)
                .and_then(|nbrs| nbrs.iter().copied().find(|&v| v != prev && !visited[v]));
            match next {
                Some(v) => {
                    prev = current;
                    current = v;
                }
                None => break,
            }
        }

        if order.len() != n {
            return Err(CurveError::invalid_geometry(format!(
                "edges form more than one loop ({} of {n} vertices reachable)",
                order.len()
            )));
        }
        Ok((order, closed))
    }
}

/// Order the source and scale it into `size`, centred on the origin.
///
/// Axes with zero target size or a flat source extent keep their original
/// extent.
pub(crate) fn sample_custom(source: &CustomSource, size: &Vector3<f64>) -> Result<Vec<Point3<f64>>> {
    let (order, _) = source.loop_order()?;
    let ordered: Vec<Point3<f64>> = order.iter().map(|&i| source.positions[i]).collect();

    let mut min = Vector3::repeat(f64::INFINITY);
    let mut max = Vector3::repeat(f64::NEG_INFINITY);
    for p in &ordered {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    let center = (min + max) * 0.5;
    let extent = max - min;
    let scale = Vector3::from_fn(|i, _| {
        if extent[i] > FLAT_EXTENT && size[i] > 0.0 {
            size[i] / extent[i]
        } else {
            1.0
        }
    });

    Ok(ordered
        .iter()
        .map(|p| Point3::from((p.coords - center).component_mul(&scale)))
        .collect())
}
