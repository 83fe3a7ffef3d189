//! Regular polygons with optional bevelled corners.

use nalgebra::{Point3, Vector2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::warn;

use crate::{CurveError, Result};

/// Sample a regular polygon fitted to `width` by `height`.
///
/// Corners start at `pi/2 - pi/sides`, so even-sided polygons sit flat on
/// the X axis. With `bevel > 0` and at least one segment, every corner is
/// replaced by `segments + 1` points on the quadratic Bézier from
/// `bevel` along the incoming edge, through the corner, to `bevel` along the
/// outgoing edge. `budget` caps the total point count, which bounds the
/// segment count.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_polygon(
    budget: usize,
    width: f64,
    height: f64,
    sides: usize,
    bevel: f64,
    segments: usize,
) -> Result<Vec<Point3<f64>>> {
    if sides < 3 {
        return Err(CurveError::invalid_geometry(format!(
            "polygon needs at least 3 sides, got {sides}"
        )));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "polygon needs positive width and height, got {width} x {height}"
        )));
    }

    let corners = fitted_corners(sides, width, height);

    let bevel = if bevel.is_finite() {
        bevel.clamp(0.0, 0.5)
    } else {
        0.0
    };
    let max_segments = (budget / sides).saturating_sub(1);
    let segments = if segments > max_segments {
        warn!(
            "Bevel segments {} exceed point budget {} for {} sides, using {}",
            segments, budget, sides, max_segments
        );
        max_segments
    } else {
        segments
    };

    if bevel <= 0.0 || segments == 0 {
        return Ok(corners
            .iter()
            .map(|c| Point3::new(c.x, c.y, 0.0))
            .collect());
    }

    let mut points = Vec::with_capacity(sides * (segments + 1));
    for k in 0..sides {
        let corner = corners[k];
        let prev = corners[(k + sides - 1) % sides];
        let next = corners[(k + 1) % sides];
        let start = corner + (prev - corner) * bevel;
        let end = corner + (next - corner) * bevel;
        for j in 0..=segments {
            let t = j as f64 / segments as f64;
            let u = 1.0 - t;
            let p = start * (u * u) + corner * (2.0 * u * t) + end * (t * t);
            points.push(Point3::new(p.x, p.y, 0.0));
        }
    }
    Ok(points)
}

/// Corners on the unit circle, rescaled so the bounding box is
/// `width` by `height` and centred on the origin.
#[allow(clippy::cast_precision_loss)]
fn fitted_corners(sides: usize, width: f64, height: f64) -> Vec<Vector2<f64>> {
    let start = FRAC_PI_2 - PI / sides as f64;
    let raw: Vec<Vector2<f64>> = (0..sides)
        .map(|k| {
            let a = start + TAU * k as f64 / sides as f64;
            Vector2::new(a.cos(), a.sin())
        })
        .collect();

    let (mut min, mut max) = (Vector2::repeat(f64::INFINITY), Vector2::repeat(f64::NEG_INFINITY));
    for c in &raw {
        min = min.inf(c);
        max = max.sup(c);
    }
    let center = (min + max) * 0.5;
    let extent = max - min;
    let scale = Vector2::new(width / extent.x, height / extent.y);

    raw.iter()
        .map(|c| (c - center).component_mul(&scale))
        .collect()
}
