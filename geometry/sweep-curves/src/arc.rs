//! Circular arcs and ellipses.
//!
//! Both use direct trigonometric evaluation in the local XY plane.

use nalgebra::Point3;
use std::f64::consts::TAU;

use crate::line::unit_param;
use crate::{CurveError, Result};

/// Sample an arc spanning `chord`, with sagitta `factor * chord / 2`.
///
/// `factor = 1` gives a half circle. The chord lies on the X axis with its
/// endpoints at `y = 0`; the apex sits at `y = sagitta`.
pub(crate) fn sample_arc(n: usize, chord: f64, factor: f64) -> Result<Vec<Point3<f64>>> {
    if !(factor > 0.0 && factor <= 1.0) {
        return Err(CurveError::invalid_geometry(format!(
            "arc factor must be in (0, 1], got {factor}"
        )));
    }
    if chord <= 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "arc chord must be positive, got {chord}"
        )));
    }

    let half = chord * 0.5;
    let sagitta = factor * half;
    let radius = (half * half + sagitta * sagitta) / (2.0 * sagitta);
    let half_angle = (half / radius).clamp(-1.0, 1.0).asin();
    // Distance from the centre to the chord.
    let drop = radius - sagitta;

    Ok((0..n)
        .map(|i| {
            let phi = -half_angle + 2.0 * half_angle * unit_param(i, n);
            Point3::new(radius * phi.sin(), radius * phi.cos() - drop, 0.0)
        })
        .collect())
}

/// Sample `n` points around an ellipse of `width` by `height`.
///
/// With `bump_steps > 0` the radius swells by
/// `amount * (0.5 + 0.5 cos(steps * a))^exponent` at each step.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_ellipse(
    n: usize,
    width: f64,
    height: f64,
    bump_steps: usize,
    bump_amount: f64,
    bump_exponent: f64,
) -> Result<Vec<Point3<f64>>> {
    if width <= 0.0 || height <= 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "ellipse needs positive width and height, got {width} x {height}"
        )));
    }

    let rx = width * 0.5;
    let ry = height * 0.5;
    let bumped = bump_steps > 0 && bump_amount != 0.0;
    let exponent = if bump_exponent.is_finite() {
        bump_exponent.max(crate::ease::MIN_EXPONENT)
    } else {
        1.0
    };

    Ok((0..n)
        .map(|i| {
            let a = TAU * i as f64 / n as f64;
            let scale = if bumped {
                let wave = 0.5 + 0.5 * (bump_steps as f64 * a).cos();
                1.0 + bump_amount * wave.powf(exponent)
            } else {
                1.0
            };
            Point3::new(rx * a.cos() * scale, ry * a.sin() * scale, 0.0)
        })
        .collect())
}
