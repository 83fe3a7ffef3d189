//! Straight lines and sine waves.

use nalgebra::Point3;
use std::f64::consts::TAU;

use crate::{Axis, Easing};

/// Parameter of sample `i` out of `n`, spread over `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn unit_param(i: usize, n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        i as f64 / (n - 1) as f64
    }
}

/// Sample `n` points on a segment of `length` along `axis`, centred on the
/// origin, spaced by `easing`.
pub(crate) fn sample_line(
    n: usize,
    length: f64,
    axis: Axis,
    easing: Easing,
    exponent: f64,
) -> Vec<Point3<f64>> {
    let dir = axis.unit();
    (0..n)
        .map(|i| {
            let s = easing.progress(unit_param(i, n), exponent);
            Point3::from(dir * (length * (s - 0.5)))
        })
        .collect()
}

/// Sample `n` points of a sinusoid running along X.
///
/// `height` is peak-to-peak, so the wave fits the configured bounds.
pub(crate) fn sample_wave(
    n: usize,
    length: f64,
    height: f64,
    frequency: f64,
    phase: f64,
) -> Vec<Point3<f64>> {
    let amplitude = height * 0.5;
    (0..n)
        .map(|i| {
            let t = unit_param(i, n);
            let x = length * (t - 0.5);
            let y = amplitude * (TAU * frequency * t + phase).sin();
            Point3::new(x, y, 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn line_spans_length_centred() {
        let points = sample_line(4, 9.0, Axis::Z, Easing::Linear, 1.0);
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[0].z, -4.5);
        assert_relative_eq!(points[1].z, -1.5);
        assert_relative_eq!(points[3].z, 4.5);
        assert_relative_eq!(points[2].x, 0.0);
    }

    #[test]
    fn eased_line_keeps_endpoints() {
        let points = sample_line(5, 2.0, Axis::X, Easing::In, 2.0);
        assert_relative_eq!(points[0].x, -1.0);
        assert_relative_eq!(points[4].x, 1.0);
        // ease-in packs points near the start
        assert!(points[1].x - points[0].x < points[4].x - points[3].x);
    }

    #[test]
    fn wave_amplitude_is_half_height() {
        let points = sample_wave(5, 4.0, 2.0, 1.0, 0.0);
        assert_relative_eq!(points[1].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[3].y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].x, -2.0);
        assert_relative_eq!(points[4].x, 2.0);
    }

    #[test]
    fn unit_param_degenerate() {
        assert_relative_eq!(unit_param(0, 1), 0.0);
        assert_relative_eq!(unit_param(2, 3), 1.0);
    }
}
