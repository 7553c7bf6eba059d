//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use cf_core::numeric::ensure_finite;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })
}

/// Hydraulic diameter `4 A / P_w` [m].
pub fn hydraulic_diameter(area: f64, wetted_perimeter: f64) -> f64 {
    4.0 * area / wetted_perimeter
}

/// Scale `shape` so its entries sum to one.
///
/// Fails when the sum is not a positive finite number.
pub fn normalize(shape: &[f64]) -> ComponentResult<Vec<f64>> {
    let sum: f64 = shape.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "shape must have a positive finite sum",
        });
    }
    Ok(shape.iter().map(|s| s / sum).collect())
}
