use crate::CfError;

/// Floating point type used throughout the solver.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Sum of squared element-wise differences between two equally long slices.
///
/// Slices of different length contribute only over their common prefix.
pub fn sum_sq_diff(a: &[Real], b: &[Real]) -> Real {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Arithmetic mean of two values (node-to-cell averaging).
#[inline]
pub fn avg(a: Real, b: Real) -> Real {
    0.5 * a + 0.5 * b
}
