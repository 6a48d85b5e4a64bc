//! Linear algebra utilities.
//!
//! Dense Gaussian elimination and normal-equation assembly for the small
//! least-squares systems solved by the inverse transform.

use ndarray::{Array1, Array2};
use rope_types::error::{RopeError, RopeResult};

/// Pivot magnitude below which a system is treated as singular.
const SINGULAR_PIVOT: f64 = 1e-300;

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// `A` must be square with `b.len()` rows.
pub fn solve_dense(a: &Array2<f64>, b: &Array1<f64>) -> RopeResult<Array1<f64>> {
    let (n, m) = a.dim();
    if n != m || b.len() != n {
        return Err(RopeError::LinAlg(format!(
            "solve_dense expects square system, got A={n}x{m}, b={}",
            b.len()
        )));
    }

    let mut lu = a.clone();
    let mut x = b.clone();

    for col in 0..n {
        let mut pivot = col;
        let mut pivot_abs = lu[[col, col]].abs();
        for row in (col + 1)..n {
            let v = lu[[row, col]].abs();
            if v > pivot_abs {
                pivot = row;
                pivot_abs = v;
            }
        }
        if !pivot_abs.is_finite() || pivot_abs < SINGULAR_PIVOT {
            return Err(RopeError::LinAlg(format!(
                "Singular matrix: pivot {pivot_abs:e} in column {col}"
            )));
        }
        if pivot != col {
            for k in 0..n {
                lu.swap([col, k], [pivot, k]);
            }
            x.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = lu[[row, col]] / lu[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                lu[[row, k]] -= factor * lu[[col, k]];
            }
            x[row] -= factor * x[col];
        }
    }

    // Back substitution.
    for row in (0..n).rev() {
        let mut sum = x[row];
        for k in (row + 1)..n {
            sum -= lu[[row, k]] * x[k];
        }
        x[row] = sum / lu[[row, row]];
    }

    Ok(x)
}

/// Gauss-Newton normal equations: returns `(JᵀJ, Jᵀr)`.
pub fn normal_equations(jac: &Array2<f64>, residual: &Array1<f64>) -> (Array2<f64>, Array1<f64>) {
    let jt = jac.t();
    (jt.dot(jac), jt.dot(residual))
}

pub fn norm_l2(v: &Array1<f64>) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn norm_inf(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}
