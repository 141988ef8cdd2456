//! Zero-order-hold discretization of the continuous area models.
//!
//! The combined input `[B1 | B2]` is assumed held constant over each
//! sampling interval. Discretization uses the augmented-matrix exponential
//!
//! ```text
//! exp( [A  B] * dt )  =  [Ad  Bd]
//!      [0  0]            [0    I]
//! ```
//!
//! backed by nalgebra's `DMatrix::exp`. The output row is unaffected by the
//! hold, so `Cd = C`.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::Error;
use crate::model::area::AreaModel;
use crate::model::layout::StateLayout;

/// Discrete-time state-space matrices for one area at a fixed time step.
#[derive(Debug, Clone)]
pub struct DiscreteAreaModel {
    /// State layout, identical to the continuous model's.
    pub layout: StateLayout,
    /// Discrete system matrix.
    pub ad: DMatrix<f64>,
    /// Discrete disturbance input matrix (load, tie-line flow), 2 columns.
    pub b1d: DMatrix<f64>,
    /// Discrete control input matrix, 1 column.
    pub b2d: DMatrix<f64>,
    /// Output row, unchanged by the hold; the output is `cd.dot(x)`.
    pub cd: DVector<f64>,
}

impl DiscreteAreaModel {
    /// Discretizes one continuous area model at sample interval `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Numerical`] when `dt <= 0` or the matrix
    /// exponential produces non-finite entries.
    pub fn from_continuous(model: &AreaModel, dt: f64) -> Result<Self, Error> {
        let b = horzcat(&model.b1, &model.b2);
        let (ad, bd) = zoh(&model.a, &b, dt)?;

        // split the combined input back into disturbance and control columns
        let b1d = bd.columns(0, model.b1.ncols()).into_owned();
        let b2d = bd.columns(model.b1.ncols(), model.b2.ncols()).into_owned();

        Ok(Self {
            layout: model.layout,
            ad,
            b1d,
            b2d,
            cd: model.c.clone(),
        })
    }
}

impl fmt::Display for DiscreteAreaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ad =\n{}", self.ad)?;
        writeln!(f, "B1d =\n{}", self.b1d)?;
        writeln!(f, "B2d =\n{}", self.b2d)?;
        write!(f, "Cd = {}", self.cd.transpose())
    }
}

/// Zero-order-hold discretization of `(A, B)` at sample interval `dt`.
///
/// Returns `(Ad, Bd)` with `Ad = exp(A*dt)` and
/// `Bd = integral_0^dt exp(A*s) ds * B`, both read off the exponential of
/// the augmented matrix.
///
/// # Errors
///
/// Returns [`Error::Numerical`] when `A` is not square, `B` has a
/// mismatched row count, `dt <= 0`, or the exponential is non-finite.
pub fn zoh(a: &DMatrix<f64>, b: &DMatrix<f64>, dt: f64) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::numerical(format!(
            "system matrix must be square (got {}x{})",
            a.nrows(),
            a.ncols()
        )));
    }
    if b.nrows() != n {
        return Err(Error::numerical(format!(
            "input matrix has {} rows, expected {n}",
            b.nrows()
        )));
    }
    if dt <= 0.0 {
        return Err(Error::numerical(format!("sample interval must be > 0 (got {dt})")));
    }

    let p = b.ncols();
    let mut aug = DMatrix::zeros(n + p, n + p);
    aug.view_mut((0, 0), (n, n)).copy_from(&(a * dt));
    aug.view_mut((0, n), (n, p)).copy_from(&(b * dt));

    let exp = aug.exp();
    if exp.iter().any(|v| !v.is_finite()) {
        return Err(Error::numerical(
            "matrix exponential produced non-finite entries",
        ));
    }

    let ad = exp.view((0, 0), (n, n)).into_owned();
    let bd = exp.view((0, n), (n, p)).into_owned();
    Ok((ad, bd))
}

/// Horizontally concatenates two matrices with equal row counts.
fn horzcat(left: &DMatrix<f64>, right: &DMatrix<f64>) -> DMatrix<f64> {
    debug_assert_eq!(left.nrows(), right.nrows());
    let mut out = DMatrix::zeros(left.nrows(), left.ncols() + right.ncols());
    out.view_mut((0, 0), (left.nrows(), left.ncols())).copy_from(left);
    out.view_mut((0, left.ncols()), (right.nrows(), right.ncols()))
        .copy_from(right);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::area::AreaModel;

    fn sample_area() -> AreaModel {
        AreaModel::new(0.015, 5.031, &[0.4], &[0.08], &[3.0], &[1.0], &[0.0, 0.2]).unwrap()
    }

    #[test]
    fn small_dt_recovers_the_continuous_matrices() {
        let model = sample_area();
        let dt = 1e-6;
        let discrete = DiscreteAreaModel::from_continuous(&model, dt).unwrap();

        let n = model.layout.dim();
        let ad_rate = (&discrete.ad - DMatrix::identity(n, n)) / dt;
        let a_err = (&ad_rate - &model.a).abs().max();
        assert!(a_err < 1e-3, "(Ad-I)/dt deviates from A by {a_err}");

        let b1_err = (&discrete.b1d / dt - &model.b1).abs().max();
        let b2_err = (&discrete.b2d / dt - &model.b2).abs().max();
        assert!(b1_err < 1e-3, "B1d/dt deviates from B1 by {b1_err}");
        assert!(b2_err < 1e-3, "B2d/dt deviates from B2 by {b2_err}");
    }

    #[test]
    fn output_row_is_unchanged() {
        let model = sample_area();
        let discrete = DiscreteAreaModel::from_continuous(&model, 0.01).unwrap();
        assert_eq!(discrete.cd, model.c);
        assert_eq!(discrete.layout, model.layout);
    }

    #[test]
    fn split_matches_input_column_counts() {
        let model = sample_area();
        let discrete = DiscreteAreaModel::from_continuous(&model, 0.01).unwrap();
        assert_eq!(discrete.b1d.ncols(), 2);
        assert_eq!(discrete.b2d.ncols(), 1);
        assert_eq!(discrete.ad.nrows(), model.layout.dim());
    }

    #[test]
    fn scalar_integrator_has_exact_hold() {
        // dx/dt = u  =>  Ad = 1, Bd = dt
        let a = DMatrix::from_row_slice(1, 1, &[0.0]);
        let b = DMatrix::from_row_slice(1, 1, &[1.0]);
        let (ad, bd) = zoh(&a, &b, 0.5).unwrap();
        assert!((ad[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((bd[(0, 0)] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_square_system_matrix() {
        let a = DMatrix::zeros(2, 3);
        let b = DMatrix::zeros(2, 1);
        assert!(matches!(zoh(&a, &b, 0.01), Err(Error::Numerical { .. })));
    }

    #[test]
    fn rejects_non_positive_sample_interval() {
        let model = sample_area();
        assert!(DiscreteAreaModel::from_continuous(&model, 0.0).is_err());
        assert!(DiscreteAreaModel::from_continuous(&model, -0.01).is_err());
    }
}
