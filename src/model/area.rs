//! Continuous-time state-space model of one grid area.
//!
//! One area aggregates a generator (swing dynamics), `m` turbine-governor
//! chains with droop feedback, and the tie-line coupling to every other
//! area. The builder assembles the `A`, `B1`, `B2`, `C` matrices of
//!
//! ```text
//! dx/dt = A x + B1 w + B2 u        w = [load change, tie-line flow]
//! y     = C x                      y = area control error (ACE)
//! ```
//!
//! from scalar and per-unit physical parameters.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::Error;
use crate::model::layout::StateLayout;

/// Continuous state-space matrices for one area, immutable once built.
#[derive(Debug, Clone)]
pub struct AreaModel {
    /// State layout shared with the discretizer and the engine.
    pub layout: StateLayout,
    /// System matrix, `(2+2m) x (2+2m)`.
    pub a: DMatrix<f64>,
    /// Disturbance input matrix (load, tie-line flow), `(2+2m) x 2`.
    pub b1: DMatrix<f64>,
    /// Control input matrix (AGC signal), `(2+2m) x 1`.
    pub b2: DMatrix<f64>,
    /// Output row mapping state to ACE, stored as a column vector of
    /// length `2+2m`; the output is `c.dot(x)`.
    pub c: DVector<f64>,
    /// Frequency bias factor used in the ACE output row.
    pub beta: f64,
}

impl AreaModel {
    /// Builds the continuous model for one area.
    ///
    /// # Arguments
    ///
    /// * `d` - Load damping coefficient
    /// * `h` - Aggregate inertia constant (must be > 0)
    /// * `tt` - Turbine time constants, one per governor-turbine unit
    /// * `tg` - Governor time constants, same length as `tt`
    /// * `r` - Droop coefficients, same length as `tt`
    /// * `alpha` - AGC participation factors, same length as `tt`; must sum
    ///   to 1 (zero-padded entries allowed) when the area has more than one
    ///   unit
    /// * `tie_row` - This area's row of the tie-line coupling matrix
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the unit count is zero, the parameter
    /// vectors disagree in length, any of `h`, `tt[j]`, `tg[j]`, `r[j]` is
    /// zero or negative, or `alpha` does not sum to 1.
    pub fn new(
        d: f64,
        h: f64,
        tt: &[f64],
        tg: &[f64],
        r: &[f64],
        alpha: &[f64],
        tie_row: &[f64],
    ) -> Result<Self, Error> {
        let m = tt.len();
        if m < 1 {
            return Err(Error::config("tt", "area needs at least one governor-turbine unit"));
        }
        if tg.len() != m || r.len() != m || alpha.len() != m {
            return Err(Error::config(
                "tt/tg/r/alpha",
                format!(
                    "per-unit parameter vectors must share one length (got {}, {}, {}, {})",
                    m,
                    tg.len(),
                    r.len(),
                    alpha.len()
                ),
            ));
        }
        if h <= 0.0 {
            return Err(Error::config("h", "inertia constant must be > 0"));
        }
        for (j, &v) in tt.iter().enumerate() {
            if v <= 0.0 {
                return Err(Error::config(format!("tt[{j}]"), "turbine time constant must be > 0"));
            }
        }
        for (j, &v) in tg.iter().enumerate() {
            if v <= 0.0 {
                return Err(Error::config(format!("tg[{j}]"), "governor time constant must be > 0"));
            }
        }
        for (j, &v) in r.iter().enumerate() {
            if v <= 0.0 {
                return Err(Error::config(format!("r[{j}]"), "droop coefficient must be > 0"));
            }
        }
        let alpha_sum: f64 = alpha.iter().sum();
        if m > 1 && (alpha_sum - 1.0).abs() > 1e-6 {
            return Err(Error::config(
                "alpha",
                format!("participation factors must sum to 1 (got {alpha_sum})"),
            ));
        }

        let layout = StateLayout::new(m);
        let n = layout.dim();
        let hi_inv = 1.0 / (2.0 * h);
        let sum_tij: f64 = tie_row.iter().sum();
        let beta = d + 1.0 / r.iter().map(|rj| 1.0 / rj).sum::<f64>();

        let mut a = DMatrix::zeros(n, n);
        a[(StateLayout::FREQ, StateLayout::FREQ)] = -d * hi_inv;
        a[(StateLayout::FREQ, StateLayout::TIE)] = -hi_inv;
        a[(StateLayout::TIE, StateLayout::FREQ)] = 2.0 * PI * sum_tij;
        for j in 0..m {
            // turbine power feeds the swing equation
            a[(StateLayout::FREQ, layout.turbine(j))] = hi_inv;
            a[(layout.turbine(j), layout.turbine(j))] = -1.0 / tt[j];
            a[(layout.turbine(j), layout.governor(j))] = 1.0 / tt[j];
            // droop feedback from frequency deviation into the valve
            a[(layout.governor(j), StateLayout::FREQ)] = -1.0 / (tg[j] * r[j]);
            a[(layout.governor(j), layout.governor(j))] = -1.0 / tg[j];
        }

        let mut b1 = DMatrix::zeros(n, 2);
        b1[(StateLayout::FREQ, 0)] = -hi_inv;
        b1[(StateLayout::TIE, 1)] = -2.0 * PI;

        let mut b2 = DMatrix::zeros(n, 1);
        for j in 0..m {
            b2[(layout.governor(j), 0)] = alpha[j] / tg[j];
        }

        let mut c = DVector::zeros(n);
        c[StateLayout::FREQ] = beta;
        c[StateLayout::TIE] = 1.0;

        Ok(Self {
            layout,
            a,
            b1,
            b2,
            c,
            beta,
        })
    }
}

impl fmt::Display for AreaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A =\n{}", self.a)?;
        writeln!(f, "B1 =\n{}", self.b1)?;
        writeln!(f, "B2 =\n{}", self.b2)?;
        write!(f, "C = {}", self.c.transpose())
    }
}
