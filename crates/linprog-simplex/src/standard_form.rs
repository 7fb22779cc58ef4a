//! Conversion of an arbitrarily bounded problem into standard form, where
//! every variable is implicitly bounded by `[0, +inf)`.

use crate::error::InvalidInput;
use crate::problem::{LinearProgram, Sense};

/// A problem whose variables are all non-negative, plus what is needed to map
/// a standard-form solution back onto the caller's variables.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StandardForm {
    pub c: Vec<f64>,
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    pub a_ub: Vec<Vec<f64>>,
    pub b_ub: Vec<f64>,
    /// Constant term of the objective accumulated by bound shifting
    pub f0: f64,
    pub transform: Transform,
}

/// Change of variables applied during standardization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transform {
    /// Column 0 is the shared floor variable
    pub floor: bool,
    /// Residual lower limit of each standard-form variable. Finite negative
    /// entries are shifts to add back, -inf marks a floor substitution.
    pub lower: Vec<f64>,
}

impl StandardForm {
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }
}

/// Build the standard form of `problem`. Maximization problems are negated here
/// so the engine always minimizes.
pub(crate) fn standardize(problem: &LinearProgram) -> Result<StandardForm, InvalidInput> {
    problem.validate()?;

    let mut n = problem.num_variables();
    let limits = problem.bounds.limits(n)?;

    let mut c = match problem.objective.sense {
        Sense::Minimize => problem.objective.coefficients.clone(),
        Sense::Maximize => problem.objective.coefficients.iter().map(|v| -v).collect(),
    };
    let mut a_eq = problem.a_eq.clone();
    let mut b_eq = problem.b_eq.clone();
    let mut a_ub = problem.a_ub.clone();
    let mut b_ub = problem.b_ub.clone();
    let (mut lower, mut upper): (Vec<f64>, Vec<f64>) = limits.into_iter().unzip();

    let floor = lower.iter().any(|&lb| lb == f64::NEG_INFINITY);
    if floor {
        n += 1;
        lower.insert(0, 0.0);
        upper.insert(0, f64::INFINITY);
        c.insert(0, 0.0);
        for row in a_eq.iter_mut().chain(a_ub.iter_mut()) {
            row.insert(0, 0.0);
        }
    }

    // Finite bounds that can be written as plain rows
    for i in 0..n {
        if lower[i].is_finite() && lower[i] > 0.0 {
            let mut row = vec![0.0; n];
            row[i] = -1.0;
            a_ub.push(row);
            b_ub.push(-lower[i]);
            lower[i] = 0.0;
        }
        if upper[i].is_finite() {
            let mut row = vec![0.0; n];
            row[i] = 1.0;
            a_ub.push(row);
            b_ub.push(upper[i]);
            upper[i] = f64::INFINITY;
        }
    }

    // Negative lower limits need a change of variables
    let mut f0 = 0.0;
    for i in 0..n {
        let lb = lower[i];
        if lb.is_finite() && lb < 0.0 {
            // x[i] = x'[i] + lb
            for (b, row) in b_eq.iter_mut().zip(&a_eq) {
                *b -= row[i] * lb;
            }
            for (b, row) in b_ub.iter_mut().zip(&a_ub) {
                *b -= row[i] * lb;
            }
            f0 -= c[i] * lb;
        } else if lb == f64::NEG_INFINITY {
            // x[i] = u[i] - v[0]
            for row in a_eq.iter_mut().chain(a_ub.iter_mut()) {
                let coef = row[i];
                row[0] -= coef;
            }
            let cost = c[i];
            c[0] -= cost;
        }
    }

    Ok(StandardForm {
        c,
        a_eq,
        b_eq,
        a_ub,
        b_ub,
        f0,
        transform: Transform { floor, lower },
    })
}

impl Transform {
    /// Map a standard-form solution back onto the caller's variables.
    pub fn recover(&self, standard: &[f64]) -> Vec<f64> {
        let mut x: Vec<f64> = standard
            .iter()
            .zip(&self.lower)
            .map(|(&v, &lb)| if lb.is_finite() { v + lb } else { v })
            .collect();

        if self.floor {
            let floor_value = x[0];
            for (xi, &lb) in x.iter_mut().zip(&self.lower).skip(1) {
                if lb == f64::NEG_INFINITY {
                    *xi -= floor_value;
                }
            }
            x.remove(0);
        }
        x
    }
}
