use crate::error::InvalidInput;

/// A linear program:
///
/// ```text
/// minimize (or maximize)  c^T x
/// subject to              A_ub x <= b_ub
///                         A_eq x == b_eq
///                         lb <= x <= ub
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearProgram {
    /// Objective function
    pub objective: Objective,
    /// Equality constraint matrix, one row per constraint
    pub a_eq: Vec<Vec<f64>>,
    /// Equality right-hand sides
    pub b_eq: Vec<f64>,
    /// Upper-bound inequality constraint matrix, one row per constraint
    pub a_ub: Vec<Vec<f64>>,
    /// Inequality right-hand sides
    pub b_ub: Vec<f64>,
    /// Per-variable bounds
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub sense: Sense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// Lower and upper limit of a single variable. `None` means unbounded in
/// that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bound {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`, the default for every variable.
    pub fn non_negative() -> Self {
        Self::new(Some(0.0), None)
    }

    /// `(-inf, +inf)`
    pub fn free() -> Self {
        Self::new(None, None)
    }

    pub fn at_least(lower: f64) -> Self {
        Self::new(Some(lower), None)
    }

    pub fn at_most(upper: f64) -> Self {
        Self::new(None, Some(upper))
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    /// Lower limit with `None` widened to -inf.
    pub fn lower_limit(&self) -> f64 {
        self.lower.unwrap_or(f64::NEG_INFINITY)
    }

    /// Upper limit with `None` widened to +inf.
    pub fn upper_limit(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::non_negative()
    }
}

impl From<(Option<f64>, Option<f64>)> for Bound {
    fn from((lower, upper): (Option<f64>, Option<f64>)) -> Self {
        Self::new(lower, upper)
    }
}

impl From<(f64, f64)> for Bound {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(Some(lower), Some(upper))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bounds {
    /// Every variable is non-negative.
    #[default]
    Default,
    /// The same bound applies to every variable.
    Uniform(Bound),
    /// One bound per variable.
    PerVariable(Vec<Bound>),
}

impl Bounds {
    /// Expand into one `(lower, upper)` limit pair per variable.
    pub fn limits(&self, n: usize) -> Result<Vec<(f64, f64)>, InvalidInput> {
        let limits: Vec<(f64, f64)> = match self {
            Bounds::Default => vec![(0.0, f64::INFINITY); n],
            Bounds::Uniform(b) => vec![(b.lower_limit(), b.upper_limit()); n],
            Bounds::PerVariable(list) => {
                if list.len() != n {
                    return Err(InvalidInput::BoundsLength {
                        bounds: list.len(),
                        variables: n,
                    });
                }
                list.iter().map(|b| (b.lower_limit(), b.upper_limit())).collect()
            }
        };

        for (i, &(lb, ub)) in limits.iter().enumerate() {
            if lb.is_nan() || ub.is_nan() {
                return Err(InvalidInput::NanBound(i));
            }
            if lb == f64::INFINITY {
                return Err(InvalidInput::LowerBoundInfinite(i));
            }
            if ub == f64::NEG_INFINITY {
                return Err(InvalidInput::UpperBoundInfinite(i));
            }
            if lb > ub {
                return Err(InvalidInput::InvertedBound(i));
            }
        }
        Ok(limits)
    }
}

impl LinearProgram {
    /// A minimization problem over `coefficients.len()` non-negative variables.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self {
            objective: Objective {
                coefficients,
                sense: Sense::Minimize,
            },
            a_eq: Vec::new(),
            b_eq: Vec::new(),
            a_ub: Vec::new(),
            b_ub: Vec::new(),
            bounds: Bounds::Default,
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        let mut problem = Self::new(coefficients);
        problem.objective.sense = Sense::Maximize;
        problem
    }

    pub fn with_equalities(mut self, a_eq: Vec<Vec<f64>>, b_eq: Vec<f64>) -> Self {
        self.a_eq = a_eq;
        self.b_eq = b_eq;
        self
    }

    pub fn with_inequalities(mut self, a_ub: Vec<Vec<f64>>, b_ub: Vec<f64>) -> Self {
        self.a_ub = a_ub;
        self.b_ub = b_ub;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Append a single constraint row. `>=` rows are stored as negated `<=` rows.
    pub fn add_constraint(&mut self, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        match op {
            ConstraintOp::Le => {
                self.a_ub.push(coefficients);
                self.b_ub.push(rhs);
            }
            ConstraintOp::Ge => {
                self.a_ub.push(coefficients.into_iter().map(|a| -a).collect());
                self.b_ub.push(-rhs);
            }
            ConstraintOp::Eq => {
                self.a_eq.push(coefficients);
                self.b_eq.push(rhs);
            }
        }
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.b_eq.len() + self.b_ub.len()
    }

    /// Check shapes and bounds without solving.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let n = self.num_variables();
        self.bounds.limits(n)?;

        if self.a_eq.len() != self.b_eq.len() {
            return Err(InvalidInput::EqualityRows {
                rows: self.a_eq.len(),
                rhs: self.b_eq.len(),
            });
        }
        if self.a_ub.len() != self.b_ub.len() {
            return Err(InvalidInput::InequalityRows {
                rows: self.a_ub.len(),
                rhs: self.b_ub.len(),
            });
        }
        if let Some((row, r)) = self.a_eq.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(InvalidInput::EqualityColumns {
                row,
                len: r.len(),
                expected: n,
            });
        }
        if let Some((row, r)) = self.a_ub.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(InvalidInput::InequalityColumns {
                row,
                len: r.len(),
                expected: n,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ge_constraint_is_negated() {
        let mut problem = LinearProgram::new(vec![1.0, 1.0]);
        problem.add_constraint(vec![1.0, 2.0], ConstraintOp::Ge, 3.0);
        problem.add_constraint(vec![1.0, 0.0], ConstraintOp::Le, 5.0);
        problem.add_constraint(vec![1.0, 1.0], ConstraintOp::Eq, 2.0);

        assert_eq!(problem.a_ub, vec![vec![-1.0, -2.0], vec![1.0, 0.0]]);
        assert_eq!(problem.b_ub, vec![-3.0, 5.0]);
        assert_eq!(problem.a_eq, vec![vec![1.0, 1.0]]);
        assert_eq!(problem.b_eq, vec![2.0]);
        assert_eq!(problem.num_constraints(), 3);
    }

    #[test]
    fn test_bounds_expansion() {
        assert_eq!(
            Bounds::Default.limits(2).unwrap(),
            vec![(0.0, f64::INFINITY), (0.0, f64::INFINITY)]
        );
        assert_eq!(
            Bounds::Uniform(Bound::between(-1.0, 1.0)).limits(3).unwrap(),
            vec![(-1.0, 1.0); 3]
        );
        assert_eq!(
            Bounds::PerVariable(vec![Bound::free(), Bound::at_most(4.0)]).limits(2).unwrap(),
            vec![(f64::NEG_INFINITY, f64::INFINITY), (f64::NEG_INFINITY, 4.0)]
        );
    }

    #[test]
    fn test_invalid_bounds() {
        assert_eq!(
            Bounds::PerVariable(vec![Bound::free()]).limits(2),
            Err(InvalidInput::BoundsLength { bounds: 1, variables: 2 })
        );
        assert_eq!(
            Bounds::PerVariable(vec![Bound::free(), Bound::between(5.0, 2.0)]).limits(2),
            Err(InvalidInput::InvertedBound(1))
        );
        assert_eq!(
            Bounds::Uniform(Bound::at_least(f64::INFINITY)).limits(1),
            Err(InvalidInput::LowerBoundInfinite(0))
        );
        assert_eq!(
            Bounds::Uniform(Bound::at_most(f64::NEG_INFINITY)).limits(1),
            Err(InvalidInput::UpperBoundInfinite(0))
        );
        assert_eq!(
            Bounds::Uniform(Bound::at_least(f64::NAN)).limits(1),
            Err(InvalidInput::NanBound(0))
        );
    }

    #[test]
    fn test_validate_shapes() {
        let problem = LinearProgram::new(vec![1.0, 2.0]).with_equalities(vec![vec![1.0, 1.0]], vec![]);
        assert_eq!(problem.validate(), Err(InvalidInput::EqualityRows { rows: 1, rhs: 0 }));

        let problem = LinearProgram::new(vec![1.0, 2.0]).with_inequalities(vec![], vec![1.0]);
        assert_eq!(problem.validate(), Err(InvalidInput::InequalityRows { rows: 0, rhs: 1 }));

        // Ragged matrix
        let problem = LinearProgram::new(vec![1.0, 2.0])
            .with_inequalities(vec![vec![1.0, 1.0], vec![1.0]], vec![1.0, 2.0]);
        assert_eq!(
            problem.validate(),
            Err(InvalidInput::InequalityColumns { row: 1, len: 1, expected: 2 })
        );

        let problem = LinearProgram::new(vec![1.0]).with_equalities(vec![vec![1.0, 1.0]], vec![1.0]);
        assert_eq!(
            problem.validate(),
            Err(InvalidInput::EqualityColumns { row: 0, len: 2, expected: 1 })
        );

        let problem = LinearProgram::maximize(vec![1.0, 2.0])
            .with_inequalities(vec![vec![1.0, 1.0]], vec![4.0])
            .with_bounds(Bounds::Uniform(Bound::between(0.0, 3.0)));
        assert_eq!(problem.validate(), Ok(()));
    }
}
