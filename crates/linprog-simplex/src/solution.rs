use std::fmt;

use crate::error::InvalidInput;

/// The result of solving a linear program
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizeResult {
    /// Value of each caller variable
    pub x: Vec<f64>,
    /// Objective value in the caller's sense (minimized or maximized)
    pub fun: f64,
    /// Iterations performed across both phases
    pub nit: usize,
    pub status: Status,
    /// Human-readable description of `status`
    pub message: String,
    /// True only for `Status::Success`
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Malformed problem, nothing was solved
    InvalidInput,
    /// An optimal solution was found
    Success,
    /// The iteration cap was reached first
    IterationLimit,
    /// Phase 1 could not reach a feasible starting point
    Infeasible,
    /// The objective decreases without bound
    Unbounded,
    /// A zero pivot element was selected
    SingularPivot,
}

impl Status {
    /// Numeric exit code: -1 invalid input, 0 success, 1 iteration limit,
    /// 2 infeasible, 3 unbounded, 4 singular pivot.
    pub fn code(self) -> i32 {
        match self {
            Status::InvalidInput => -1,
            Status::Success => 0,
            Status::IterationLimit => 1,
            Status::Infeasible => 2,
            Status::Unbounded => 3,
            Status::SingularPivot => 4,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Status::InvalidInput => "Invalid input.",
            Status::Success => "Optimization terminated successfully.",
            Status::IterationLimit => "Iteration limit reached.",
            Status::Infeasible => "Optimization failed. Unable to find a feasible starting point.",
            Status::Unbounded => "Optimization failed. The problem appears to be unbounded.",
            Status::SingularPivot => "Optimization failed. Singular matrix encountered.",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl OptimizeResult {
    pub fn new(x: Vec<f64>, fun: f64, nit: usize, status: Status, message: impl Into<String>) -> Self {
        Self {
            x,
            // + 0.0 turns -0.0 into 0.0
            fun: fun + 0.0,
            nit,
            status,
            message: message.into(),
            success: status == Status::Success,
        }
    }

    /// Status -1 result: zero solution, no iterations.
    pub fn invalid(n: usize, error: &InvalidInput) -> Self {
        Self::new(vec![0.0; n], 0.0, 0, Status::InvalidInput, error.to_string())
    }
}
