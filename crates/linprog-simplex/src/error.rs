use thiserror::Error;

/// Error raised by an [`Observer`](crate::Observer). Any error type can be boxed into it.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// A malformed problem. Detected before any tableau is built; the solver
/// reports it as status -1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Invalid input. Length of bounds ({bounds}) is inconsistent with the length of c ({variables})")]
    BoundsLength { bounds: usize, variables: usize },
    #[error("Invalid input. Lower bound {0} is greater than upper bound {0}")]
    InvertedBound(usize),
    #[error("Invalid input. Lower bound {0} may not be +infinity")]
    LowerBoundInfinite(usize),
    #[error("Invalid input. Upper bound {0} may not be -infinity")]
    UpperBoundInfinite(usize),
    #[error("Invalid input. Bound {0} is NaN")]
    NanBound(usize),
    #[error("Invalid input. The number of rows in A_eq ({rows}) must be equal to the number of values in b_eq ({rhs})")]
    EqualityRows { rows: usize, rhs: usize },
    #[error("Invalid input. The number of rows in A_ub ({rows}) must be equal to the number of values in b_ub ({rhs})")]
    InequalityRows { rows: usize, rhs: usize },
    #[error("Invalid input. Row {row} of A_eq has {len} columns, expected the size of c ({expected})")]
    EqualityColumns { row: usize, len: usize, expected: usize },
    #[error("Invalid input. Row {row} of A_ub has {len} columns, expected the size of c ({expected})")]
    InequalityColumns { row: usize, len: usize, expected: usize },
    #[error("Invalid input. Tableau with {rows} rows does not fit {cols} columns per row")]
    TableauShape { rows: usize, cols: usize },
}

/// The selected pivot element was exactly zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("singular pivot at T[{row},{col}]")]
pub struct SingularPivot {
    pub row: usize,
    pub col: usize,
}

/// Fatal conditions that abort a solve instead of producing a result record.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("observer aborted the solve: {0}")]
    Observer(#[from] ObserverError),
}
