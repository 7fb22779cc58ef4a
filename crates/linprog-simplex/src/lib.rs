mod error;
mod observer;
mod problem;
mod simplex;
mod solution;
mod standard_form;
mod tableau;

pub use error::{InvalidInput, ObserverError, SingularPivot, SolveError};
pub use observer::{Iteration, Observer};
pub use problem::{Bound, Bounds, ConstraintOp, LinearProgram, Objective, Sense};
pub use simplex::{PhaseOutcome, Solver};
pub use solution::{OptimizeResult, Status};
pub use tableau::{ColumnRole, Phase, Tableau};
