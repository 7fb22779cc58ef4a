use crate::error::ObserverError;
use crate::tableau::{Phase, Tableau};

/// State of the engine handed to an [`Observer`] once per iteration, before
/// the selected pivot is applied.
///
/// Everything is borrowed from the running solve, so the record cannot outlive
/// the call and the tableau cannot be modified through it.
#[derive(Debug, Clone, Copy)]
pub struct Iteration<'a> {
    /// Current tableau
    pub tableau: &'a Tableau,
    /// Column headers (`x[i]`, `s[i]`, `a[i]`, `RHS`)
    pub labels: &'a [String],
    pub phase: Phase,
    /// Iteration index, counted across both phases
    pub nit: usize,
    /// `(row, column)` of the pivot about to be applied, `None` when the phase
    /// has terminated
    pub pivot: Option<(usize, usize)>,
    /// `(column, value)` of every basic variable
    pub basics: &'a [(usize, f64)],
    /// True on the last call of phase 2
    pub complete: bool,
}

/// Per-iteration callback. Returning an error aborts the solve.
pub trait Observer {
    fn observe(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), ObserverError>;
}

impl<F> Observer for F
where
    F: FnMut(&[f64], &Iteration<'_>) -> Result<(), ObserverError>,
{
    fn observe(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), ObserverError> {
        self(xk, iteration)
    }
}
