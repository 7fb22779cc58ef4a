use std::cmp::Ordering;
use std::convert::Infallible;

use log::{debug, trace, warn};

use crate::error::SolveError;
use crate::observer::{Iteration, Observer};
use crate::problem::{LinearProgram, Sense};
use crate::solution::{OptimizeResult, Status};
use crate::standard_form::standardize;
use crate::tableau::{Phase, Tableau};

/// Two-phase simplex solver for linear programming problems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solver {
    /// Maximum iterations, counted across both phases
    max_iterations: usize,
    /// Absolute tolerance for optimality and phase 1 feasibility
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
        }
    }
}

/// What one run of the engine over a single phase produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    /// Values of the structural variables of the tableau
    pub x: Vec<f64>,
    /// Iteration count, including the starting offset
    pub nit: usize,
    pub status: Status,
    pub message: String,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LinearProgram) -> OptimizeResult {
        let Ok(result) = self.solve_inner(problem, &mut Silent);
        result
    }

    /// Like [`Solver::solve`], calling `observer` once per iteration. An error
    /// returned by the observer aborts the solve and is passed through.
    pub fn solve_observed(
        &self,
        problem: &LinearProgram,
        observer: &mut dyn Observer,
    ) -> Result<OptimizeResult, SolveError> {
        self.solve_inner(problem, &mut Observed(observer))
    }

    fn solve_inner<N: Notifier>(
        &self,
        problem: &LinearProgram,
        notifier: &mut N,
    ) -> Result<OptimizeResult, N::Error> {
        let form = match standardize(problem) {
            Ok(form) => form,
            Err(err) => {
                debug!("rejected problem: {err}");
                return Ok(OptimizeResult::invalid(problem.num_variables(), &err));
            }
        };
        // The engine minimizes; report maximization results in the caller's sense
        let sign = match problem.objective.sense {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        };

        let mut tableau = Tableau::build(&form);
        let transform = form.transform;

        let phase1 = self.run_phase_with(&mut tableau, 0, notifier)?;
        let pseudo = tableau.corner();
        let failure = match phase1.status {
            Status::IterationLimit => Some((Status::IterationLimit, phase1.message)),
            _ if pseudo.abs() >= self.tolerance => {
                debug!("phase 1 ended with pseudo-objective {pseudo}, problem is infeasible");
                Some((Status::Infeasible, Status::Infeasible.message().to_string()))
            }
            Status::Success => None,
            other => Some((other, phase1.message)),
        };
        if let Some((status, message)) = failure {
            return Ok(OptimizeResult::new(
                transform.recover(&phase1.x),
                sign * tableau.objective_value(),
                phase1.nit,
                status,
                message,
            ));
        }

        tableau.drop_phase_one();
        let phase2 = self.run_phase_with(&mut tableau, phase1.nit, notifier)?;

        Ok(OptimizeResult::new(
            transform.recover(&phase2.x),
            sign * tableau.objective_value(),
            phase2.nit,
            phase2.status,
            phase2.message,
        ))
    }

    /// Pivot `tableau` until its active objective row is optimal, the problem
    /// turns out unbounded or the iteration cap is hit.
    ///
    /// `nit0` is the iteration count carried over from an earlier phase. The
    /// returned solution covers the structural columns of `tableau`.
    ///
    /// Cycling is only guarded heuristically: once more than `2^n` iterations
    /// have passed, returning to the tableau the phase started from makes the
    /// ratio test pick the next row among those tied for the minimum ratio.
    /// Termination is not guaranteed.
    pub fn run_phase(
        &self,
        tableau: &mut Tableau,
        nit0: usize,
        observer: Option<&mut (dyn Observer + '_)>,
    ) -> Result<PhaseOutcome, SolveError> {
        match observer {
            Some(observer) => self.run_phase_with(tableau, nit0, &mut Observed(observer)),
            None => {
                let Ok(outcome) = self.run_phase_with(tableau, nit0, &mut Silent);
                Ok(outcome)
            }
        }
    }

    fn run_phase_with<N: Notifier>(
        &self,
        tableau: &mut Tableau,
        nit0: usize,
        notifier: &mut N,
    ) -> Result<PhaseOutcome, N::Error> {
        let phase = tableau.phase();
        let snapshot = tableau.clone();
        let cycle_check_after = u32::try_from(tableau.n_vars())
            .ok()
            .and_then(|n| 1usize.checked_shl(n));
        let labels = if N::ACTIVE { tableau.labels() } else { Vec::new() };

        debug!(
            "phase {phase}: {} constraint rows, starting at iteration {nit0}",
            tableau.constraint_rows()
        );

        let mut nit = nit0;
        let mut cycle = 0;
        let (status, message) = loop {
            if nit >= self.max_iterations {
                break (Status::IterationLimit, Status::IterationLimit.message().to_string());
            }

            if returned_to_start(tableau, &snapshot, nit, nit0, cycle_check_after) {
                cycle += 1;
                warn!("phase {phase}: cycling detected at iteration {nit}");
            }

            let Some(pivcol) = entering_column(tableau, self.tolerance) else {
                notify(notifier, tableau, &labels, nit, None, phase == Phase::Two)?;
                break (Status::Success, Status::Success.message().to_string());
            };

            // A repeated tableau repeats its entering column, which had a
            // leaving row the first time, so `cycle` never ends a phase here
            let Some(pivrow) = leaving_row(tableau, pivcol, cycle) else {
                break (Status::Unbounded, Status::Unbounded.message().to_string());
            };
            cycle = 0;

            notify(notifier, tableau, &labels, nit, Some((pivrow, pivcol)), false)?;

            trace!("phase {phase} iteration {nit}: pivot on T[{pivrow},{pivcol}]");
            if let Err(err) = tableau.pivot(pivrow, pivcol) {
                warn!("phase {phase}: {err}");
                break (Status::SingularPivot, Status::SingularPivot.message().to_string());
            }
            nit += 1;
        };

        debug!("phase {phase} finished after iteration {nit}: {message}");

        Ok(PhaseOutcome {
            x: tableau.solution(),
            nit,
            status,
            message,
        })
    }
}

/// Per-iteration hook of the engine. Solving without an observer uses an
/// infallible hook, so no error path exists there.
trait Notifier {
    type Error;
    /// Whether `notify` needs labels, basics and `xk` at all.
    const ACTIVE: bool;

    fn notify(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), Self::Error>;
}

struct Silent;

impl Notifier for Silent {
    type Error = Infallible;
    const ACTIVE: bool = false;

    fn notify(&mut self, _xk: &[f64], _iteration: &Iteration<'_>) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Observed<'a>(&'a mut dyn Observer);

impl Notifier for Observed<'_> {
    type Error = SolveError;
    const ACTIVE: bool = true;

    fn notify(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), SolveError> {
        self.0.observe(xk, iteration)?;
        Ok(())
    }
}

/// True when `tableau` is back where the phase started. Only checked once
/// more than `check_after` iterations have passed and the phase has pivoted
/// at least once; `None` disables the check.
fn returned_to_start(
    tableau: &Tableau,
    snapshot: &Tableau,
    nit: usize,
    nit0: usize,
    check_after: Option<usize>,
) -> bool {
    check_after.is_some_and(|after| nit > after) && nit > nit0 && tableau == snapshot
}

/// Column with the most negative objective coefficient, lowest index first.
/// `None` once every coefficient is at least `-tolerance`.
fn entering_column(tableau: &Tableau, tolerance: f64) -> Option<usize> {
    let obj = &tableau.objective()[..tableau.rhs_col()];

    let mut min_val = f64::INFINITY;
    let mut min_col = None;
    for (j, &v) in obj.iter().enumerate() {
        if v < min_val {
            min_val = v;
            min_col = Some(j);
        }
    }

    if min_val >= -tolerance { None } else { min_col }
}

/// Ratio test. Rows with a positive entry in `col` are ordered by
/// `rhs / entry`, then by row index. `offset` selects among the rows tied for
/// the minimum ratio, saturating at the last of them. `None` when no entry in
/// `col` is positive.
fn leaving_row(tableau: &Tableau, col: usize, offset: usize) -> Option<usize> {
    let rhs = tableau.rhs_col();
    let mut candidates: Vec<(f64, usize)> = (0..tableau.constraint_rows())
        .filter_map(|i| {
            let val = tableau.get(i, col);
            (val > 0.0).then(|| (tableau.get(i, rhs) / val, i))
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    let &(min_ratio, _) = candidates.first()?;
    let tied = candidates
        .iter()
        .take_while(|&&(ratio, _)| ratio <= min_ratio)
        .count()
        .max(1);
    Some(candidates[offset.min(tied - 1)].1)
}

fn notify<N: Notifier>(
    notifier: &mut N,
    tableau: &Tableau,
    labels: &[String],
    nit: usize,
    pivot: Option<(usize, usize)>,
    complete: bool,
) -> Result<(), N::Error> {
    if !N::ACTIVE {
        return Ok(());
    }

    let basics = tableau.basics();
    let mut xk = vec![0.0; tableau.n_vars()];
    for &(col, value) in &basics {
        if col < xk.len() {
            xk[col] = value;
        }
    }

    let iteration = Iteration {
        tableau,
        labels,
        phase: tableau.phase(),
        nit,
        pivot,
        basics: &basics,
        complete,
    };
    notifier.notify(&xk, &iteration)
}
