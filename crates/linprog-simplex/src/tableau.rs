use std::fmt;

use log::debug;

use crate::error::{InvalidInput, SingularPivot};
use crate::standard_form::StandardForm;

/// Which stage of the two-phase method a tableau belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Searching for a basic feasible solution. The tableau carries the real
    /// objective row followed by the pseudo-objective row.
    One,
    /// Optimizing the real objective, which is the last row.
    Two,
}

impl Phase {
    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }

    /// Number of trailing objective rows.
    pub fn objective_rows(self) -> usize {
        match self {
            Phase::One => 2,
            Phase::Two => 1,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// What a tableau column stands for. Fixed when the tableau is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Structural(usize),
    Slack(usize),
    Artificial(usize),
    Rhs,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Structural(i) => write!(f, "x[{i}]"),
            ColumnRole::Slack(i) => write!(f, "s[{i}]"),
            ColumnRole::Artificial(i) => write!(f, "a[{i}]"),
            ColumnRole::Rhs => write!(f, "RHS"),
        }
    }
}

/// Dense simplex tableau.
///
/// ```text
/// [ A_eq          0     I | b_eq ]
/// [ A_ub          I     I | b_ub ]
/// [ c             0     0 | f0   ]
/// [ pseudo-objective      | -sum b ]   (phase 1 only)
/// ```
///
/// Columns are laid out as structural variables, slack variables, artificial
/// variables and finally the right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    phase: Phase,
}

impl Tableau {
    /// Wrap an existing matrix. Every row must hold
    /// `n_vars + n_slack + n_artificial + 1` entries and there must be room for
    /// the objective row(s) of `phase`.
    pub fn new(
        data: Vec<Vec<f64>>,
        n_vars: usize,
        n_slack: usize,
        n_artificial: usize,
        phase: Phase,
    ) -> Result<Self, InvalidInput> {
        let cols = n_vars + n_slack + n_artificial + 1;
        if data.len() < phase.objective_rows() || data.iter().any(|row| row.len() != cols) {
            return Err(InvalidInput::TableauShape {
                rows: data.len(),
                cols,
            });
        }
        Ok(Self {
            data,
            n_vars,
            n_slack,
            n_artificial,
            phase,
        })
    }

    /// Assemble the phase 1 tableau of a standard-form problem.
    pub(crate) fn build(form: &StandardForm) -> Self {
        let n = form.num_variables();
        let m_eq = form.b_eq.len();
        let m_ub = form.b_ub.len();
        let m = m_eq + m_ub;
        let n_slack = m_ub;
        let n_artificial = m;
        let cols = n + n_slack + n_artificial + 1;
        let rhs = cols - 1;

        let mut data = vec![vec![0.0; cols]; m + 2];

        // Real objective
        data[m][..n].copy_from_slice(&form.c);
        data[m][rhs] = form.f0;

        for (i, (row, &b)) in form.a_eq.iter().zip(&form.b_eq).enumerate() {
            data[i][..n].copy_from_slice(row);
            data[i][rhs] = b;
        }
        for (k, (row, &b)) in form.a_ub.iter().zip(&form.b_ub).enumerate() {
            let i = m_eq + k;
            data[i][..n].copy_from_slice(row);
            data[i][n + k] = 1.0;
            data[i][rhs] = b;
        }

        // No negative right-hand sides. Flipping a row also flips its slack.
        for row in data.iter_mut().take(m) {
            if row[rhs] < 0.0 {
                for v in row.iter_mut() {
                    *v = -*v;
                }
            }
        }

        let art_start = n + n_slack;
        for (i, row) in data.iter_mut().take(m).enumerate() {
            row[art_start + i] = 1.0;
        }

        // Price out the artificial variables so they start basic
        for j in art_start..rhs {
            data[m + 1][j] = 1.0;
        }
        for i in 0..m {
            for j in 0..cols {
                let v = data[i][j];
                data[m + 1][j] -= v;
            }
        }

        debug!(
            "built phase 1 tableau: {} rows x {} cols ({} structural, {} slack, {} artificial)",
            m + 2,
            cols,
            n,
            n_slack,
            n_artificial
        );

        Self {
            data,
            n_vars: n,
            n_slack,
            n_artificial,
            phase: Phase::One,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn n_slack(&self) -> usize {
        self.n_slack
    }

    pub fn n_artificial(&self) -> usize {
        self.n_artificial
    }

    /// Number of constraint rows (everything above the objective rows).
    pub fn constraint_rows(&self) -> usize {
        self.rows() - self.phase.objective_rows()
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn rhs_col(&self) -> usize {
        self.cols() - 1
    }

    /// The objective row driving the current phase (always the last row).
    pub fn objective(&self) -> &[f64] {
        let last = self.rows() - 1;
        &self.data[last]
    }

    /// Bottom-right cell: the negated objective value of the active row.
    pub fn corner(&self) -> f64 {
        self.objective()[self.rhs_col()]
    }

    /// Value of the real objective at the current basis. In phase 1 this
    /// reads the row above the pseudo-objective.
    pub fn objective_value(&self) -> f64 {
        // + 0.0 turns -0.0 into 0.0
        -self.data[self.constraint_rows()][self.rhs_col()] + 0.0
    }

    pub fn role(&self, col: usize) -> ColumnRole {
        let slack_start = self.n_vars;
        let art_start = slack_start + self.n_slack;
        let rhs = art_start + self.n_artificial;
        if col < slack_start {
            ColumnRole::Structural(col)
        } else if col < art_start {
            ColumnRole::Slack(col - slack_start)
        } else if col < rhs {
            ColumnRole::Artificial(col - art_start)
        } else {
            ColumnRole::Rhs
        }
    }

    /// Column headers: `x[i]`, `s[i]`, `a[i]` and `RHS`.
    pub fn labels(&self) -> Vec<String> {
        (0..self.cols()).map(|j| self.role(j).to_string()).collect()
    }

    /// Basic columns and their values, in column order.
    ///
    /// A column is basic when exactly one constraint row holds `1.0` and every
    /// other entry of the column, objective rows included, is `0.0`. Each row
    /// backs at most one basic column; identical columns go to the lowest index.
    pub fn basics(&self) -> Vec<(usize, f64)> {
        let m = self.constraint_rows();
        let rhs = self.rhs_col();
        let mut claimed = vec![false; m];
        let mut basics = Vec::new();

        for col in 0..rhs {
            let mut one_at = None;
            let mut is_basic = true;
            for (i, row) in self.data.iter().enumerate() {
                let v = row[col];
                if v == 1.0 && i < m && one_at.is_none() {
                    one_at = Some(i);
                } else if v != 0.0 {
                    is_basic = false;
                    break;
                }
            }
            if let (true, Some(i)) = (is_basic, one_at) {
                if !claimed[i] {
                    claimed[i] = true;
                    basics.push((col, self.data[i][rhs]));
                }
            }
        }
        basics
    }

    /// Current values of the structural variables. Non-basic columns are 0.
    pub fn solution(&self) -> Vec<f64> {
        let mut x = vec![0.0; self.n_vars];
        for (col, value) in self.basics() {
            if col < self.n_vars {
                x[col] = value;
            }
        }
        x
    }

    /// Gauss-Jordan pivot on `T[row, col]`.
    pub fn pivot(&mut self, row: usize, col: usize) -> Result<(), SingularPivot> {
        let pivot_val = self.data[row][col];
        if pivot_val == 0.0 {
            return Err(SingularPivot { row, col });
        }

        for v in self.data[row].iter_mut() {
            *v /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for (i, other) in self.data.iter_mut().enumerate() {
            if i != row {
                let factor = other[col];
                for (v, p) in other.iter_mut().zip(&pivot_row) {
                    *v -= p * factor;
                }
            }
        }
        Ok(())
    }

    /// Drop the pseudo-objective row and the artificial columns, turning a
    /// finished phase 1 tableau into a phase 2 tableau.
    pub fn drop_phase_one(&mut self) {
        if self.phase != Phase::One {
            return;
        }
        self.data.pop();
        let art_start = self.n_vars + self.n_slack;
        let art_end = art_start + self.n_artificial;
        for row in self.data.iter_mut() {
            row.drain(art_start..art_end);
        }
        self.n_artificial = 0;
        self.phase = Phase::Two;
    }
}
