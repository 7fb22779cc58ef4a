//! Observers that print the progress of a solve.

use std::io::Write;

use linprog_simplex::{Iteration, Observer, ObserverError, Phase};

fn format_vector(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", cells.join(", "))
}

/// One line per iteration: the iteration number and the current solution.
pub struct TerseTrace<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> TerseTrace<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for TerseTrace<W> {
    fn observe(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), ObserverError> {
        if !self.header_written {
            writeln!(self.out, "Iter:   X:")?;
            self.header_written = true;
        }
        writeln!(self.out, "{:<5}   {}", iteration.nit, format_vector(xk))?;
        Ok(())
    }
}

/// Full dump of the tableau, pivot, basis and objective at every iteration.
pub struct VerboseTrace<W: Write> {
    out: W,
    last_phase: Option<Phase>,
}

impl<W: Write> VerboseTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_phase: None }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for VerboseTrace<W> {
    fn observe(&mut self, xk: &[f64], iteration: &Iteration<'_>) -> Result<(), ObserverError> {
        let phase = iteration.phase;
        let first_of_phase = self.last_phase != Some(phase);
        self.last_phase = Some(phase);

        if iteration.complete {
            writeln!(self.out, "--------- Iteration Complete - Phase {phase} -------\n")?;
        } else if first_of_phase {
            writeln!(self.out, "--------- Initial Tableau - Phase {phase} ----------\n")?;
        } else {
            writeln!(self.out, "--------- Iteration {} - Phase {phase} --------\n", iteration.nit)?;
        }

        writeln!(self.out, "Tableau:")?;
        let header: String = iteration.labels.iter().map(|l| format!("{l:>13}")).collect();
        writeln!(self.out, " {header}")?;
        for row in iteration.tableau.data() {
            let cells: String = row.iter().map(|v| format!(" {v:12.4}")).collect();
            writeln!(self.out, "[{cells}]")?;
        }
        writeln!(self.out)?;

        if let Some((row, col)) = iteration.pivot {
            writeln!(self.out, "Pivot Element: T[{row},{col}]\n")?;
        }

        writeln!(self.out, "Basic Variables:")?;
        for &(col, value) in iteration.basics {
            let label = iteration.labels.get(col).map(String::as_str).unwrap_or("?");
            writeln!(self.out, "{label:<5} = {value:.6}")?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "Current Solution:")?;
        writeln!(self.out, "x = {}\n", format_vector(xk))?;

        writeln!(self.out, "Current Objective Value:")?;
        writeln!(self.out, "f = {}\n", iteration.tableau.objective_value())?;
        Ok(())
    }
}
