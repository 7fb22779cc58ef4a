mod problem_file;
mod trace;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use linprog_simplex::{LinearProgram, OptimizeResult, Sense, SolveError, Solver, Status};
use log::debug;

use problem_file::ProblemFile;
use trace::{TerseTrace, VerboseTrace};

#[derive(Parser)]
#[command(name = "linprog")]
#[command(about = "Solve linear programs with the two-phase simplex method", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and output the result
    Solve {
        /// The JSON problem file
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Print every iteration of the solve
        #[arg(short, long, value_enum)]
        trace: Option<TraceMode>,
        /// Iteration cap across both phases
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Optimality and feasibility tolerance
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Check a problem file for errors
    Check {
        /// The JSON problem file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TraceMode {
    Terse,
    Verbose,
}

fn load(file: &Path) -> LinearProgram {
    match ProblemFile::load(file) {
        Ok(f) => f.into_problem(),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run_solve(
    solver: &Solver,
    problem: &LinearProgram,
    trace: Option<TraceMode>,
    sink: Box<dyn Write>,
) -> Result<OptimizeResult, SolveError> {
    match trace {
        None => Ok(solver.solve(problem)),
        Some(TraceMode::Terse) => solver.solve_observed(problem, &mut TerseTrace::new(sink)),
        Some(TraceMode::Verbose) => solver.solve_observed(problem, &mut VerboseTrace::new(sink)),
    }
}

fn print_pretty(result: &OptimizeResult) {
    let label = match result.status {
        Status::Success => "OPTIMAL",
        Status::IterationLimit => "ITERATION LIMIT",
        Status::Infeasible => "INFEASIBLE",
        Status::Unbounded => "UNBOUNDED",
        Status::SingularPivot => "SINGULAR",
        Status::InvalidInput => "INVALID INPUT",
    };
    println!("Status: {} ({})", label, result.status.code());
    println!("{}", result.message);
    println!("Iterations: {}", result.nit);
    if result.success {
        println!("Objective: {:.6}", result.fun);
        println!();
        println!("Variables:");
        for (i, value) in result.x.iter().enumerate() {
            println!("  x[{}] = {:12.6}", i, value);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            format,
            trace,
            max_iterations,
            tolerance,
        } => {
            let problem = load(&file);

            let mut solver = Solver::new();
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            if let Some(tol) = tolerance {
                solver = solver.with_tolerance(tol);
            }
            debug!("solving {} with {:?}", file.display(), solver);

            // Keep stdout clean for JSON output
            let sink: Box<dyn Write> = match format {
                Format::Pretty => Box::new(io::stdout()),
                Format::Json => Box::new(io::stderr()),
            };

            let result = match run_solve(&solver, &problem, trace, sink) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            match format {
                Format::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing JSON: {}", e);
                        std::process::exit(1);
                    }
                },
                Format::Pretty => print_pretty(&result),
            }

            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let problem = load(&file);

            match problem.validate() {
                Ok(()) => {
                    let sense = match problem.objective.sense {
                        Sense::Minimize => "minimize",
                        Sense::Maximize => "maximize",
                    };
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", problem.num_variables());
                    println!("  {} inequality constraints", problem.b_ub.len());
                    println!("  {} equality constraints", problem.b_eq.len());
                    println!("  objective: {}", sense);
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
