//! JSON problem files.
//!
//! ```json
//! {
//!   "c": [1.0, -4.0],
//!   "a_ub": [[-3.0, 1.0], [1.0, 2.0]],
//!   "b_ub": [6.0, 4.0],
//!   "bounds": [[null, null], [-3.0, null]],
//!   "maximize": false
//! }
//! ```
//!
//! Every key but `c` is optional. A single `bounds` pair applies to every
//! variable and `null` stands for an infinite end.

use std::path::{Path, PathBuf};

use linprog_simplex::{Bound, Bounds, LinearProgram, Objective, Sense};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed problem file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemFile {
    pub c: Vec<f64>,
    #[serde(default)]
    pub a_ub: Vec<Vec<f64>>,
    #[serde(default)]
    pub b_ub: Vec<f64>,
    #[serde(default)]
    pub a_eq: Vec<Vec<f64>>,
    #[serde(default)]
    pub b_eq: Vec<f64>,
    #[serde(default)]
    pub bounds: Option<Vec<(Option<f64>, Option<f64>)>>,
    #[serde(default)]
    pub maximize: bool,
}

impl ProblemFile {
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn into_problem(self) -> LinearProgram {
        let bounds = match self.bounds {
            None => Bounds::Default,
            Some(pairs) if pairs.len() == 1 => Bounds::Uniform(pairs[0].into()),
            Some(pairs) => Bounds::PerVariable(pairs.into_iter().map(Bound::from).collect()),
        };
        LinearProgram {
            objective: Objective {
                coefficients: self.c,
                sense: if self.maximize {
                    Sense::Maximize
                } else {
                    Sense::Minimize
                },
            },
            a_eq: self.a_eq,
            b_eq: self.b_eq,
            a_ub: self.a_ub,
            b_ub: self.b_ub,
            bounds,
        }
    }
}
