//! Adapters for rustsat solver backends
//!
//! Provides adapters to use rustsat-compatible SAT solvers in the pipeline.

use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::{Clause, Lit, TernaryVal, Var};
use rustsat_batsat::BasicSolver;

use super::{SATSolver, SatBackend};
use crate::error::{PcspError, Result};

/// Adapter that wraps rustsat solvers to implement our SATSolver trait
///
/// This allows any rustsat-compatible solver to be used for model
/// enumeration.
///
/// # Example
///
/// ```ignore
/// use rustsat_batsat::BasicSolver;
/// let solver = RustSatAdapter::new(BasicSolver::default());
/// ```
pub struct RustSatAdapter<S> {
    solver: S,
    num_vars: u32,
    num_clauses: u32,
}

impl<S> RustSatAdapter<S> {
    /// Creates a new adapter wrapping the given solver
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            num_vars: 0,
            num_clauses: 0,
        }
    }
}

impl<S: Solve> SATSolver for RustSatAdapter<S> {
    fn add_variables(&mut self, num_vars: u32) {
        // RustSat auto-creates variables as needed when clauses are added
        // Just track the count for our interface
        self.num_vars += num_vars;
    }

    fn add_clause(&mut self, lits: &[i32]) -> bool {
        let lits_vec: Vec<Lit> = lits
            .iter()
            .map(|&lit| {
                let var = Var::new(lit.unsigned_abs() - 1);
                if lit > 0 { var.pos_lit() } else { var.neg_lit() }
            })
            .collect();

        let clause = Clause::from(&lits_vec[..]);
        self.num_clauses += 1;
        self.solver.add_clause(clause).is_ok()
    }

    fn solve(&mut self) -> Result<bool> {
        match self.solver.solve() {
            Ok(SolverResult::Sat) => Ok(true),
            Ok(SolverResult::Unsat) => Ok(false),
            Ok(other) => Err(PcspError::Backend(format!("solver stopped with {:?}", other))),
            Err(e) => Err(PcspError::Backend(e.to_string())),
        }
    }

    fn value_of(&self, var: u32) -> bool {
        if var == 0 || var > self.num_vars {
            return false;
        }
        let v = Var::new(var - 1);
        // Get the assignment from the solution
        match self.solver.solution(v) {
            Ok(assignment) => matches!(assignment.var_value(v), TernaryVal::True),
            Err(_) => false,
        }
    }

    fn num_variables(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> u32 {
        self.num_clauses
    }

    fn max_variables(&self) -> u32 {
        Var::MAX_IDX.saturating_add(1)
    }

    fn model(&self) -> Result<Vec<i32>> {
        if self.num_vars == 0 {
            return Ok(Vec::new());
        }
        // one call for the whole assignment instead of one per variable
        let assignment = self
            .solver
            .solution(Var::new(self.num_vars - 1))
            .map_err(|e| PcspError::Backend(e.to_string()))?;
        Ok((1..=self.num_vars)
            .map(|var| {
                let value = matches!(assignment.var_value(Var::new(var - 1)), TernaryVal::True);
                if value { var as i32 } else { -(var as i32) }
            })
            .collect())
    }
}

/// The default backend: batsat through rustsat
#[derive(Debug, Clone, Copy, Default)]
pub struct Batsat;

impl SatBackend for Batsat {
    type Solver = RustSatAdapter<BasicSolver>;

    fn create(&self) -> Self::Solver {
        RustSatAdapter::new(BasicSolver::default())
    }
}
