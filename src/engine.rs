//! SAT solver trait, backends, and model enumeration
//!
//! The SAT solver is an external capability: clauses go in, models come out.
//! Any incremental solver implementing [`SATSolver`] can drive the pipeline,
//! and [`Models`] turns it into a lazy stream of all models by adding a
//! blocking clause after each one.

pub mod rustsat_adapter;

use crate::cnf::CNF;
use crate::error::{PcspError, Result};

pub use rustsat_adapter::{Batsat, RustSatAdapter};

/// Core SAT solver trait
///
/// This trait defines the interface that all SAT solver backends must implement.
/// Variables are 1-indexed, and literals are represented as signed integers
/// (positive for true, negative for false).
pub trait SATSolver {
    /// Adds the given number of variables to the solver
    fn add_variables(&mut self, num_vars: u32);

    /// Adds a clause to the solver
    ///
    /// Returns false if the clause is trivially unsatisfiable
    ///
    /// # Arguments
    /// * `lits` - Slice of literals (1-indexed, negated by sign)
    fn add_clause(&mut self, lits: &[i32]) -> bool;

    /// Solves the current formula
    ///
    /// Returns true if satisfiable, false if unsatisfiable
    ///
    /// # Errors
    /// Returns `Backend` if the solver fails or stops without an answer
    fn solve(&mut self) -> Result<bool>;

    /// Returns the assignment of a variable in the solution
    ///
    /// Only valid after solve() returns true.
    /// Variables are 1-indexed.
    fn value_of(&self, var: u32) -> bool;

    /// Returns the number of variables in the solver
    fn num_variables(&self) -> u32;

    /// Returns the number of clauses added
    fn num_clauses(&self) -> u32;

    /// Largest number of variables the backend can hold
    fn max_variables(&self) -> u32 {
        i32::MAX as u32
    }

    /// Returns the current model as one signed literal per variable
    ///
    /// Only valid after solve() returns true.
    ///
    /// # Errors
    /// Returns `Backend` if the solver cannot produce the model
    fn model(&self) -> Result<Vec<i32>> {
        Ok((1..=self.num_variables())
            .map(|var| if self.value_of(var) { var as i32 } else { -(var as i32) })
            .collect())
    }
}

/// Creates fresh solvers for the pipeline
///
/// This is how callers choose a solver: the CSP solver is parameterized by
/// a backend instead of falling back on a global default.
pub trait SatBackend {
    /// The solver type this backend produces
    type Solver: SATSolver;

    /// Creates a new, empty solver
    fn create(&self) -> Self::Solver;

    /// Loads `cnf` into a fresh solver and returns its models
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the solver cannot hold all variables
    fn models(&self, cnf: &CNF) -> Result<Models<Self::Solver>> {
        Models::new(self.create(), cnf)
    }
}

/// Lazy enumeration of all models of a CNF
///
/// Each model is a vector of signed literals, one per variable, positive
/// meaning true. After a model is produced, a clause excluding exactly that
/// assignment is added, so every model is produced once. An unsatisfiable
/// CNF produces nothing. A backend failure is produced as an error and ends
/// the enumeration.
pub struct Models<S> {
    solver: S,
    exhausted: bool,
    produced: usize,
}

impl<S: SATSolver> Models<S> {
    /// Loads `cnf` into `solver`
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the solver cannot hold all variables
    pub fn new(mut solver: S, cnf: &CNF) -> Result<Self> {
        if cnf.num_variables > solver.max_variables() {
            return Err(PcspError::CapacityExceeded(format!(
                "{} variables, solver supports {}",
                cnf.num_variables,
                solver.max_variables()
            )));
        }

        solver.add_variables(cnf.num_variables);
        let mut exhausted = false;
        for clause in &cnf.clauses {
            if clause.is_empty() || !solver.add_clause(clause) {
                exhausted = true;
                break;
            }
        }

        log::debug!(
            "loaded {} variables and {} clauses{}",
            solver.num_variables(),
            solver.num_clauses(),
            if exhausted { " (trivially unsatisfiable)" } else { "" }
        );

        Ok(Self {
            solver,
            exhausted,
            produced: 0,
        })
    }

    /// Number of models produced so far
    pub fn produced(&self) -> usize {
        self.produced
    }
}

impl<S: SATSolver> Models<S> {
    fn next_model(&mut self) -> Result<Option<Vec<i32>>> {
        if !self.solver.solve()? {
            log::debug!("no more models after {}", self.produced);
            return Ok(None);
        }
        self.solver.model().map(Some)
    }
}

impl<S: SATSolver> Iterator for Models<S> {
    type Item = Result<Vec<i32>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let model = match self.next_model() {
            Ok(Some(model)) => model,
            Ok(None) => {
                self.exhausted = true;
                return None;
            }
            Err(e) => {
                log::warn!("model enumeration stopped after {}: {}", self.produced, e);
                self.exhausted = true;
                return Some(Err(e));
            }
        };
        self.produced += 1;
        log::trace!("model {}: {:?}", self.produced, model);

        let blocking = model.iter().map(|&lit| -lit).collect::<Vec<_>>();
        if blocking.is_empty() || !self.solver.add_clause(&blocking) {
            self.exhausted = true;
        }
        Some(Ok(model))
    }
}

/// A brute-force solver for very small formulas
///
/// Tries assignments in binary counting order. Useful to cross-check a real
/// backend; anything past a couple dozen variables is hopeless.
pub struct ExhaustiveSolver {
    num_vars: u32,
    clauses: Vec<Vec<i32>>,
    solution: Vec<bool>,
}

impl ExhaustiveSolver {
    /// Creates a new exhaustive solver
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            clauses: Vec::new(),
            solution: Vec::new(),
        }
    }

    fn satisfies(&self, assignment: u64) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let var = lit.unsigned_abs() - 1;
                let value = assignment >> var & 1 == 1;
                value == (lit > 0)
            })
        })
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SATSolver for ExhaustiveSolver {
    fn add_variables(&mut self, num_vars: u32) {
        self.num_vars += num_vars;
        self.solution.resize(self.num_vars as usize, false);
    }

    fn add_clause(&mut self, lits: &[i32]) -> bool {
        self.clauses.push(lits.to_vec());
        !lits.is_empty()
    }

    fn solve(&mut self) -> Result<bool> {
        let found = (0..1u64 << self.num_vars).find(|&a| self.satisfies(a));
        match found {
            Some(assignment) => {
                for (i, value) in self.solution.iter_mut().enumerate() {
                    *value = assignment >> i & 1 == 1;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn value_of(&self, var: u32) -> bool {
        if var == 0 || var > self.num_vars {
            false
        } else {
            self.solution[(var - 1) as usize]
        }
    }

    fn num_variables(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> u32 {
        self.clauses.len() as u32
    }

    fn max_variables(&self) -> u32 {
        24
    }
}

/// Backend producing [`ExhaustiveSolver`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Exhaustive;

impl SatBackend for Exhaustive {
    type Solver = ExhaustiveSolver;

    fn create(&self) -> Self::Solver {
        ExhaustiveSolver::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnf(num_variables: u32, clauses: &[&[i32]]) -> CNF {
        let mut cnf = CNF::new();
        cnf.num_variables = num_variables;
        for clause in clauses {
            cnf.add_clause(clause.to_vec());
        }
        cnf
    }

    #[test]
    fn exhaustive_solver_basic() -> Result<()> {
        let mut solver = ExhaustiveSolver::new();

        solver.add_variables(3);
        assert_eq!(solver.num_variables(), 3);

        solver.add_clause(&[1, 2]);
        solver.add_clause(&[-1, 3]);
        assert_eq!(solver.num_clauses(), 2);

        assert!(solver.solve()?);
        assert!(solver.value_of(1) || solver.value_of(2));
        assert!(!solver.value_of(1) || solver.value_of(3));
        assert!(!solver.value_of(0));
        assert!(!solver.value_of(4));
        Ok(())
    }

    #[test]
    fn exhaustive_solver_unsat() -> Result<()> {
        let mut solver = ExhaustiveSolver::new();
        solver.add_variables(1);
        solver.add_clause(&[1]);
        solver.add_clause(&[-1]);
        assert!(!solver.solve()?);
        Ok(())
    }

    #[test]
    fn enumerate_all_models() -> Result<()> {
        // x1 or x2: three models
        let models = Exhaustive.models(&cnf(2, &[&[1, 2]]))?.collect::<Result<Vec<_>>>()?;
        assert_eq!(models.len(), 3);
        assert!(models.iter().all(|m| m.len() == 2));
        assert!(!models.contains(&vec![-1, -2]));
        Ok(())
    }

    #[test]
    fn enumerate_with_batsat() -> Result<()> {
        let models = Batsat.models(&cnf(3, &[&[1, 2, 3], &[-1, -2], &[-1, -3], &[-2, -3]]))?;
        let mut models = models.collect::<Result<Vec<_>>>()?;
        models.sort();
        assert_eq!(
            models,
            vec![vec![-1, -2, 3], vec![-1, 2, -3], vec![1, -2, -3]]
        );
        Ok(())
    }

    #[test]
    fn empty_clause_has_no_models() -> Result<()> {
        let mut formula = cnf(1, &[&[1]]);
        formula.add_clause(vec![]);
        assert_eq!(Batsat.models(&formula)?.count(), 0);
        Ok(())
    }

    #[test]
    fn no_variables_one_model() -> Result<()> {
        let models = Exhaustive.models(&CNF::new())?.collect::<Result<Vec<_>>>()?;
        assert_eq!(models, vec![Vec::<i32>::new()]);
        Ok(())
    }

    #[test]
    fn models_are_lazy() -> Result<()> {
        let mut models = Batsat.models(&cnf(4, &[&[1, 2, 3, 4]]))?;
        assert!(models.next().is_some());
        assert_eq!(models.produced(), 1);
        Ok(())
    }

    /// Answers once, then fails on every later call
    struct GivesUp {
        inner: ExhaustiveSolver,
        calls: usize,
    }

    impl SATSolver for GivesUp {
        fn add_variables(&mut self, num_vars: u32) {
            self.inner.add_variables(num_vars);
        }

        fn add_clause(&mut self, lits: &[i32]) -> bool {
            self.inner.add_clause(lits)
        }

        fn solve(&mut self) -> Result<bool> {
            self.calls += 1;
            if self.calls > 1 {
                return Err(PcspError::Backend("interrupted".to_string()));
            }
            self.inner.solve()
        }

        fn value_of(&self, var: u32) -> bool {
            self.inner.value_of(var)
        }

        fn num_variables(&self) -> u32 {
            self.inner.num_variables()
        }

        fn num_clauses(&self) -> u32 {
            self.inner.num_clauses()
        }
    }

    #[test]
    fn backend_failure_ends_with_an_error() -> Result<()> {
        let solver = GivesUp {
            inner: ExhaustiveSolver::new(),
            calls: 0,
        };
        let mut models = Models::new(solver, &cnf(2, &[&[1, 2]]))?;
        assert!(matches!(models.next(), Some(Ok(_))));
        assert!(matches!(models.next(), Some(Err(PcspError::Backend(_)))));
        assert!(models.next().is_none());
        assert_eq!(models.produced(), 1);
        Ok(())
    }

    #[test]
    fn capacity_is_checked() {
        let formula = cnf(30, &[&[30]]);
        assert!(matches!(
            Exhaustive.models(&formula),
            Err(PcspError::CapacityExceeded(_))
        ));
    }
}
