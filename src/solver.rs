//! CSP solver API
//!
//! The solver reduces a CSP instance to label cover, then to SAT, and
//! enumerates homomorphisms by decoding SAT models back through both
//! reductions.

use std::time::Instant;

use crate::cnf::CNF;
use crate::engine::{Batsat, SatBackend};
use crate::reduction::{
    csp_to_lc, lc_to_sat, Composed, CspDecoder, Homomorphism, LcVar, Reduction, SatDecoder,
};
use crate::structure::{Element, Structure};
use crate::Result;

/// Decoder from SAT models all the way back to homomorphisms
pub type CspToSatDecoder<E, F> = Composed<CspDecoder<E, F>, SatDecoder<LcVar<E>>>;

/// Solver options
#[derive(Debug, Clone)]
pub struct Options {
    /// Stop after this many solutions (None = enumerate all)
    pub solution_limit: Option<usize>,
    /// Validate both structures before reducing (default = true)
    pub check_structures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            solution_limit: None,
            check_structures: true,
        }
    }
}

/// CSP solver (uses batsat by default)
///
/// Finds homomorphisms from an input structure to a template structure.
#[derive(Debug, Clone)]
pub struct CspSolver<B = Batsat> {
    backend: B,
    options: Options,
}

impl CspSolver<Batsat> {
    /// Creates a new solver with the given options (uses batsat backend)
    pub fn new(options: Options) -> Self {
        Self::with_backend(Batsat, options)
    }
}

impl Default for CspSolver<Batsat> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<B: SatBackend> CspSolver<B> {
    /// Creates a new solver on a custom SAT backend
    pub fn with_backend(backend: B, options: Options) -> Self {
        Self { backend, options }
    }

    /// Returns the options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Reduces `CSP(input, template)` to CNF without solving it
    ///
    /// # Errors
    /// Returns `MalformedStructure` if the structures are malformed or not
    /// similar, and `CapacityExceeded` if the encoding is too large
    pub fn reduce<E: Element, F: Element>(
        &self,
        input: &Structure<E>,
        template: &Structure<F>,
    ) -> Result<Reduction<CNF, CspToSatDecoder<E, F>>> {
        if self.options.check_structures {
            input.check()?;
            template.check()?;
        }

        let start = Instant::now();
        let reduction = csp_to_lc(input, template)?.bind(lc_to_sat)?;
        log::debug!(
            "reduced CSP on {} elements to {} variables and {} clauses in {:?}",
            input.size(),
            reduction.instance().num_variables,
            reduction.instance().num_clauses(),
            start.elapsed()
        );
        Ok(reduction)
    }

    /// Enumerates the homomorphisms from `input` to `template`
    ///
    /// Solutions are produced lazily, each exactly once. An instance without
    /// solutions gives an empty iterator. A SAT backend failure shows up as
    /// a `Backend` error item, never as the end of the iterator.
    ///
    /// # Errors
    /// Fails if the reduction fails; see [`CspSolver::reduce`]
    pub fn solve<E: Element, F: Element>(
        &self,
        input: &Structure<E>,
        template: &Structure<F>,
    ) -> Result<impl Iterator<Item = Result<Homomorphism<E, F>>>> {
        let limit = self.options.solution_limit.unwrap_or(usize::MAX);
        self.reduce(input, template)?
            .solve(|cnf| Ok(self.backend.models(&cnf)?.take(limit)))
    }

    /// Returns some homomorphism from `input` to `template`, if there is one
    ///
    /// # Errors
    /// Fails if the reduction or decoding fails
    pub fn find<E: Element, F: Element>(
        &self,
        input: &Structure<E>,
        template: &Structure<F>,
    ) -> Result<Option<Homomorphism<E, F>>> {
        self.solve(input, template)?.next().transpose()
    }
}

/// Enumerates the `arity`-ary polymorphisms from `a` to `b`
///
/// These are the homomorphisms from `a^arity` to `b`, keyed by argument
/// tuples.
///
/// # Errors
/// Returns `MalformedStructure` if `a` mixes tuple lengths within a
/// relation, and fails like [`CspSolver::solve`] otherwise
pub fn polymorphisms<E: Element, F: Element, B: SatBackend>(
    a: &Structure<E>,
    b: &Structure<F>,
    arity: usize,
    solver: &CspSolver<B>,
) -> Result<impl Iterator<Item = Result<Homomorphism<Vec<E>, F>>>> {
    solver.solve(&a.power(arity)?, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Exhaustive, ExhaustiveSolver, SATSolver};
    use crate::error::PcspError;
    use crate::structure::library::{clique, one_point};

    #[test]
    fn triangle_colorings() -> Result<()> {
        let solver = CspSolver::new(Options::default());
        let colorings = solver
            .solve(&clique(3), &clique(3))?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(colorings.len(), 6);
        for h in &colorings {
            assert_eq!(h.len(), 3);
            assert_ne!(h[&0], h[&1]);
            assert_ne!(h[&1], h[&2]);
            assert_ne!(h[&0], h[&2]);
        }
        Ok(())
    }

    #[test]
    fn unsatisfiable_is_empty() -> Result<()> {
        let solver = CspSolver::new(Options::default());
        assert_eq!(solver.solve(&clique(3), &clique(2))?.count(), 0);
        assert!(solver.find(&clique(3), &clique(2))?.is_none());
        Ok(())
    }

    #[test]
    fn solution_limit() -> Result<()> {
        let options = Options {
            solution_limit: Some(2),
            ..Options::default()
        };
        let solver = CspSolver::new(options);
        assert_eq!(solver.solve(&clique(2), &clique(4))?.count(), 2);
        Ok(())
    }

    #[test]
    fn backends_agree() -> Result<()> {
        let exhaustive = CspSolver::with_backend(Exhaustive, Options::default());
        let batsat = CspSolver::new(Options::default());
        // small enough for brute force
        let input = Structure::new(vec![0, 1], vec![vec![vec![0, 1]]]);
        let template = Structure::new(vec![0, 1], vec![vec![vec![0, 1], vec![1, 0]]]);
        assert_eq!(
            exhaustive.solve(&input, &template)?.count(),
            batsat.solve(&input, &template)?.count()
        );
        Ok(())
    }

    /// A solver that never gets an answer
    struct Unresponsive(ExhaustiveSolver);

    impl SATSolver for Unresponsive {
        fn add_variables(&mut self, num_vars: u32) {
            self.0.add_variables(num_vars);
        }

        fn add_clause(&mut self, lits: &[i32]) -> bool {
            self.0.add_clause(lits)
        }

        fn solve(&mut self) -> Result<bool> {
            Err(PcspError::Backend("timed out".to_string()))
        }

        fn value_of(&self, var: u32) -> bool {
            self.0.value_of(var)
        }

        fn num_variables(&self) -> u32 {
            self.0.num_variables()
        }

        fn num_clauses(&self) -> u32 {
            self.0.num_clauses()
        }
    }

    struct UnresponsiveBackend;

    impl SatBackend for UnresponsiveBackend {
        type Solver = Unresponsive;

        fn create(&self) -> Self::Solver {
            Unresponsive(ExhaustiveSolver::new())
        }
    }

    #[test]
    fn backend_failure_is_not_unsatisfiability() {
        let solver = CspSolver::with_backend(UnresponsiveBackend, Options::default());
        assert!(matches!(
            solver.find(&clique(2), &clique(2)),
            Err(PcspError::Backend(_))
        ));
    }

    #[test]
    fn malformed_structures_are_rejected() {
        let bad = Structure::new(vec![0], vec![vec![vec![0, 1]]]);
        let solver = CspSolver::new(Options::default());
        assert!(matches!(
            solver.solve(&bad, &one_point(&[2])),
            Err(PcspError::MalformedStructure(_))
        ));
    }

    #[test]
    fn binary_polymorphisms_of_a_point() -> Result<()> {
        let solver = CspSolver::new(Options::default());
        let all = polymorphisms(&one_point(&[2]), &clique(2), 2, &solver)?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(all.len(), 0);
        let all = polymorphisms(&clique(2), &clique(2), 2, &solver)?
            .collect::<Result<Vec<_>>>()?;
        // the two projections and their negations
        assert_eq!(all.len(), 4);
        Ok(())
    }

    #[test]
    fn polymorphisms_of_mixed_arity() {
        let bad = Structure::new(0..2, vec![vec![vec![0, 1], vec![1]]]);
        let solver = CspSolver::new(Options::default());
        assert!(matches!(
            polymorphisms(&bad, &clique(2), 2, &solver),
            Err(PcspError::MalformedStructure(_))
        ));
    }
}
