//! CNF formulas and the clause shapes used by the one-hot encoding

use std::iter;

/// CNF representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CNF {
    /// Number of variables
    pub num_variables: u32,
    /// CNF clauses (each clause is a vec of literals, negative = negated)
    pub clauses: Vec<Vec<i32>>,
}

impl CNF {
    /// Creates a new empty CNF
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause to the CNF
    pub fn add_clause(&mut self, clause: Vec<i32>) {
        // Update max variable
        for &lit in &clause {
            let var = lit.unsigned_abs();
            if var > self.num_variables {
                self.num_variables = var;
            }
        }
        self.clauses.push(clause);
    }

    /// Adds clauses forcing exactly one of `vars` to be true
    ///
    /// One positive clause over all variables, and one negative binary clause
    /// per unordered pair. An empty slice yields the empty clause.
    pub fn add_exactly_one(&mut self, vars: &[i32]) {
        self.add_clause(vars.to_vec());
        for (i, &a) in vars.iter().enumerate() {
            for &b in &vars[i + 1..] {
                self.add_clause(vec![-a, -b]);
            }
        }
    }

    /// Adds the clause `a → b`
    pub fn add_implication(&mut self, a: i32, b: i32) {
        self.add_clause(vec![-a, b]);
    }

    /// Number of clauses
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if the empty clause is present
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|c| c.is_empty())
    }

    /// Writes the formula in DIMACS format
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.num_clauses());
        for clause in &self.clauses {
            let line = clause
                .iter()
                .map(|lit| lit.to_string())
                .chain(iter::once("0".to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
