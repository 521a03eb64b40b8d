//! Label cover instances
//!
//! A label cover instance declares a set of variables, each with a finite
//! domain `0..size`, and a list of binary constraints. A constraint on the
//! scope `(source, target)` carries a projection: a set of index pairs
//! `(i, j)` meaning "if source takes value `i` then target takes value `j`".
//!
//! Label cover sits between CSP and SAT in the reduction chain, and it is
//! also the format in which minor conditions are handed to the indicator
//! structure builder. There a variable is a function symbol, its size is the
//! arity, and a total projection describes a minor.

use rustc_hash::FxHashMap;

use crate::error::{PcspError, Result};
use crate::structure::Element;

/// A constraint between two label cover variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint<V> {
    /// First variable of the scope
    pub source: V,
    /// Second variable of the scope
    pub target: V,
    /// Allowed `(source value, target value)` pairs
    pub projection: Vec<(usize, usize)>,
}

impl<V: Element> Constraint<V> {
    /// Returns the projection as a function on `0..source_size`
    ///
    /// # Errors
    /// Returns `MalformedInstance` if some source index has no image, or
    /// two different images
    pub fn as_function(&self, source_size: usize) -> Result<Vec<usize>> {
        let mut pi = vec![None; source_size];
        for &(i, j) in &self.projection {
            match pi.get_mut(i) {
                Some(slot @ None) => *slot = Some(j),
                Some(Some(k)) if *k == j => {}
                Some(Some(_)) => {
                    return Err(PcspError::MalformedInstance(format!(
                        "projection {:?} -> {:?} maps {} twice",
                        self.source, self.target, i
                    )))
                }
                None => {
                    return Err(PcspError::MalformedInstance(format!(
                        "projection {:?} -> {:?} uses index {} outside 0..{}",
                        self.source, self.target, i, source_size
                    )))
                }
            }
        }
        pi.into_iter()
            .enumerate()
            .map(|(i, j)| {
                j.ok_or_else(|| {
                    PcspError::MalformedInstance(format!(
                        "projection {:?} -> {:?} leaves index {} unmapped",
                        self.source, self.target, i
                    ))
                })
            })
            .collect()
    }
}

/// A label cover instance
#[derive(Clone, Debug)]
pub struct LabelCover<V> {
    variables: Vec<(V, usize)>,
    positions: FxHashMap<V, usize>,
    constraints: Vec<Constraint<V>>,
}

impl<V: Element> LabelCover<V> {
    /// Creates an empty instance
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            positions: FxHashMap::default(),
            constraints: Vec::new(),
        }
    }

    /// Declares a variable with domain `0..size`
    ///
    /// Declaring a variable again with the same size is a no-op.
    ///
    /// # Errors
    /// Returns `MalformedInstance` if the variable exists with another size
    pub fn add_variable(&mut self, variable: V, size: usize) -> Result<()> {
        if let Some(&pos) = self.positions.get(&variable) {
            let declared = self.variables[pos].1;
            if declared != size {
                return Err(PcspError::MalformedInstance(format!(
                    "{:?} declared with sizes {} and {}",
                    variable, declared, size
                )));
            }
            return Ok(());
        }
        self.positions.insert(variable.clone(), self.variables.len());
        self.variables.push((variable, size));
        Ok(())
    }

    /// Adds a constraint on `(source, target)`
    ///
    /// # Errors
    /// Returns `UnknownElement` if either variable is undeclared, and
    /// `MalformedInstance` if the projection leaves the declared domains
    pub fn add_constraint<P>(&mut self, source: V, target: V, projection: P) -> Result<()>
    where
        P: IntoIterator<Item = (usize, usize)>,
    {
        let source_size = self.declared_size(&source)?;
        let target_size = self.declared_size(&target)?;
        let projection = projection.into_iter().collect::<Vec<_>>();

        if let Some(&(i, j)) = projection
            .iter()
            .find(|&&(i, j)| i >= source_size || j >= target_size)
        {
            return Err(PcspError::MalformedInstance(format!(
                "pair ({}, {}) does not fit {:?} (size {}) -> {:?} (size {})",
                i, j, source, source_size, target, target_size
            )));
        }

        self.constraints.push(Constraint {
            source,
            target,
            projection,
        });
        Ok(())
    }

    fn declared_size(&self, variable: &V) -> Result<usize> {
        self.size_of(variable)
            .ok_or_else(|| PcspError::UnknownElement(format!("{:?} is not declared", variable)))
    }

    /// Returns the variables with their domain sizes, in declaration order
    pub fn variables(&self) -> &[(V, usize)] {
        &self.variables
    }

    /// Returns the domain size of a variable
    pub fn size_of(&self, variable: &V) -> Option<usize> {
        self.position(variable).map(|pos| self.variables[pos].1)
    }

    /// Returns the declaration position of a variable
    pub fn position(&self, variable: &V) -> Option<usize> {
        self.positions.get(variable).copied()
    }

    /// Returns the constraints in insertion order
    pub fn constraints(&self) -> &[Constraint<V>] {
        &self.constraints
    }

    /// Number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

impl<V: Element> Default for LabelCover<V> {
    fn default() -> Self {
        Self::new()
    }
}
