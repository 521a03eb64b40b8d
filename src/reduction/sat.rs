//! Label cover to SAT
//!
//! One-hot encoding: a label cover variable `v` of size `d` owns the atoms
//! `offset(v) + 1 ..= offset(v) + d`, and exactly one of them is true. Each
//! constraint pair `(i, j)` becomes the clause "source takes `i` implies
//! target takes `j`".

use crate::cnf::CNF;
use crate::error::{PcspError, Result};
use crate::label_cover::LabelCover;
use crate::structure::Element;

use super::{Decoder, Labeling, Reduction};

/// Maps SAT models back to label cover solutions
#[derive(Debug, Clone)]
pub struct SatDecoder<V> {
    variables: Vec<(V, usize)>,
    // atom of value a of variable k is offsets[k] + a + 1
    offsets: Vec<u32>,
    num_atoms: u32,
}

impl<V> SatDecoder<V> {
    fn owner(&self, atom: u32) -> Option<(usize, usize)> {
        if atom == 0 || atom > self.num_atoms {
            return None;
        }
        // last variable whose block starts at or before the atom; empty
        // blocks share their start with the next one and are skipped
        let k = self.offsets.partition_point(|&o| o < atom).checked_sub(1)?;
        let value = (atom - self.offsets[k] - 1) as usize;
        (value < self.variables[k].1).then_some((k, value))
    }
}

impl<V: Element> Decoder<Vec<i32>> for SatDecoder<V> {
    type Output = Labeling<V>;

    fn decode(&self, model: Vec<i32>) -> Result<Self::Output> {
        let mut labeling = Labeling::default();
        for lit in model.into_iter().filter(|&lit| lit > 0) {
            let (k, value) = self.owner(lit.unsigned_abs()).ok_or_else(|| {
                PcspError::IncompleteSolution(format!("literal {} is not an atom of the encoding", lit))
            })?;
            labeling.insert(self.variables[k].0.clone(), value);
        }
        Ok(labeling)
    }
}

/// Reduces a label cover instance to CNF
///
/// # Errors
/// Returns `CapacityExceeded` if the atoms do not fit signed 32-bit literals
pub fn lc_to_sat<V: Element>(instance: LabelCover<V>) -> Result<Reduction<CNF, SatDecoder<V>>> {
    let mut offsets = Vec::with_capacity(instance.num_variables());
    let mut next: u64 = 0;
    for (_, size) in instance.variables() {
        offsets.push(next);
        next += *size as u64;
    }
    if next > i32::MAX as u64 {
        return Err(PcspError::CapacityExceeded(format!(
            "{} atoms do not fit in 32-bit literals",
            next
        )));
    }
    // every offset is at most `next`, so these conversions are lossless
    let offsets = offsets.into_iter().map(|o| o as u32).collect::<Vec<_>>();
    let atom = |k: usize, a: usize| (offsets[k] as usize + a + 1) as i32;

    let mut cnf = CNF::new();
    for (k, (_, size)) in instance.variables().iter().enumerate() {
        let atoms = (0..*size).map(|a| atom(k, a)).collect::<Vec<_>>();
        cnf.add_exactly_one(&atoms);
    }
    for constraint in instance.constraints() {
        let (Some(s), Some(t)) = (
            instance.position(&constraint.source),
            instance.position(&constraint.target),
        ) else {
            return Err(PcspError::MalformedInstance(format!(
                "constraint on undeclared {:?} -> {:?}",
                constraint.source, constraint.target
            )));
        };
        for &(i, j) in &constraint.projection {
            cnf.add_implication(atom(s, i), atom(t, j));
        }
    }
    cnf.num_variables = next as u32;

    log::debug!(
        "label cover to SAT: {} atoms, {} clauses",
        cnf.num_variables,
        cnf.num_clauses()
    );

    let decoder = SatDecoder {
        variables: instance.variables().to_vec(),
        offsets,
        num_atoms: next as u32,
    };
    Ok(Reduction::new(cnf, decoder))
}
