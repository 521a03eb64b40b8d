//! CSP to label cover
//!
//! Every element of the input becomes a variable ranging over the template
//! domain, and every tuple of the input becomes a variable ranging over the
//! matching template relation. The tuple variable projects onto its k-th
//! coordinate by sending each template tuple to its k-th element.

use std::fmt;

use crate::error::{PcspError, Result};
use crate::label_cover::LabelCover;
use crate::structure::{Element, Structure};

use super::{Decoder, Homomorphism, Labeling, Reduction};

/// Variables of the label cover instance built from a CSP instance
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum LcVar<E> {
    /// A domain element of the input
    Element(E),
    /// A tuple of the `relation`-th input relation
    Tuple {
        /// Index of the relation
        relation: usize,
        /// The tuple itself
        tuple: Vec<E>,
    },
}

impl<E: fmt::Debug> fmt::Debug for LcVar<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcVar::Element(e) => write!(f, "{:?}", e),
            LcVar::Tuple { relation, tuple } => write!(f, "R{}{:?}", relation, tuple),
        }
    }
}

/// Maps label cover solutions to homomorphisms
#[derive(Debug, Clone)]
pub struct CspDecoder<E, F> {
    input: Vec<E>,
    template: Vec<F>,
}

impl<E: Element, F: Element> Decoder<Labeling<LcVar<E>>> for CspDecoder<E, F> {
    type Output = Homomorphism<E, F>;

    fn decode(&self, solution: Labeling<LcVar<E>>) -> Result<Self::Output> {
        self.input
            .iter()
            .map(|e| {
                let image = solution
                    .get(&LcVar::Element(e.clone()))
                    .and_then(|&i| self.template.get(i))
                    .ok_or_else(|| {
                        PcspError::IncompleteSolution(format!("no value for element {:?}", e))
                    })?;
                Ok((e.clone(), image.clone()))
            })
            .collect()
    }
}

/// Reduces `CSP(input, template)` to label cover
///
/// # Errors
/// Returns `MalformedStructure` if the structures are not similar or a
/// template tuple leaves the template domain, and `UnknownElement` if an
/// input tuple leaves the input domain
pub fn csp_to_lc<E: Element, F: Element>(
    input: &Structure<E>,
    template: &Structure<F>,
) -> Result<Reduction<LabelCover<LcVar<E>>, CspDecoder<E, F>>> {
    if !input.is_similar(template) {
        return Err(PcspError::MalformedStructure(format!(
            "input with {} relations is not similar to template with {}",
            input.relations().len(),
            template.relations().len()
        )));
    }

    let inverse = template.domain_index();
    let mut lc = LabelCover::new();
    for v in input.domain() {
        lc.add_variable(LcVar::Element(v.clone()), template.size())?;
    }

    for (i, (ours, theirs)) in input.relations().iter().zip(template.relations()).enumerate() {
        // projections[k] sends template tuple j to the index of its k-th element
        let arity = theirs.first().map_or(0, |t| t.len());
        let projections = (0..arity)
            .map(|k| {
                theirs
                    .iter()
                    .enumerate()
                    .map(|(j, t)| {
                        inverse.get(&t[k]).map(|&a| (j, a)).ok_or_else(|| {
                            PcspError::MalformedStructure(format!(
                                "{:?} is not in the template domain",
                                t[k]
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        for tuple in ours {
            let aux = LcVar::Tuple {
                relation: i,
                tuple: tuple.clone(),
            };
            lc.add_variable(aux.clone(), theirs.len())?;
            for (v, projection) in tuple.iter().zip(&projections) {
                lc.add_constraint(aux.clone(), LcVar::Element(v.clone()), projection.iter().copied())?;
            }
        }
    }

    log::debug!(
        "CSP to label cover: {} variables, {} constraints",
        lc.num_variables(),
        lc.num_constraints()
    );

    let decoder = CspDecoder {
        input: input.domain().to_vec(),
        template: template.domain().to_vec(),
    };
    Ok(Reduction::new(lc, decoder))
}
