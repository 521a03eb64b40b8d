//! Indicator structures
//!
//! For a template `A` and a minor condition `Σ`, the indicator structure
//! `I(A, Σ)` is built on the nodes `(f, x)`: a function symbol `f` of arity
//! `r` together with an argument tuple `x ∈ A^r`. Each identity
//! `f(x_π) = g(x)` glues `(f, x∘π)` to `(g, x)`, and the domain of the
//! indicator structure is the set of glued classes. The relations come from
//! the powers of the relations of `A`, read through the classes.
//!
//! A homomorphism from `I(A, Σ)` to `B` assigns a value to every node, which
//! is the same as assigning an operation table `A^r -> B` to every symbol
//! such that all identities hold and every table is a polymorphism. Only the
//! symbols in a reachability cover of `Σ` generate relations; everything
//! else is tied to them by the identities.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cover::reachability_cover;
use crate::engine::SatBackend;
use crate::error::{PcspError, Result};
use crate::label_cover::LabelCover;
use crate::reduction::{Decoder, Homomorphism, Reduction};
use crate::solver::CspSolver;
use crate::structure::{sequence_index, Element, Odometer, Structure};
use crate::union_find::{Classes, Partition};

/// An operation `A^arity -> B` given by its full table
#[derive(Clone)]
pub struct OperationTable<E, F> {
    arity: usize,
    table: FxHashMap<Vec<E>, F>,
}

impl<E: Element, F: Element> OperationTable<E, F> {
    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Value at `args`, if `args` is in the table
    pub fn apply(&self, args: &[E]) -> Option<&F> {
        self.table.get(args)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates over `(args, value)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&[E], &F)> + '_ {
        self.table.iter().map(|(args, value)| (args.as_slice(), value))
    }
}

impl<E: fmt::Debug, F: fmt::Debug> fmt::Debug for OperationTable<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationTable")
            .field("arity", &self.arity)
            .field("entries", &self.table.len())
            .finish()
    }
}

impl<E: Element, F: PartialEq> PartialEq for OperationTable<E, F> {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.table == other.table
    }
}

impl<E: Element, F: Eq> Eq for OperationTable<E, F> {}

/// An operation table for every function symbol of a minor condition
pub type Polymorphisms<V, E, F> = FxHashMap<V, OperationTable<E, F>>;

#[derive(Debug)]
struct Layout<V, E> {
    template: Vec<E>,
    // symbol, arity, index of its first node
    symbols: Vec<(V, usize, usize)>,
    classes: Classes,
}

/// Turns homomorphisms from an indicator structure into operation tables
///
/// Cloning is cheap; the node layout is shared.
#[derive(Debug)]
pub struct IndicatorDecoder<V, E> {
    layout: Arc<Layout<V, E>>,
}

impl<V, E> Clone for IndicatorDecoder<V, E> {
    fn clone(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
        }
    }
}

impl<V: Element, E: Element, F: Element> Decoder<Homomorphism<usize, F>> for IndicatorDecoder<V, E> {
    type Output = Polymorphisms<V, E, F>;

    fn decode(&self, h: Homomorphism<usize, F>) -> Result<Self::Output> {
        let layout = &*self.layout;
        let n = layout.template.len();
        let mut polymorphisms = Polymorphisms::default();
        for (symbol, arity, offset) in &layout.symbols {
            let mut table = FxHashMap::default();
            for (i, digits) in Odometer::new(n, *arity).enumerate() {
                let value = layout
                    .classes
                    .class_index(offset + i)
                    .and_then(|class| h.get(&class))
                    .ok_or_else(|| {
                        PcspError::IncompleteSolution(format!(
                            "no value for {:?} at {:?}",
                            symbol, digits
                        ))
                    })?;
                let args = digits.iter().map(|&d| layout.template[d].clone()).collect();
                table.insert(args, value.clone());
            }
            polymorphisms.insert(
                symbol.clone(),
                OperationTable {
                    arity: *arity,
                    table,
                },
            );
        }
        Ok(polymorphisms)
    }
}

fn class_of(classes: &Classes, node: usize) -> Result<usize> {
    classes
        .class_index(node)
        .ok_or_else(|| PcspError::UnknownElement(format!("indicator node {}", node)))
}

/// Builds the indicator structure of `template` and `sigma`
///
/// Domain elements of the result are node indices, each standing for its
/// class. The structure is similar to `template`.
///
/// # Errors
/// Returns `MalformedStructure` for a malformed template,
/// `MalformedInstance` if a constraint of `sigma` is not a function, and
/// `CapacityExceeded` if there are too many nodes
pub fn indicator_structure<V: Element, E: Element>(
    template: &Structure<E>,
    sigma: &LabelCover<V>,
) -> Result<Reduction<Structure<usize>, IndicatorDecoder<V, E>>> {
    template.check()?;
    let n = template.size();

    let mut symbols = Vec::with_capacity(sigma.num_variables());
    let mut num_nodes = 0usize;
    for (symbol, arity) in sigma.variables() {
        let total = Odometer::count_all(n, *arity).and_then(|count| num_nodes.checked_add(count));
        let Some(total) = total else {
            return Err(PcspError::CapacityExceeded(format!(
                "{}^{} nodes for {:?}",
                n, arity, symbol
            )));
        };
        symbols.push((symbol.clone(), *arity, num_nodes));
        num_nodes = total;
    }

    let mut nodes = Partition::new(num_nodes);
    let mut edges = Vec::with_capacity(sigma.num_constraints());
    for constraint in sigma.constraints() {
        let (Some(f), Some(g)) = (
            sigma.position(&constraint.source),
            sigma.position(&constraint.target),
        ) else {
            return Err(PcspError::MalformedInstance(format!(
                "constraint on undeclared {:?} -> {:?}",
                constraint.source, constraint.target
            )));
        };
        let (_, f_arity, f_offset) = symbols[f];
        let (_, g_arity, g_offset) = symbols[g];
        let pi = constraint.as_function(f_arity)?;

        // f(x_π(0), ..., x_π(r-1)) = g(x)
        let mut minor = vec![0; f_arity];
        for (i, x) in Odometer::new(n, g_arity).enumerate() {
            for (slot, &p) in minor.iter_mut().zip(&pi) {
                *slot = x[p];
            }
            nodes.union(f_offset + sequence_index(n, &minor), g_offset + i);
        }
        edges.push((f, g));
    }

    let roots = reachability_cover(&(0..symbols.len()).collect::<Vec<_>>(), edges);
    let classes = nodes.into_classes();
    log::debug!(
        "indicator structure: {} nodes in {} classes, {} of {} symbols generate",
        num_nodes,
        classes.num_classes(),
        roots.len(),
        symbols.len()
    );

    let index = template.domain_index();
    let mut relations = Vec::with_capacity(template.relations().len());
    for relation in template.relations() {
        // template tuples as index vectors
        let rows = relation
            .iter()
            .map(|t| t.iter().map(|a| index[a]).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let arity = rows.first().map_or(0, |t| t.len());

        let mut tuples = Vec::new();
        if !rows.is_empty() {
            for &root in &roots {
                let (_, r, offset) = symbols[root];
                for picks in Odometer::new(rows.len(), r) {
                    let tuple = (0..arity)
                        .map(|j| {
                            let column = picks.iter().map(|&p| rows[p][j]).collect::<Vec<_>>();
                            class_of(&classes, offset + sequence_index(n, &column))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    tuples.push(tuple);
                }
            }
        }
        relations.push(tuples);
    }

    let structure = Structure::new(classes.representatives().iter().copied(), relations);
    let decoder = IndicatorDecoder {
        layout: Arc::new(Layout {
            template: template.domain().to_vec(),
            symbols,
            classes,
        }),
    };
    Ok(Reduction::new(structure, decoder))
}

/// Enumerates the solutions of `sigma` in `Pol(template, target)`
///
/// Each solution assigns to every symbol of `sigma` a polymorphism from
/// `template` to `target` of the symbol's arity, and the assignment
/// satisfies every identity of `sigma`. Solutions are produced lazily.
///
/// # Errors
/// Fails if building the indicator structure or the reduction fails
pub fn solve_minor_condition<V, E, F, B>(
    template: &Structure<E>,
    target: &Structure<F>,
    sigma: &LabelCover<V>,
    solver: &CspSolver<B>,
) -> Result<impl Iterator<Item = Result<Polymorphisms<V, E, F>>>>
where
    V: Element,
    E: Element,
    F: Element,
    B: SatBackend,
{
    indicator_structure(template, sigma)?.solve(|indicator| solver.solve(&indicator, target))
}

/// Returns a solution of `sigma` in `Pol(template, target)`, if there is one
///
/// # Errors
/// Fails if building the indicator structure, reducing, or decoding fails
pub fn check_minor_condition<V, E, F, B>(
    template: &Structure<E>,
    target: &Structure<F>,
    sigma: &LabelCover<V>,
    solver: &CspSolver<B>,
) -> Result<Option<Polymorphisms<V, E, F>>>
where
    V: Element,
    E: Element,
    F: Element,
    B: SatBackend,
{
    solve_minor_condition(template, target, sigma, solver)?
        .next()
        .transpose()
}

/// Checks operation tables against the identities of `sigma` by direct
/// substitution
///
/// # Errors
/// Returns `IncompleteSolution` if a symbol has no table, and
/// `MalformedInstance` if a constraint is not a function
pub fn satisfies_minor_condition<V: Element, E: Element, F: Element>(
    polymorphisms: &Polymorphisms<V, E, F>,
    sigma: &LabelCover<V>,
) -> Result<bool> {
    let table = |symbol: &V| {
        polymorphisms
            .get(symbol)
            .ok_or_else(|| PcspError::IncompleteSolution(format!("no table for {:?}", symbol)))
    };
    for constraint in sigma.constraints() {
        let f = table(&constraint.source)?;
        let g = table(&constraint.target)?;
        let pi = constraint.as_function(f.arity())?;
        for (x, value) in g.iter() {
            let minor = pi.iter().map(|&p| x[p].clone()).collect::<Vec<_>>();
            if f.apply(&minor) != Some(value) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
