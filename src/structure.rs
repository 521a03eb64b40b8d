//! Relational structures: a domain together with a list of relations
//!
//! Structures are immutable once built. Products, powers and expansions all
//! return new structures. Tuples of a relation are kept in insertion order
//! with duplicates removed, so the position of a tuple in its relation is a
//! stable index (the label cover encoding relies on it).

pub mod library;

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::OnceCell;
use std::fmt;
use std::hash::Hash;

use crate::error::{PcspError, Result};

/// Anything that can be an element of a structure's domain
pub trait Element: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> Element for T {}

/// A relational structure
///
/// `domain` is an ordered sequence of distinct elements, and every relation
/// is an ordered set of tuples over it.
#[derive(Clone, Debug)]
pub struct Structure<E> {
    domain: Vec<E>,
    relations: Vec<Vec<Vec<E>>>,
    signature: OnceCell<Vec<Option<usize>>>,
}

impl<E: Element> Structure<E> {
    /// Creates a structure from a domain and relations
    ///
    /// No validation happens here; call [`Structure::check`] for that.
    /// Repeated tuples within a relation are dropped.
    pub fn new<D, R, T>(domain: D, relations: R) -> Self
    where
        D: IntoIterator<Item = E>,
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = Vec<E>>,
    {
        Self {
            domain: domain.into_iter().collect(),
            relations: relations.into_iter().map(dedup_tuples).collect(),
            signature: OnceCell::new(),
        }
    }

    /// Returns the domain
    pub fn domain(&self) -> &[E] {
        &self.domain
    }

    /// Returns all relations
    pub fn relations(&self) -> &[Vec<Vec<E>>] {
        &self.relations
    }

    /// Returns the relation at position `i`
    pub fn relation(&self, i: usize) -> Option<&[Vec<E>]> {
        self.relations.get(i).map(|r| r.as_slice())
    }

    /// Returns the number of domain elements
    pub fn size(&self) -> usize {
        self.domain.len()
    }

    /// Returns the position of every domain element
    pub fn domain_index(&self) -> FxHashMap<&E, usize> {
        self.domain.iter().enumerate().map(|(i, a)| (a, i)).collect()
    }

    /// Returns the arity of each relation, `None` for empty relations
    ///
    /// Memoized after the first successful call.
    ///
    /// # Errors
    /// Returns `MalformedStructure` if a relation mixes tuple lengths
    pub fn signature(&self) -> Result<&[Option<usize>]> {
        if let Some(signature) = self.signature.get() {
            return Ok(signature);
        }
        let signature = self
            .relations
            .iter()
            .enumerate()
            .map(|(i, relation)| arity_of(relation).ok_or_else(|| {
                PcspError::MalformedStructure(format!("relation {} has ambiguous arity", i))
            }))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.signature.get_or_init(|| signature))
    }

    /// Checks that all relations have a well-defined arity and live on the domain
    ///
    /// # Errors
    /// Returns `MalformedStructure` on mixed arities, repeated domain
    /// elements, or tuples mentioning elements outside the domain
    pub fn check(&self) -> Result<()> {
        self.signature()?;

        let index = self.domain_index();
        if index.len() != self.domain.len() {
            return Err(PcspError::MalformedStructure(
                "domain contains repeated elements".to_string(),
            ));
        }

        for (i, relation) in self.relations.iter().enumerate() {
            for tuple in relation {
                if let Some(a) = tuple.iter().find(|a| !index.contains_key(a)) {
                    return Err(PcspError::MalformedStructure(format!(
                        "relation {} mentions {:?} which is not in the domain",
                        i, a
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns true if both structures have the same number of relations and
    /// their arities agree wherever both are defined
    ///
    /// A structure with a relation of ambiguous arity is not similar to anything.
    pub fn is_similar<F: Element>(&self, other: &Structure<F>) -> bool {
        let (Ok(mine), Ok(theirs)) = (self.signature(), other.signature()) else {
            return false;
        };
        mine.len() == theirs.len()
            && mine.iter().zip(theirs).all(|pair| match pair {
                (Some(n), Some(m)) => n == m,
                _ => true,
            })
    }

    /// Returns the `exponent`-th power of this structure
    ///
    /// The domain lists all sequences of length `exponent` in lexicographic
    /// order of domain positions (the last coordinate varies fastest). A
    /// tuple of sequences is in the i-th relation iff every coordinate-wise
    /// slice is a tuple of the i-th relation of `self`.
    ///
    /// # Errors
    /// Returns `MalformedStructure` if a relation mixes tuple lengths
    pub fn power(&self, exponent: usize) -> Result<Structure<Vec<E>>> {
        let signature = self.signature()?;
        let domain = Odometer::new(self.domain.len(), exponent)
            .map(|digits| digits.iter().map(|&i| self.domain[i].clone()).collect())
            .collect::<Vec<Vec<E>>>();

        let relations = self
            .relations
            .iter()
            .zip(signature)
            .map(|(relation, arity)| {
                power_relation(relation, arity.unwrap_or(0), exponent).collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Ok(Structure::new(domain, relations))
    }

    /// Returns the product of this structure with another
    ///
    /// # Errors
    /// Returns `MalformedStructure` if either structure mixes tuple lengths
    /// within a relation, or if the structures are not similar
    pub fn product<F: Element>(&self, other: &Structure<F>) -> Result<Structure<(E, F)>> {
        self.signature()?;
        other.signature()?;
        if !self.is_similar(other) {
            return Err(PcspError::MalformedStructure(
                "cannot multiply structures that are not similar".to_string(),
            ));
        }

        let domain = self
            .domain
            .iter()
            .flat_map(|a| other.domain.iter().map(move |b| (a.clone(), b.clone())))
            .collect::<Vec<_>>();

        let relations = self
            .relations
            .iter()
            .zip(&other.relations)
            .map(|(left, right)| {
                left.iter()
                    .flat_map(|s| {
                        right.iter().map(move |t| {
                            s.iter().cloned().zip(t.iter().cloned()).collect::<Vec<_>>()
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Ok(Structure::new(domain, relations))
    }

    /// Returns a structure with the given relations appended
    pub fn expand<R, T>(&self, relations: R) -> Structure<E>
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = Vec<E>>,
    {
        Structure::new(
            self.domain.iter().cloned(),
            self.relations
                .iter()
                .cloned()
                .chain(relations.into_iter().map(|r| r.into_iter().collect())),
        )
    }

    /// Adds a singleton unary relation `{(a)}` for every domain element `a`,
    /// so that the result has no nontrivial automorphism
    pub fn singleton_expansion(&self) -> Structure<E> {
        self.expand(self.domain.iter().map(|a| vec![vec![a.clone()]]))
    }
}

/// Returns `Some(None)` for an empty relation, `Some(Some(n))` if all tuples
/// have length `n`, and `None` if lengths are mixed
fn arity_of<E>(relation: &[Vec<E>]) -> Option<Option<usize>> {
    let mut tuples = relation.iter();
    let Some(first) = tuples.next() else {
        return Some(None);
    };
    let arity = first.len();
    tuples.all(|t| t.len() == arity).then_some(Some(arity))
}

fn dedup_tuples<E: Element, T: IntoIterator<Item = Vec<E>>>(tuples: T) -> Vec<Vec<E>> {
    let mut seen = FxHashSet::default();
    tuples
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Iterates over the `exponent`-fold product of a relation, transposed
///
/// Each item picks `exponent` tuples `t1..tk` of the relation (in odometer
/// order) and yields the tuple of columns `[(t1[j], ..., tk[j]) for j]`.
/// Every tuple must have length `arity`.
fn power_relation<E: Clone>(
    relation: &[Vec<E>],
    arity: usize,
    exponent: usize,
) -> impl Iterator<Item = Vec<Vec<E>>> + '_ {
    Odometer::new(relation.len(), exponent)
        .filter(move |_| !relation.is_empty())
        .map(move |picks| {
            (0..arity)
                .map(|j| picks.iter().map(|&p| relation[p][j].clone()).collect())
                .collect()
        })
}

/// Enumerates all sequences of a given length over `0..base`
///
/// Sequences come in lexicographic order, the last position varying
/// fastest. A length of zero yields a single empty sequence; a base of zero
/// with positive length yields nothing.
#[derive(Debug, Clone)]
pub struct Odometer {
    base: usize,
    digits: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    /// Creates an odometer over `0..base` with `len` digits
    pub fn new(base: usize, len: usize) -> Self {
        Self {
            base,
            digits: vec![0; len],
            exhausted: base == 0 && len > 0,
        }
    }

    /// Returns the number of sequences this odometer yields in total
    pub fn count_all(base: usize, len: usize) -> Option<usize> {
        base.checked_pow(u32::try_from(len).ok()?)
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.digits.clone();

        // advance, carrying to the left
        self.exhausted = true;
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.base {
                self.exhausted = false;
                break;
            }
            *digit = 0;
        }

        Some(current)
    }
}

/// Returns the position of a sequence in the odometer order over `0..base`
pub fn sequence_index(base: usize, digits: &[usize]) -> usize {
    digits.iter().fold(0, |index, &d| index * base + d)
}
