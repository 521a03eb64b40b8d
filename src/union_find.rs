//! Union-find over an arbitrary hashable domain
//!
//! [`Partition`] does the work on plain indices `0..len`, with parent
//! pointers in a flat vector. Lookups compress paths iteratively, so long
//! chains never recurse. [`UnionFind`] layers registered elements on top,
//! addressing each by its insertion index.

use rustc_hash::FxHashMap;

use crate::error::{PcspError, Result};
use crate::structure::Element;

/// Equivalence classes over the indices `0..len`
#[derive(Clone, Debug, Default)]
pub struct Partition {
    parent: Vec<usize>,
}

impl Partition {
    /// Creates `len` singleton classes
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true if there are no indices
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Adds a singleton class and returns its index
    pub fn push(&mut self) -> usize {
        let index = self.parent.len();
        self.parent.push(index);
        index
    }

    /// Returns the representative of the class of `index`, pointing every
    /// visited index directly at it
    ///
    /// # Panics
    /// Panics if `index` is out of range
    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the classes of `a` and `b`
    ///
    /// Which representative survives is unspecified.
    ///
    /// # Panics
    /// Panics if an index is out of range
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        self.parent[root_a] = root_b;
    }

    /// Iterates over the current representatives in increasing order
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i == p)
            .map(|(i, _)| i)
    }

    /// Number of current classes
    pub fn num_classes(&self) -> usize {
        self.roots().count()
    }

    /// Freezes the classes, pointing every index straight at its
    /// representative
    pub fn into_classes(mut self) -> Classes {
        for i in 0..self.parent.len() {
            self.find(i);
        }
        let representatives = self.roots().collect();
        Classes {
            class_of: self.parent,
            representatives,
        }
    }
}

/// A finished partition of `0..len`
#[derive(Clone, Debug)]
pub struct Classes {
    class_of: Vec<usize>,
    representatives: Vec<usize>,
}

impl Classes {
    /// Number of indices
    pub fn len(&self) -> usize {
        self.class_of.len()
    }

    /// Returns true if there are no indices
    pub fn is_empty(&self) -> bool {
        self.class_of.is_empty()
    }

    /// Returns the representative of `index`
    pub fn class_index(&self, index: usize) -> Option<usize> {
        self.class_of.get(index).copied()
    }

    /// Representatives, in increasing order
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.representatives.len()
    }
}

/// Equivalence classes over registered elements
#[derive(Clone, Debug)]
pub struct UnionFind<T> {
    elements: Vec<T>,
    positions: FxHashMap<T, usize>,
    partition: Partition,
}

impl<T: Element> UnionFind<T> {
    /// Creates an empty union-find
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            positions: FxHashMap::default(),
            partition: Partition::default(),
        }
    }

    /// Registers an element as a singleton class and returns its index
    ///
    /// Registering an element twice returns the existing index.
    pub fn insert(&mut self, element: T) -> usize {
        if let Some(&index) = self.positions.get(&element) {
            return index;
        }
        let index = self.partition.push();
        self.positions.insert(element.clone(), index);
        self.elements.push(element);
        index
    }

    /// Number of registered elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element registered at `index`
    pub fn element(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Returns the index of a registered element
    ///
    /// # Errors
    /// Returns `UnknownElement` if the element was never registered
    pub fn index_of(&self, element: &T) -> Result<usize> {
        self.positions
            .get(element)
            .copied()
            .ok_or_else(|| PcspError::UnknownElement(format!("{:?}", element)))
    }

    /// Returns the representative of the class of `element`
    ///
    /// # Errors
    /// Returns `UnknownElement` if the element was never registered
    pub fn find(&mut self, element: &T) -> Result<&T> {
        let index = self.index_of(element)?;
        let root = self.partition.find(index);
        Ok(&self.elements[root])
    }

    /// Merges the classes of `a` and `b`
    ///
    /// Which representative survives is unspecified.
    ///
    /// # Errors
    /// Returns `UnknownElement` if either element was never registered
    pub fn union(&mut self, a: &T, b: &T) -> Result<()> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.partition.union(a, b);
        Ok(())
    }

    /// Returns true if `a` and `b` are in the same class
    ///
    /// # Errors
    /// Returns `UnknownElement` if either element was never registered
    pub fn same_class(&mut self, a: &T, b: &T) -> Result<bool> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        Ok(self.partition.find(a) == self.partition.find(b))
    }

    /// Iterates over the current representatives, each exactly once
    pub fn classes(&self) -> impl Iterator<Item = &T> + '_ {
        self.partition.roots().map(|i| &self.elements[i])
    }

    /// Number of current classes
    pub fn num_classes(&self) -> usize {
        self.partition.num_classes()
    }

    /// Freezes the classes into a read-only [`Quotient`]
    pub fn into_quotient(self) -> Quotient<T> {
        Quotient {
            elements: self.elements,
            positions: self.positions,
            classes: self.partition.into_classes(),
        }
    }
}

impl<T: Element> Default for UnionFind<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> FromIterator<T> for UnionFind<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut uf = Self::new();
        for element in iter {
            uf.insert(element);
        }
        uf
    }
}

/// A finished partition of registered elements
#[derive(Clone, Debug)]
pub struct Quotient<T> {
    elements: Vec<T>,
    positions: FxHashMap<T, usize>,
    classes: Classes,
}

impl<T: Element> Quotient<T> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element at `index`
    pub fn element(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Returns the representative index of the element at `index`
    pub fn class_index(&self, index: usize) -> Option<usize> {
        self.classes.class_index(index)
    }

    /// Returns the representative of `element`
    ///
    /// # Errors
    /// Returns `UnknownElement` if the element was never registered
    pub fn representative(&self, element: &T) -> Result<&T> {
        let index = self
            .positions
            .get(element)
            .ok_or_else(|| PcspError::UnknownElement(format!("{:?}", element)))?;
        let root = self.classes.class_index(*index).unwrap_or(*index);
        Ok(&self.elements[root])
    }

    /// Indices of the representatives, in increasing order
    pub fn representatives(&self) -> &[usize] {
        self.classes.representatives()
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.classes.num_classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons() -> Result<()> {
        let mut uf: UnionFind<char> = "abc".chars().collect();
        assert_eq!(uf.len(), 3);
        assert_eq!(uf.num_classes(), 3);
        assert_eq!(uf.find(&'b')?, &'b');
        Ok(())
    }

    #[test]
    fn union_merges_classes() -> Result<()> {
        let mut uf: UnionFind<char> = "abcd".chars().collect();
        uf.union(&'a', &'b')?;
        uf.union(&'c', &'d')?;
        assert!(uf.same_class(&'a', &'b')?);
        assert!(!uf.same_class(&'a', &'c')?);
        assert_eq!(uf.num_classes(), 2);

        uf.union(&'b', &'d')?;
        assert!(uf.same_class(&'a', &'c')?);
        assert_eq!(uf.classes().count(), 1);
        Ok(())
    }

    #[test]
    fn union_is_idempotent() -> Result<()> {
        let mut uf: UnionFind<u32> = (0..4).collect();
        uf.union(&0, &1)?;
        uf.union(&0, &1)?;
        uf.union(&1, &0)?;
        assert_eq!(uf.num_classes(), 3);
        let classes: Vec<_> = uf.classes().collect();
        assert_eq!(classes.len(), 3);
        Ok(())
    }

    #[test]
    fn unknown_elements() {
        let mut uf: UnionFind<u32> = (0..2).collect();
        assert!(matches!(uf.find(&7), Err(PcspError::UnknownElement(_))));
        assert!(uf.union(&0, &7).is_err());
    }

    #[test]
    fn long_chain_is_compressed() {
        let n = 100_000;
        let mut partition = Partition::new(n);
        for i in 0..n - 1 {
            // point each root at the next index, building one long chain
            partition.parent[i] = i + 1;
        }
        let root = partition.find(0);
        assert_eq!(root, n - 1);
        assert!(partition.parent[..n - 1].iter().all(|&p| p == root));
    }

    #[test]
    fn partition_of_indices() {
        let mut partition = Partition::new(5);
        partition.union(0, 3);
        partition.union(3, 4);
        assert_eq!(partition.find(0), partition.find(4));
        assert_eq!(partition.num_classes(), 3);
        assert_eq!(partition.push(), 5);

        let classes = partition.into_classes();
        assert_eq!(classes.len(), 6);
        assert_eq!(classes.num_classes(), 4);
        assert_eq!(classes.class_index(0), classes.class_index(4));
        assert_ne!(classes.class_index(1), classes.class_index(2));
        assert_eq!(classes.class_index(6), None);
        assert!(classes
            .representatives()
            .windows(2)
            .all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn quotient_snapshot() -> Result<()> {
        let mut uf: UnionFind<&str> = ["x", "y", "z"].into_iter().collect();
        uf.union(&"x", &"z")?;
        let quotient = uf.into_quotient();
        assert_eq!(quotient.num_classes(), 2);
        assert_eq!(quotient.representative(&"x")?, quotient.representative(&"z")?);
        assert_ne!(quotient.representative(&"x")?, quotient.representative(&"y")?);
        assert_eq!(quotient.class_index(0), Some(2));
        assert!(quotient.representative(&"w").is_err());
        Ok(())
    }
}
