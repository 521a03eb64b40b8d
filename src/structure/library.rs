//! Predefined structures
//!
//! Graphs and boolean templates that show up again and again when testing
//! minor conditions. All of them are built over `usize` elements.

use super::{Odometer, Structure};

/// The k-clique graph
pub fn clique(k: usize) -> Structure<usize> {
    let edges = (0..k)
        .flat_map(|i| (0..k).filter(move |&j| j != i).map(move |j| vec![i, j]))
        .collect::<Vec<_>>();
    Structure::new(0..k, vec![edges])
}

/// The undirected n-cycle graph
pub fn cycle(n: usize) -> Structure<usize> {
    match n {
        1 => return one_point(&[2]),
        2 => return clique(2),
        _ => {}
    }
    let edges = (0..n)
        .step_by(2)
        .chain((1..n).step_by(2))
        .flat_map(|a| [vec![a, (a + n - 1) % n], vec![a, (a + 1) % n]])
        .collect::<Vec<_>>();
    Structure::new(0..n, vec![edges])
}

/// The oriented n-cycle graph
pub fn ocycle(n: usize) -> Structure<usize> {
    if n == 1 {
        return one_point(&[2]);
    }
    Structure::new(0..n, vec![(0..n).map(|i| vec![i, (i + 1) % n]).collect::<Vec<_>>()])
}

/// The oriented path with `n` edges
pub fn path(n: usize) -> Structure<usize> {
    Structure::new(0..=n, vec![(0..n).map(|i| vec![i, i + 1]).collect::<Vec<_>>()])
}

/// Not-all-equal on an n-element set, with relation of the given arity
pub fn nae(n: usize, arity: usize) -> Structure<usize> {
    let tuples = Odometer::new(n, arity)
        .filter(|x| x.iter().any(|&a| a != x[0]))
        .collect::<Vec<_>>();
    Structure::new(0..n, vec![tuples])
}

/// 1-in-n: boolean tuples of length n with exactly one 1
pub fn onein(n: usize) -> Structure<usize> {
    tinn(1, n)
}

/// t-in-n: boolean tuples of length n with exactly t ones
///
/// Tuples are listed by the positions of their ones, in lexicographic order.
pub fn tinn(t: usize, n: usize) -> Structure<usize> {
    let tuples = combinations(n, t)
        .into_iter()
        .map(|ones| {
            let mut tuple = vec![0; n];
            for i in ones {
                tuple[i] = 1;
            }
            tuple
        })
        .collect::<Vec<_>>();
    Structure::new(0..2, vec![tuples])
}

/// The one-element structure with a loop of every given arity
pub fn one_point(arities: &[usize]) -> Structure<usize> {
    Structure::new(0..1, arities.iter().map(|&r| vec![vec![0; r]]))
}

/// Affine equations over Z_p: relation `r` holds the tuples summing to `r`
pub fn affine(p: usize, arity: usize) -> Structure<usize> {
    let mut relations = vec![Vec::new(); p];
    if p > 0 {
        for x in Odometer::new(p, arity) {
            relations[x.iter().sum::<usize>() % p].push(x);
        }
    }
    Structure::new(0..p, relations)
}

/// Horn-SAT: the two ternary Horn clauses and both constants
pub fn hornsat() -> Structure<usize> {
    let without = |excluded: [usize; 3]| {
        Odometer::new(2, 3)
            .filter(move |x| x[..] != excluded[..])
            .collect::<Vec<_>>()
    };
    Structure::new(
        0..2,
        vec![without([0, 0, 1]), without([0, 0, 0]), vec![vec![0]], vec![vec![1]]],
    )
}

/// All `k`-subsets of `0..n` in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        result.push(current.clone());
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return result;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;

    #[test]
    fn clique_edges() -> Result<()> {
        let k = clique(3);
        k.check()?;
        assert_eq!(k.relations()[0].len(), 6);
        assert!(k.relations()[0].iter().all(|e| e[0] != e[1]));
        Ok(())
    }

    #[test]
    fn cycle_is_symmetric() -> Result<()> {
        let c = cycle(5);
        c.check()?;
        assert_eq!(c.relations()[0].len(), 10);
        for e in &c.relations()[0] {
            assert!(c.relations()[0].contains(&vec![e[1], e[0]]));
        }
        assert_eq!(cycle(2).relations()[0].len(), 2);
        assert_eq!(cycle(1).size(), 1);
        Ok(())
    }

    #[test]
    fn oriented_cycle_and_path() -> Result<()> {
        assert_eq!(ocycle(3).relations()[0], vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
        let p = path(2);
        p.check()?;
        assert_eq!(p.size(), 3);
        assert_eq!(p.relations()[0], vec![vec![0, 1], vec![1, 2]]);
        Ok(())
    }

    #[test]
    fn nae_counts() {
        assert_eq!(nae(2, 3).relations()[0].len(), 6);
        assert_eq!(nae(3, 2).relations()[0].len(), 6);
    }

    #[test]
    fn one_in_three() {
        assert_eq!(
            onein(3).relations()[0],
            vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]
        );
        assert_eq!(tinn(2, 4).relations()[0].len(), 6);
        assert_eq!(tinn(5, 4).relations()[0].len(), 0);
    }

    #[test]
    fn affine_partitions_cube() -> Result<()> {
        let a = affine(2, 3);
        a.check()?;
        assert_eq!(a.relations().len(), 2);
        assert_eq!(a.relations()[0].len(), 4);
        assert_eq!(a.relations()[1].len(), 4);
        Ok(())
    }

    #[test]
    fn hornsat_shape() -> Result<()> {
        let h = hornsat();
        h.check()?;
        assert_eq!(h.signature()?, &[Some(3), Some(3), Some(1), Some(1)]);
        assert_eq!(h.relations()[0].len(), 7);
        assert!(!h.relations()[1].contains(&vec![0, 0, 0]));
        Ok(())
    }

    #[test]
    fn one_point_loops() -> Result<()> {
        let l = one_point(&[2, 3]);
        assert_eq!(l.signature()?, &[Some(2), Some(3)]);
        Ok(())
    }
}
