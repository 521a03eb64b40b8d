//! Named minor conditions

use crate::error::{PcspError, Result};
use crate::label_cover::LabelCover;
use crate::reduction::LcVar;
use crate::structure::library::{clique, nae, ocycle, onein, path};
use crate::structure::Structure;

use super::{loop_condition_named, sigma};

/// Weak near-unanimity of arity `n`, symbol `w`
pub fn wnu(n: usize) -> Result<LabelCover<String>> {
    loop_condition_named(&onein(n), ["w"], "i0")
}

/// Quasi near-unanimity of arity `n`, symbol `m`
pub fn qnu(n: usize) -> Result<LabelCover<String>> {
    let tuples = (0..=n)
        .map(|k| (0..n).map(|i| usize::from(i == k)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    loop_condition_named(&Structure::new(0..2, vec![tuples]), ["m"], "i0")
}

/// Siggers operation of arity 4 or 6, symbol `s`
///
/// The 4-ary one is `s(a,r,e,a) = s(r,a,r,e)`, the 6-ary one is the loop
/// condition of the triangle.
///
/// # Errors
/// Returns `InvalidArgument` for any other arity
pub fn siggers(n: usize) -> Result<LabelCover<String>> {
    match n {
        4 => {
            let edges = "area".chars().zip("rare".chars()).map(|(x, y)| vec![x, y]);
            let are = Structure::new("are".chars(), vec![edges.collect::<Vec<_>>()]);
            loop_condition_named(&are, ["s"], "i0")
        }
        6 => loop_condition_named(&clique(3), ["s"], "i0"),
        _ => Err(PcspError::InvalidArgument(format!(
            "there is no Siggers operation of arity {}",
            n
        ))),
    }
}

/// The `(n^k - n)`-ary Olšák identity, symbol `o`
///
/// With `n = 2` and `k = 3` this is
/// `o(x,x,x,y,y,y) = o(x,y,y,x,x,y) = o(y,x,y,x,y,x)`.
pub fn olsak(n: usize, k: usize) -> Result<LabelCover<String>> {
    loop_condition_named(&nae(n, k), ["o"], "i0")
}

/// Cyclic operation of arity `p`, symbol `c`
pub fn cyclic(p: usize) -> Result<LabelCover<String>> {
    loop_condition_named(&ocycle(p), ["c"], "i0")
}

/// Ternary Hagemann-Mitschke chain of length `n`, the terms of congruence
/// `(n + 1)`-permutability
///
/// This is `Σ(P, L)` where `P` is the oriented path with `n` edges, its
/// endpoints marked, and `L` is `≤` on `{0, 1}` with both constants. For
/// `n = 1` it is a Maltsev term.
pub fn hageman_mitschke(n: usize) -> Result<LabelCover<LcVar<usize>>> {
    let leq = Structure::new(0..2, vec![vec![vec![0, 0], vec![0, 1], vec![1, 1]]])
        .singleton_expansion();
    let marked = path(n).expand(vec![vec![vec![n]], vec![vec![0]]]);
    sigma(&marked, &leq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arities() -> Result<()> {
        assert_eq!(wnu(3)?.size_of(&"w".to_string()), Some(3));
        assert_eq!(qnu(3)?.size_of(&"m".to_string()), Some(4));
        assert_eq!(siggers(4)?.size_of(&"s".to_string()), Some(4));
        assert_eq!(siggers(6)?.size_of(&"s".to_string()), Some(6));
        assert_eq!(olsak(2, 3)?.size_of(&"o".to_string()), Some(6));
        assert_eq!(cyclic(5)?.size_of(&"c".to_string()), Some(5));
        Ok(())
    }

    #[test]
    fn wnu_has_one_constraint_per_coordinate() -> Result<()> {
        let w = wnu(4)?;
        assert_eq!(w.num_constraints(), 4);
        assert_eq!(w.size_of(&"i0".to_string()), Some(2));
        Ok(())
    }

    #[test]
    fn siggers_of_other_arity() {
        assert!(matches!(siggers(5), Err(PcspError::InvalidArgument(_))));
    }

    #[test]
    fn hageman_mitschke_shape() -> Result<()> {
        let hm = hageman_mitschke(2)?;
        // 3 path elements, 2 edges, 2 marks
        assert_eq!(hm.num_variables(), 7);
        assert_eq!(hm.size_of(&LcVar::Element(1)), Some(2));
        let edge = LcVar::Tuple {
            relation: 0,
            tuple: vec![0, 1],
        };
        assert_eq!(hm.size_of(&edge), Some(3));
        Ok(())
    }
}
