//! Reductions between CSP, label cover, and SAT
//!
//! A reduction turns an instance of one problem into an instance of another
//! together with a [`Decoder`] that maps solutions of the new instance back
//! to solutions of the old one. Reductions compose with
//! [`Reduction::bind`]: the instance is pushed through the next reduction
//! and the decoders are chained, so decoding once through the composite is
//! the same as decoding twice through the stages.
//!
//! Solving is pull-based. [`Reduction::solve`] hands the instance to a
//! solver that produces a lazy stream of solutions, and wraps that stream so
//! every solution is decoded as it is pulled. An unsolvable instance is an
//! empty stream, not an error.

pub mod csp;
pub mod sat;

use rustc_hash::FxHashMap;

use crate::error::Result;

pub use csp::{csp_to_lc, CspDecoder, LcVar};
pub use sat::{lc_to_sat, SatDecoder};

/// A structure-preserving map, from domain elements of the input to domain
/// elements of the template
pub type Homomorphism<E, F> = FxHashMap<E, F>;

/// A solution to a label cover instance: the value index of every variable
pub type Labeling<V> = FxHashMap<V, usize>;

/// Maps solutions of a derived instance back to the original instance
pub trait Decoder<S> {
    /// Decoded solution type
    type Output;

    /// Decodes one solution
    ///
    /// # Errors
    /// Returns `IncompleteSolution` if `solution` lacks something the
    /// decoder needs
    fn decode(&self, solution: S) -> Result<Self::Output>;
}

/// The decoder of the trivial reduction
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<S> Decoder<S> for Identity {
    type Output = S;

    fn decode(&self, solution: S) -> Result<S> {
        Ok(solution)
    }
}

/// Two decoders run one after the other: `inner` first, then `outer`
#[derive(Debug, Clone)]
pub struct Composed<Outer, Inner> {
    outer: Outer,
    inner: Inner,
}

impl<Outer, Inner> Composed<Outer, Inner> {
    /// Chains `inner` (closer to the solver) with `outer`
    pub fn new(outer: Outer, inner: Inner) -> Self {
        Self { outer, inner }
    }
}

impl<S, Outer, Inner> Decoder<S> for Composed<Outer, Inner>
where
    Inner: Decoder<S>,
    Outer: Decoder<Inner::Output>,
{
    type Output = Outer::Output;

    fn decode(&self, solution: S) -> Result<Self::Output> {
        self.outer.decode(self.inner.decode(solution)?)
    }
}

/// An instance paired with the decoder for its solutions
#[derive(Debug, Clone)]
pub struct Reduction<I, D> {
    instance: I,
    decoder: D,
}

impl<I> Reduction<I, Identity> {
    /// Wraps an instance that is not reduced yet
    pub fn pure(instance: I) -> Self {
        Self {
            instance,
            decoder: Identity,
        }
    }
}

impl<I, D> Reduction<I, D> {
    /// Pairs an instance with its decoder
    pub fn new(instance: I, decoder: D) -> Self {
        Self { instance, decoder }
    }

    /// Returns the reduced instance
    pub fn instance(&self) -> &I {
        &self.instance
    }

    /// Returns the decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Splits into instance and decoder
    pub fn into_parts(self) -> (I, D) {
        (self.instance, self.decoder)
    }

    /// Reduces the instance further, chaining the decoders
    ///
    /// # Errors
    /// Propagates the error of `reduce`
    pub fn bind<J, Next, F>(self, reduce: F) -> Result<Reduction<J, Composed<D, Next>>>
    where
        F: FnOnce(I) -> Result<Reduction<J, Next>>,
    {
        let next = reduce(self.instance)?;
        Ok(Reduction {
            instance: next.instance,
            decoder: Composed::new(self.decoder, next.decoder),
        })
    }

    /// Solves the instance with `solver` and decodes each solution lazily
    ///
    /// # Errors
    /// Propagates the error of `solver`
    pub fn solve<S, M, F>(self, solver: F) -> Result<Solutions<M::IntoIter, D>>
    where
        F: FnOnce(I) -> Result<M>,
        M: IntoIterator<Item = Result<S>>,
        D: Decoder<S>,
    {
        let solutions = solver(self.instance)?;
        Ok(Solutions {
            solutions: solutions.into_iter(),
            decoder: self.decoder,
        })
    }
}

/// Lazily decoded solutions of a reduced instance
pub struct Solutions<M, D> {
    solutions: M,
    decoder: D,
}

impl<S, M, D> Iterator for Solutions<M, D>
where
    M: Iterator<Item = Result<S>>,
    D: Decoder<S>,
{
    type Item = Result<D::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        self.solutions
            .next()
            .map(|solution| solution.and_then(|s| self.decoder.decode(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcspError;

    struct Double;

    impl Decoder<i64> for Double {
        type Output = i64;

        fn decode(&self, solution: i64) -> Result<i64> {
            Ok(solution * 2)
        }
    }

    struct Describe;

    impl Decoder<i64> for Describe {
        type Output = String;

        fn decode(&self, solution: i64) -> Result<String> {
            if solution < 0 {
                return Err(PcspError::IncompleteSolution("negative".to_string()));
            }
            Ok(format!("#{}", solution))
        }
    }

    #[test]
    fn identity_reduction() -> Result<()> {
        let solutions = Reduction::pure(3)
            .solve(|n| Ok((0..n).map(Ok)))?
            .collect::<Result<Vec<i64>>>()?;
        assert_eq!(solutions, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn composition_decodes_in_reverse_order() -> Result<()> {
        let reduction = Reduction::new(10, Describe).bind(|n| Ok(Reduction::new(n + 1, Double)))?;
        assert_eq!(*reduction.instance(), 11);

        let composed = reduction
            .solve(|n| Ok(vec![Ok(n)]))?
            .collect::<Result<Vec<_>>>()?;

        // decoding twice by hand gives the same answer
        let (_, decoder) = Reduction::new(10, Describe)
            .bind(|n| Ok(Reduction::new(n + 1, Double)))?
            .into_parts();
        assert_eq!(composed, vec![decoder.decode(11)?]);
        assert_eq!(composed, vec!["#22".to_string()]);
        Ok(())
    }

    #[test]
    fn errors_are_per_solution() -> Result<()> {
        let results = Reduction::new((), Describe)
            .solve(|_| Ok(vec![Ok(1), Ok(-1), Ok(2)]))?
            .collect::<Vec<_>>();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PcspError::IncompleteSolution(_))));
        assert_eq!(results[2].as_deref().ok(), Some("#2"));
        Ok(())
    }

    #[test]
    fn no_solutions_is_not_an_error() -> Result<()> {
        let mut solutions = Reduction::pure(())
            .solve(|_| Ok(std::iter::empty::<Result<u8>>()))?;
        assert!(solutions.next().is_none());
        Ok(())
    }

    #[test]
    fn solutions_are_pulled_lazily() -> Result<()> {
        let mut pulled = 0;
        {
            let counter = &mut pulled;
            let mut solutions = Reduction::pure(()).solve(move |_| {
                Ok((0..).map(move |i: i64| {
                    *counter += 1;
                    Ok(i)
                }))
            })?;
            assert_eq!(solutions.next().transpose()?, Some(0));
        }
        assert_eq!(pulled, 1);
        Ok(())
    }
}
