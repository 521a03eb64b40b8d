//! Minor conditions
//!
//! A minor condition is a label cover instance whose variables are function
//! symbols, each ranging over the positions of its arguments. A constraint
//! `f -> g` with projection `π` reads `f(x_π(0), ..., x_π(n-1)) = g(x_0, ...)`.
//!
//! Conditions come from two places: identity text such as
//! `m(xyy) = m(yyx) = m(xxx)`, and loop conditions built from a structure.
//!
//! # Identity syntax
//!
//! Each line is one chain of equal terms. A term is a single ASCII letter
//! followed by a parenthesized list of variables; every alphanumeric
//! character inside the parentheses is one variable, and commas and
//! whitespace are ignored. Line `n` (counting from zero) introduces a fresh
//! symbol `i<n>` whose arguments are the distinct variables of the line in
//! order of first appearance, and every term of the line projects onto it.

pub mod conditions;

use rustc_hash::FxHashMap;

use crate::error::{PcspError, Result};
use crate::label_cover::LabelCover;
use crate::reduction::{csp_to_lc, LcVar};
use crate::structure::{Element, Structure};

/// A parsed term: function symbol, argument variables, and the column of its
/// closing parenthesis
struct Term {
    symbol: char,
    args: Vec<char>,
    column: usize,
}

#[derive(Clone, Copy)]
enum State {
    /// Expecting a function symbol
    Symbol,
    /// Seen a symbol, expecting `(`
    Open(char),
    /// Inside an argument list
    Args(char),
    /// After a complete term, expecting `=`
    Equals,
}

fn syntax_error(line: usize, column: usize, message: impl Into<String>) -> PcspError {
    PcspError::IdentitySyntax {
        line: line + 1,
        column,
        message: message.into(),
    }
}

fn parse_line(text: &str, line: usize) -> Result<Vec<Term>> {
    let mut terms = Vec::new();
    let mut state = State::Symbol;
    let mut args = Vec::new();
    let mut column = 0;

    for (i, c) in text.chars().enumerate() {
        column = i + 1;
        if c.is_whitespace() {
            continue;
        }
        state = match (state, c) {
            (State::Symbol, c) if c.is_ascii_alphabetic() => State::Open(c),
            (State::Open(f), '(') => State::Args(f),
            (State::Args(_), ',') => state,
            (State::Args(_), c) if c.is_ascii_alphanumeric() => {
                args.push(c);
                state
            }
            (State::Args(f), ')') => {
                if args.is_empty() {
                    return Err(syntax_error(line, column, format!("'{}' has no arguments", f)));
                }
                terms.push(Term {
                    symbol: f,
                    args: std::mem::take(&mut args),
                    column,
                });
                State::Equals
            }
            (State::Equals, '=') => State::Symbol,
            (State::Symbol, c) => {
                return Err(syntax_error(line, column, format!("expected a function symbol, found '{}'", c)))
            }
            (State::Open(_), c) => {
                return Err(syntax_error(line, column, format!("expected '(', found '{}'", c)))
            }
            (State::Args(_), c) => {
                return Err(syntax_error(line, column, format!("unexpected '{}' in arguments", c)))
            }
            (State::Equals, c) => {
                return Err(syntax_error(line, column, format!("expected '=', found '{}'", c)))
            }
        };
    }

    let end = column + 1;
    match state {
        State::Equals if terms.len() >= 2 => Ok(terms),
        State::Equals => Err(syntax_error(line, end, "a single term is not an identity")),
        State::Symbol if terms.is_empty() => Err(syntax_error(line, end, "empty identity")),
        State::Symbol => Err(syntax_error(line, end, "trailing '='")),
        State::Open(f) => Err(syntax_error(line, end, format!("expected '(' after '{}'", f))),
        State::Args(_) => Err(syntax_error(line, end, "unbalanced parenthesis")),
    }
}

/// Parses identities into a minor condition
///
/// Every function symbol must be used with one arity throughout.
///
/// # Errors
/// Returns `IdentitySyntax` for malformed text and `AmbiguousArity` for a
/// symbol used with two different numbers of arguments
pub fn parse_identities<S: AsRef<str>>(lines: &[S]) -> Result<LabelCover<String>> {
    let mut lc = LabelCover::new();
    let mut arities: FxHashMap<char, usize> = FxHashMap::default();

    for (n, text) in lines.iter().enumerate() {
        let terms = parse_line(text.as_ref(), n)?;

        for term in &terms {
            let arity = term.args.len();
            match arities.get(&term.symbol) {
                Some(&first) if first != arity => {
                    return Err(PcspError::AmbiguousArity {
                        symbol: term.symbol.to_string(),
                        line: n + 1,
                        column: term.column,
                        first,
                        second: arity,
                    })
                }
                Some(_) => {}
                None => {
                    arities.insert(term.symbol, arity);
                    lc.add_variable(term.symbol.to_string(), arity)?;
                }
            }
        }

        // distinct variables of the line, by first appearance
        let mut variables: Vec<char> = Vec::new();
        for term in &terms {
            for &x in &term.args {
                if !variables.contains(&x) {
                    variables.push(x);
                }
            }
        }

        let link = format!("i{}", n);
        lc.add_variable(link.clone(), variables.len())?;
        for term in &terms {
            let projection = term
                .args
                .iter()
                .enumerate()
                .filter_map(|(k, x)| variables.iter().position(|y| y == x).map(|j| (k, j)))
                .collect::<Vec<_>>();
            lc.add_constraint(term.symbol.to_string(), link.clone(), projection)?;
        }
    }

    log::debug!(
        "parsed {} identities into {} symbols and {} constraints",
        lines.len(),
        lc.num_variables(),
        lc.num_constraints()
    );
    Ok(lc)
}

/// The loop condition of `structure`, with symbols `s0, s1, ...` and vertex
/// symbol `i0`
///
/// # Errors
/// Returns `MalformedStructure` if the structure is malformed
pub fn loop_condition<E: Element>(structure: &Structure<E>) -> Result<LabelCover<String>> {
    let names = (0..structure.relations().len()).map(|i| format!("s{}", i));
    loop_condition_named(structure, names, "i0")
}

/// The loop condition of `structure` with chosen names
///
/// The vertex symbol has arity `|domain|`, and the `i`-th relation symbol
/// has arity `|R_i|`. For each coordinate `k` of `R_i` there is a
/// constraint from the relation symbol to the vertex symbol sending tuple
/// `j` to the position of its `k`-th element.
///
/// # Errors
/// Returns `MalformedStructure` if the structure is malformed, and
/// `MalformedInstance` if a name is used twice with different arities
pub fn loop_condition_named<E, I, N>(
    structure: &Structure<E>,
    names: I,
    vertex: &str,
) -> Result<LabelCover<String>>
where
    E: Element,
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    structure.check()?;
    let inverse = structure.domain_index();

    let mut lc = LabelCover::new();
    lc.add_variable(vertex.to_string(), structure.size())?;
    for (name, relation) in names.into_iter().zip(structure.relations()) {
        let name = name.into();
        lc.add_variable(name.clone(), relation.len())?;
        let arity = relation.first().map_or(0, |t| t.len());
        for k in 0..arity {
            let projection = relation
                .iter()
                .enumerate()
                .map(|(j, t)| (j, inverse[&t[k]]))
                .collect::<Vec<_>>();
            lc.add_constraint(name.clone(), vertex.to_string(), projection)?;
        }
    }
    Ok(lc)
}

/// The minor condition `Σ(A, B)`, the label cover form of `CSP(A, B)`
///
/// # Errors
/// Fails like [`csp_to_lc`]
pub fn sigma<E: Element, F: Element>(
    a: &Structure<E>,
    b: &Structure<F>,
) -> Result<LabelCover<LcVar<E>>> {
    Ok(csp_to_lc(a, b)?.into_parts().0)
}
