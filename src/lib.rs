//! # pcsp-rs
//!
//! Tools for checking height 1 identities in polymorphism minions.
//!
//! The crate decides whether the polymorphisms from a template structure `A`
//! to a structure `B` satisfy a given minor condition. The condition is fused
//! with `A` into the *indicator structure*, a CSP instance whose homomorphisms
//! to `B` are exactly the families of polymorphisms satisfying the identities.
//! CSP instances are solved by reducing them to label cover and then to SAT,
//! with every reduction carrying a decoder that maps solutions back.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pcsp_rs::identities::parse_identities;
//! use pcsp_rs::indicator::check_minor_condition;
//! use pcsp_rs::structure::library::{nae, onein};
//! use pcsp_rs::solver::{CspSolver, Options};
//!
//! // 1-in-3 vs NAE has a Pixley polymorphism
//! let pixley = parse_identities(&["p(xxy) = p(yxx) = p(yxy) = p(yyy)"])?;
//! let solver = CspSolver::new(Options::default());
//! let witness = check_minor_condition(&onein(3), &nae(2, 3), &pixley, &solver)?;
//! assert!(witness.is_some());
//! ```

#![warn(missing_docs)]
#![warn(rust_2024_compatibility)]

/// Relational structures and their algebra
pub mod structure;

/// Label cover instances
pub mod label_cover;

/// Union-find over arbitrary hashable domains
pub mod union_find;

/// Reachability covers of directed graphs
pub mod cover;

/// CNF formulas
pub mod cnf;

/// Reductions between CSP, label cover, and SAT
pub mod reduction;

/// SAT solver boundary and model enumeration
pub mod engine;

/// CSP solver built on the reduction chain
pub mod solver;

/// Minor conditions: textual identities and loop conditions
pub mod identities;

/// Indicator structures and minor condition checking
pub mod indicator;

/// Error types
pub mod error {
    //! Error types for pcsp-rs

    use thiserror::Error;

    /// Errors raised while building or decoding instances
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum PcspError {
        /// Relation with mixed arities or elements outside the domain
        #[error("malformed structure: {0}")]
        MalformedStructure(String),

        /// Lookup of an element that was never registered
        #[error("unknown element: {0}")]
        UnknownElement(String),

        /// Identity text could not be parsed
        #[error("syntax error at {line}:{column}: {message}")]
        IdentitySyntax {
            /// Line of the identity (1-based)
            line: usize,
            /// Column of the offending character (1-based)
            column: usize,
            /// What went wrong
            message: String,
        },

        /// A function symbol used with two different numbers of arguments
        #[error("'{symbol}' has ambiguous arity ({first} and {second}) at {line}:{column}")]
        AmbiguousArity {
            /// The offending symbol
            symbol: String,
            /// Line of the second use (1-based)
            line: usize,
            /// Column of the closing parenthesis of the second use (1-based)
            column: usize,
            /// Arity seen first
            first: usize,
            /// Conflicting arity
            second: usize,
        },

        /// Label cover constraint that does not fit its declared variables
        #[error("malformed label cover instance: {0}")]
        MalformedInstance(String),

        /// Solution handed to a decoder is missing a variable
        #[error("incomplete solution: {0}")]
        IncompleteSolution(String),

        /// Encoding exceeds what the SAT backend can represent
        #[error("capacity exceeded: {0}")]
        CapacityExceeded(String),

        /// Invalid argument
        #[error("invalid argument: {0}")]
        InvalidArgument(String),

        /// The SAT backend failed or gave up before answering
        #[error("SAT backend error: {0}")]
        Backend(String),
    }

    /// Result type for pcsp-rs operations
    pub type Result<T> = std::result::Result<T, PcspError>;
}

// Re-export commonly used types
pub use error::{PcspError, Result};
pub use label_cover::LabelCover;
pub use structure::Structure;
