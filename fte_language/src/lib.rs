//! The DFA-defined regular language engine: suffix-count tables, rank and
//! unrank, and the process-wide language registry.
//!
//! See spec.md §3 and §4.2/§4.4 for the data model and algorithms this
//! module implements.

pub mod dfa;
mod error;
mod language;
pub mod registry;

pub use dfa::{
    DfaSource,
    TransitionTable,
};
pub use error::Error;
pub use language::{
    Language,
    LanguageSpec,
};
pub use registry::Registry;
