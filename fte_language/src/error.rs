use std::fmt;

/// The named error conditions the language engine can raise.
#[derive(Debug)]
pub enum Error {
    /// No DFA is registered under the requested language name.
    LanguageDoesntExist(String),
    /// The language accepts no words at all; it cannot carry a record.
    LanguageIsEmptySet,
    /// A configured value (e.g. too small a capacity) makes the language
    /// unusable as a carrier, or a caller passed out-of-domain input.
    InvalidInput(String),
    /// `rank` walked the DFA into the trap state, or ended outside an
    /// accept state.
    RankFailure,
    /// `unrank` was given an integer outside `[0, num_words)`.
    UnrankFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}
