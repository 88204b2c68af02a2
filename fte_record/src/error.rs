use std::fmt;

/// The discriminant carried by `DecodeFailure`, per spec.md §6/§7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeReason {
    /// The first `N` bytes did not rank to a valid word.
    Rank,
    /// The decrypted header did not round-trip to exactly 16 bytes, or its
    /// declared tail length exceeds the configured `max_cell_size`.
    Header,
    /// The buffer was too short to contain the declared AE tail.
    AeBytes,
}

impl fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rank => "rank",
            Self::Header => "header",
            Self::AeBytes => "ae bytes",
        };
        f.write_str(s)
    }
}

/// Errors the record codec can raise.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied argument is out of the domain this codec accepts.
    InvalidInput(String),
    /// Decode could not recover a record; carries a discriminant reason
    /// where one is known, or `None` for the initial too-short-buffer check.
    DecodeFailure(Option<DecodeReason>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<fte_language::Error> for Error {
    fn from(from: fte_language::Error) -> Self {
        match from {
            fte_language::Error::RankFailure => Error::DecodeFailure(Some(DecodeReason::Rank)),
            fte_language::Error::UnrankFailure => {
                Error::InvalidInput("payload integer outside [0, num_words)".into())
            },
            other => Error::InvalidInput(other.to_string()),
        }
    }
}
