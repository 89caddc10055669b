use std::io;

use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum HuffmanError {
    #[display(fmt = "failed to read input: {}", _0)]
    InputUnreadable(#[error(source)] io::Error),

    #[display(fmt = "failed to write output: {}", _0)]
    OutputUnwritable(#[error(source)] io::Error),

    #[display(fmt = "symbol {:?} has no code in the code table", symbol)]
    UnknownSymbol { symbol: char },

    #[display(
        fmt = "compressed stream ended in the middle of a code after {} bits",
        bits_consumed
    )]
    TruncatedStream { bits_consumed: usize },

    #[display(
        fmt = "code tree and compressed stream disagree about emptiness ({} bits present)",
        bits_present
    )]
    InconsistentEmptyState { bits_present: usize },

    #[display(fmt = "malformed compressed header: {}", _0)]
    MalformedHeader(#[error(source)] serde_json::Error),

    #[display(
        fmt = "header declares {} bits but its frequencies encode to a different length",
        declared
    )]
    BitCountMismatch { declared: u64 },

    #[display(fmt = "decoded symbols do not match the frequencies in the header")]
    FrequencyMismatch,
}

/// Why a set of counts cannot be a frequency table.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum FrequencyTableError {
    #[display(fmt = "symbol {:?} has a count of zero", symbol)]
    ZeroCount { symbol: char },

    #[display(fmt = "symbol counts add up to more than {}", u64::MAX)]
    TotalOverflow,
}
