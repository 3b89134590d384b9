//! Error types for the type algebra.

use thiserror::Error;

/// Errors produced while decoding codes or parsing user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// A code outside `0..=15` was decoded.
    #[error("Invalid type code: {0}")]
    InvalidCode(u8),

    /// A token is not one of the sixteen type mnemonics.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The input contained no types at all.
    #[error("No types provided")]
    Empty,

    /// More types were provided than the configured maximum allows.
    #[error("Too many types: {count} provided, at most {max} allowed")]
    TooMany {
        /// Number of types in the input.
        count: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Result type for algebra operations.
pub type AlgebraResult<T> = std::result::Result<T, AlgebraError>;
