//! Parsing of user-supplied type lists.

use crate::error::{AlgebraError, AlgebraResult};
use crate::types::TypeSymbol;

/// Hard ceiling on the configurable maximum, since enumeration is
/// exponential in the number of types.
pub const MAX_TYPES_LIMIT: usize = 20;

/// Parse a whitespace-separated list of types such as `"LSI ile SEE"`.
///
/// Accepts between one and `max` types, ignoring case.
pub fn parse_types(input: &str, max: usize) -> AlgebraResult<Vec<TypeSymbol>> {
    let tokens: Vec<&str> = input.split_whitespace().collect();

    if tokens.is_empty() {
        return Err(AlgebraError::Empty);
    }
    if tokens.len() > max {
        return Err(AlgebraError::TooMany {
            count: tokens.len(),
            max,
        });
    }

    tokens.into_iter().map(str::parse).collect()
}
