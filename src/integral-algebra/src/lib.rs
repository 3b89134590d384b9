//! Integral type algebra for the Integral bot.
//!
//! Sixteen socionics types are encoded as 4-bit codes, one bit per
//! dichotomy:
//!
//! | bit | 0            | 1            |
//! |-----|--------------|--------------|
//! | 3   | extroversion | introversion |
//! | 2   | intuition    | sensing      |
//! | 1   | logic        | ethics       |
//! | 0   | irrational   | rational     |
//!
//! The integral type of a group is the XOR of its members' codes. XOR is
//! associative and commutative with `ILE` (code 0) as identity, so the
//! order of the input never matters and every type is its own inverse.
//!
//! # Example
//!
//! ```rust
//! use integral_algebra::{TypeSymbol, combine, parse_types};
//!
//! let types = parse_types("lsi eie lie", 10)?;
//! assert_eq!(combine(&types), TypeSymbol::Esi);
//! # Ok::<(), integral_algebra::AlgebraError>(())
//! ```

mod error;
mod input;
mod subset;
mod types;

pub use error::{AlgebraError, AlgebraResult};
pub use input::{MAX_TYPES_LIMIT, parse_types};
pub use subset::{MAX_ENUMERATED, Subset, enumerate, format_subsets};
pub use types::{Relationship, TypeCode, TypeSymbol, combine, combine_codes, decode, encode};
