//! Type symbols, their codes, and the combination law.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AlgebraError, AlgebraResult};

/// A 4-bit type code in `0..=15`.
pub type TypeCode = u8;

/// One of the sixteen socionics types in three-letter notation.
///
/// The discriminant of each variant is its [`TypeCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum TypeSymbol {
    Ile = 0,
    Lie = 1,
    Iee = 2,
    Eie = 3,
    Sle = 4,
    Lse = 5,
    See = 6,
    Ese = 7,
    Ili = 8,
    Lii = 9,
    Iei = 10,
    Eii = 11,
    Sli = 12,
    Lsi = 13,
    Sei = 14,
    Esi = 15,
}

impl TypeSymbol {
    /// All sixteen types in code order.
    pub const ALL: [TypeSymbol; 16] = [
        TypeSymbol::Ile,
        TypeSymbol::Lie,
        TypeSymbol::Iee,
        TypeSymbol::Eie,
        TypeSymbol::Sle,
        TypeSymbol::Lse,
        TypeSymbol::See,
        TypeSymbol::Ese,
        TypeSymbol::Ili,
        TypeSymbol::Lii,
        TypeSymbol::Iei,
        TypeSymbol::Eii,
        TypeSymbol::Sli,
        TypeSymbol::Lsi,
        TypeSymbol::Sei,
        TypeSymbol::Esi,
    ];

    /// The identity of the combination law.
    pub const IDENTITY: TypeSymbol = TypeSymbol::Ile;

    /// The type's code.
    pub const fn code(self) -> TypeCode {
        self as u8
    }

    /// Decode a code back into its type.
    pub fn from_code(code: TypeCode) -> AlgebraResult<Self> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(AlgebraError::InvalidCode(code))
    }

    /// The three-letter mnemonic.
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeSymbol::Ile => "ILE",
            TypeSymbol::Lie => "LIE",
            TypeSymbol::Iee => "IEE",
            TypeSymbol::Eie => "EIE",
            TypeSymbol::Sle => "SLE",
            TypeSymbol::Lse => "LSE",
            TypeSymbol::See => "SEE",
            TypeSymbol::Ese => "ESE",
            TypeSymbol::Ili => "ILI",
            TypeSymbol::Lii => "LII",
            TypeSymbol::Iei => "IEI",
            TypeSymbol::Eii => "EII",
            TypeSymbol::Sli => "SLI",
            TypeSymbol::Lsi => "LSI",
            TypeSymbol::Sei => "SEI",
            TypeSymbol::Esi => "ESI",
        }
    }

    pub const fn is_introverted(self) -> bool {
        self.code() & 0b1000 != 0
    }

    pub const fn is_sensing(self) -> bool {
        self.code() & 0b0100 != 0
    }

    pub const fn is_ethical(self) -> bool {
        self.code() & 0b0010 != 0
    }

    pub const fn is_rational(self) -> bool {
        self.code() & 0b0001 != 0
    }

    /// The intertype relationship this type stands for when it is the
    /// integral type of a pair.
    pub fn relationship(self) -> Relationship {
        Relationship::ALL[usize::from(self.code())]
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeSymbol {
    type Err = AlgebraError;

    /// Parse a mnemonic, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|symbol| symbol.as_str() == upper)
            .ok_or_else(|| AlgebraError::UnknownType(s.trim().to_string()))
    }
}

/// Intertype relationship named by the integral type of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Identity,
    QuasiIdentity,
    Kindred,
    ReverseBenefit,
    Business,
    DirectBenefit,
    SuperEgo,
    Activation,
    Extinguishment,
    Mirror,
    Mirage,
    DirectSupervision,
    SemiDuality,
    ReverseSupervision,
    Duality,
    Conflict,
}

impl Relationship {
    /// Relationships indexed by type code.
    pub const ALL: [Relationship; 16] = [
        Relationship::Identity,
        Relationship::QuasiIdentity,
        Relationship::Kindred,
        Relationship::ReverseBenefit,
        Relationship::Business,
        Relationship::DirectBenefit,
        Relationship::SuperEgo,
        Relationship::Activation,
        Relationship::Extinguishment,
        Relationship::Mirror,
        Relationship::Mirage,
        Relationship::DirectSupervision,
        Relationship::SemiDuality,
        Relationship::ReverseSupervision,
        Relationship::Duality,
        Relationship::Conflict,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Relationship::Identity => "identity",
            Relationship::QuasiIdentity => "quasi-identity",
            Relationship::Kindred => "kindred",
            Relationship::ReverseBenefit => "reverse benefit",
            Relationship::Business => "business",
            Relationship::DirectBenefit => "direct benefit",
            Relationship::SuperEgo => "super-ego",
            Relationship::Activation => "activation",
            Relationship::Extinguishment => "extinguishment",
            Relationship::Mirror => "mirror",
            Relationship::Mirage => "mirage",
            Relationship::DirectSupervision => "direct supervision",
            Relationship::SemiDuality => "semi-duality",
            Relationship::ReverseSupervision => "reverse supervision",
            Relationship::Duality => "duality",
            Relationship::Conflict => "conflict",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode a type as its code.
pub fn encode(symbol: TypeSymbol) -> TypeCode {
    symbol.code()
}

/// Decode a code as a type. Fails for codes above 15.
pub fn decode(code: TypeCode) -> AlgebraResult<TypeSymbol> {
    TypeSymbol::from_code(code)
}

/// XOR-fold raw codes starting from 0.
pub fn combine_codes(codes: impl IntoIterator<Item = TypeCode>) -> TypeCode {
    codes.into_iter().fold(0, |acc, code| acc ^ code)
}

/// Compute the integral type of a list of types.
///
/// The empty list combines to [`TypeSymbol::IDENTITY`].
pub fn combine(symbols: &[TypeSymbol]) -> TypeSymbol {
    let code = combine_codes(symbols.iter().map(|s| s.code()));
    // XOR of 4-bit codes never leaves 0..=15
    TypeSymbol::ALL[usize::from(code & 0x0f)]
}
