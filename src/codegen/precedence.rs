//! Operator precedence
//!
//! A closed ordinal ranking of Solidity operator tiers. Lower binds tighter:
//! literals and calls are `Atomic`, logical-or is the loosest binary tier,
//! and `None` is what statement positions request (never parenthesize).

use serde::{Deserialize, Serialize};

/// Operator rank; the discriminant is the ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Precedence {
    /// Literals, identifiers, calls, member access
    Atomic = 0,
    /// `!x`, `-x`
    Unary = 1,
    /// `**`
    Exponent = 2,
    /// `*`, `/`, `%`
    Multiplicative = 3,
    /// `+`, `-`
    Additive = 4,
    /// `<`, `<=`, `>`, `>=`
    Relational = 5,
    /// `==`, `!=`
    Equality = 6,
    /// `&&`
    LogicalAnd = 7,
    /// `||`
    LogicalOr = 8,
    /// `c ? a : b`
    Conditional = 9,
    /// `=`, `+=`
    Assignment = 10,
    /// No operator context
    None = 99,
}

impl Precedence {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The next tier that binds more tightly.
    ///
    /// Requesting this for an operand makes a same-tier operand parenthesized,
    /// which is what the non-associative side of a binary operator needs.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Atomic | Precedence::Unary => Precedence::Atomic,
            Precedence::Exponent => Precedence::Unary,
            Precedence::Multiplicative => Precedence::Exponent,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Relational => Precedence::Additive,
            Precedence::Equality => Precedence::Relational,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::Conditional => Precedence::LogicalOr,
            Precedence::Assignment => Precedence::Conditional,
            Precedence::None => Precedence::Assignment,
        }
    }

    /// Whether an operand of rank `self` must be wrapped where `min` is required
    pub fn needs_parens(self, min: Precedence) -> bool {
        self > min
    }
}

/// Operand position within a binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Minimum precedence an operand of a binary operator must meet.
///
/// Left-associative tiers accept a same-tier left operand as is; the right
/// operand must bind tighter. Exponentiation is right-associative and mirrors
/// this.
pub fn operand_min(op: Precedence, side: Side) -> Precedence {
    let right_assoc = op == Precedence::Exponent;
    match (side, right_assoc) {
        (Side::Left, false) | (Side::Right, true) => op,
        _ => op.tighter(),
    }
}

/// Wrap `code` in parentheses when its rank is looser than `min`.
///
/// This is the single place parenthesization happens; every value resolution
/// goes through it.
pub fn wrap(code: String, own: Precedence, min: Precedence) -> String {
    if !code.is_empty() && own.needs_parens(min) {
        format!("({})", code)
    } else {
        code
    }
}
