//! Operator precedence table for the expression parser
//!
//! Higher binds tighter. The climbing loop consumes an operator only while
//! its precedence is strictly greater than the current threshold; a
//! right-associative operator parses its right operand with its own
//! precedence minus one so that equal-precedence chains nest rightward.

use crate::ast::BinaryOperator;
use crate::lexer::{Keyword, Punctuator, TokenKind};

use self::Associativity::{Left, Right};
use self::InfixOperator as I;
use crate::ast::BinaryOperator as B;

/// `,`
pub const COMMA: u8 = 1;
/// `=`, compound assignment and `?:`
pub const ASSIGNMENT: u8 = 2;
/// `||`
pub const LOGICAL_OR: u8 = 3;
/// `&&`
pub const LOGICAL_AND: u8 = 4;
/// `|`
pub const BITWISE_OR: u8 = 5;
/// `^`
pub const BITWISE_XOR: u8 = 6;
/// `&`
pub const BITWISE_AND: u8 = 7;
/// `==`, `!=`, `===`, `!==`
pub const EQUALITY: u8 = 8;
/// `<`, `<=`, `>`, `>=`, `in`
pub const RELATIONAL: u8 = 9;
/// `<<`, `>>`, `>>>`
pub const SHIFT: u8 = 10;
/// `+`, `-`
pub const ADDITIVE: u8 = 11;
/// `*`, `/`, `%`
pub const MULTIPLICATIVE: u8 = 12;
/// `**`
pub const EXPONENT: u8 = 13;
/// Operand threshold of prefix unary operators
pub const UNARY: u8 = 14;
/// Postfix `++` / `--`
pub const POSTFIX: u8 = 15;
/// `.`, `?.`, `[]`, call
pub const MEMBER: u8 = 16;

/// How equal-precedence operators group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ** b ** c` is `a ** (b ** c)`
    Right,
}

/// What an infix-position token does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    /// Ordinary binary operator
    Binary(BinaryOperator),
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `=`
    Assign,
    /// `op=`
    CompoundAssign(BinaryOperator),
    /// `? :`
    Conditional,
    /// `,`
    Comma,
    /// Postfix `++` / `--`; the flag is true for increment
    Postfix(bool),
    /// `.`, `?.`, `[` or `(`
    Access,
}

/// Precedence entry for an infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// What the operator does
    pub operator: InfixOperator,
    /// Binding strength
    pub precedence: u8,
    /// Grouping of equal-precedence chains
    pub associativity: Associativity,
}

impl OperatorInfo {
    /// Threshold for parsing the right operand
    pub fn right_operand_threshold(&self) -> u8 {
        match self.associativity {
            Associativity::Left => self.precedence,
            Associativity::Right => self.precedence - 1,
        }
    }
}

static INFIX_TABLE: &[(Punctuator, InfixOperator, u8, Associativity)] = &[
    (Punctuator::Comma, I::Comma, COMMA, Left),
    (Punctuator::Assign, I::Assign, ASSIGNMENT, Right),
    (Punctuator::PlusEq, I::CompoundAssign(B::Add), ASSIGNMENT, Right),
    (Punctuator::MinusEq, I::CompoundAssign(B::Sub), ASSIGNMENT, Right),
    (Punctuator::StarEq, I::CompoundAssign(B::Mul), ASSIGNMENT, Right),
    (Punctuator::SlashEq, I::CompoundAssign(B::Div), ASSIGNMENT, Right),
    (Punctuator::PercentEq, I::CompoundAssign(B::Mod), ASSIGNMENT, Right),
    (Punctuator::StarStarEq, I::CompoundAssign(B::Exp), ASSIGNMENT, Right),
    (Punctuator::AndEq, I::CompoundAssign(B::BitwiseAnd), ASSIGNMENT, Right),
    (Punctuator::OrEq, I::CompoundAssign(B::BitwiseOr), ASSIGNMENT, Right),
    (Punctuator::XorEq, I::CompoundAssign(B::BitwiseXor), ASSIGNMENT, Right),
    (Punctuator::LtLtEq, I::CompoundAssign(B::LeftShift), ASSIGNMENT, Right),
    (Punctuator::GtGtEq, I::CompoundAssign(B::RightShift), ASSIGNMENT, Right),
    (Punctuator::GtGtGtEq, I::CompoundAssign(B::UnsignedRightShift), ASSIGNMENT, Right),
    (Punctuator::Question, I::Conditional, ASSIGNMENT, Right),
    (Punctuator::OrOr, I::LogicalOr, LOGICAL_OR, Left),
    (Punctuator::AndAnd, I::LogicalAnd, LOGICAL_AND, Left),
    (Punctuator::Or, I::Binary(B::BitwiseOr), BITWISE_OR, Left),
    (Punctuator::Xor, I::Binary(B::BitwiseXor), BITWISE_XOR, Left),
    (Punctuator::And, I::Binary(B::BitwiseAnd), BITWISE_AND, Left),
    (Punctuator::EqEq, I::Binary(B::Eq), EQUALITY, Left),
    (Punctuator::NotEq, I::Binary(B::NotEq), EQUALITY, Left),
    (Punctuator::EqEqEq, I::Binary(B::StrictEq), EQUALITY, Left),
    (Punctuator::NotEqEq, I::Binary(B::StrictNotEq), EQUALITY, Left),
    (Punctuator::Lt, I::Binary(B::Lt), RELATIONAL, Left),
    (Punctuator::LtEq, I::Binary(B::LtEq), RELATIONAL, Left),
    (Punctuator::Gt, I::Binary(B::Gt), RELATIONAL, Left),
    (Punctuator::GtEq, I::Binary(B::GtEq), RELATIONAL, Left),
    (Punctuator::LtLt, I::Binary(B::LeftShift), SHIFT, Left),
    (Punctuator::GtGt, I::Binary(B::RightShift), SHIFT, Left),
    (Punctuator::GtGtGt, I::Binary(B::UnsignedRightShift), SHIFT, Left),
    (Punctuator::Plus, I::Binary(B::Add), ADDITIVE, Left),
    (Punctuator::Minus, I::Binary(B::Sub), ADDITIVE, Left),
    (Punctuator::Star, I::Binary(B::Mul), MULTIPLICATIVE, Left),
    (Punctuator::Slash, I::Binary(B::Div), MULTIPLICATIVE, Left),
    (Punctuator::Percent, I::Binary(B::Mod), MULTIPLICATIVE, Left),
    (Punctuator::StarStar, I::Binary(B::Exp), EXPONENT, Right),
    (Punctuator::PlusPlus, I::Postfix(true), POSTFIX, Left),
    (Punctuator::MinusMinus, I::Postfix(false), POSTFIX, Left),
    (Punctuator::Dot, I::Access, MEMBER, Left),
    (Punctuator::OptionalChain, I::Access, MEMBER, Left),
    (Punctuator::LBracket, I::Access, MEMBER, Left),
    (Punctuator::LParen, I::Access, MEMBER, Left),
];

/// Look up a token read under the infix grammar. Returns `None` when the
/// token cannot continue an expression.
pub fn infix_operator(kind: &TokenKind) -> Option<OperatorInfo> {
    match kind {
        TokenKind::Keyword(Keyword::In) => Some(OperatorInfo {
            operator: InfixOperator::Binary(BinaryOperator::In),
            precedence: RELATIONAL,
            associativity: Left,
        }),
        TokenKind::Punctuator(p) => INFIX_TABLE
            .iter()
            .find(|(punctuator, ..)| punctuator == p)
            .map(|&(_, operator, precedence, associativity)| OperatorInfo {
                operator,
                precedence,
                associativity,
            }),
        _ => None,
    }
}
