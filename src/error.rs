//! Error types shared by every component of the kernel.
//!
//! Each failure class has its own type so callers can match on exactly what
//! went wrong; [`Error`] folds them together for code that just wants `?`.

use thiserror::Error;

/// A closed range was given with its bounds the wrong way round.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("range [{lo} {hi}] has lower bound above upper bound")]
pub struct OrderError {
    pub lo: i64,
    pub hi: i64,
}

/// Malformed text in either micro-language, or a zero surface identifier.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// `(` without a matching `)`.
    #[error("unclosed '(' at token {position}")]
    UnclosedGroup { position: usize },

    /// `)` without a matching `(`.
    #[error("unexpected ')' at token {position}")]
    UnexpectedClose { position: usize },

    /// A repeat, interval or log token without the numeric literal it needs.
    #[error("'{token}' at item {index} needs a numeric literal {side} it")]
    MissingNeighbour {
        token: String,
        index: usize,
        side: &'static str,
    },

    /// A repeat/interval/log/jump count below zero.
    #[error("negative count in '{token}'")]
    NegativeCount { token: String },

    /// Log interpolation between values that are zero or of differing sign.
    #[error("cannot log-interpolate between {from} and {to}")]
    LogDomain { from: String, to: String },

    /// A modifier letter with nothing before it to attach to.
    #[error("modifier '{tag}' at item {index} has nothing to attach to")]
    DanglingModifier { tag: char, index: usize },

    /// A token that fits no form of the grammar.
    #[error("unrecognised token '{token}' at {position}")]
    InvalidToken { token: String, position: usize },

    /// Surface identifiers are signed and never zero.
    #[error("surface identifier must be non-zero")]
    ZeroSurface,

    /// The sign resolver rejected a leaf token.
    #[error("cannot resolve surface token '{token}' at {position}")]
    UnresolvedLeaf { token: String, position: usize },

    /// The complement marker must be followed by a parenthesised group.
    #[error("'#' at token {position} must be followed by '('")]
    BareComplement { position: usize },

    /// A union operator with no operand on one side.
    #[error("union at token {position} is missing an operand")]
    EmptyOperand { position: usize },

    /// A compact list whose expansion would exceed the entry limit.
    #[error("list expands to {len} entries, limit is {limit}")]
    TooLong { len: u64, limit: usize },
}

/// A leaf references a surface the caller did not supply.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("surface {surface} has no bound primitive")]
pub struct BindingError {
    pub surface: u32,
}

/// An index outside the valid range of a container.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("index {index} out of range for length {len}")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Any error the kernel can report.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type Result<T> = std::result::Result<T, Error>;
