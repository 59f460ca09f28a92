use thiserror::Error;

/// Everything that can go wrong while registering functions or evaluating
/// an expression. Errors are returned straight to the caller; no stage
/// retries or returns a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    #[error("invalid number '{literal}' at position {position}")]
    InvalidNumberFormat { literal: String, position: usize },

    #[error("invalid token '{token}' at position {position}")]
    InvalidToken { token: char, position: usize },

    #[error("misplaced parenthesis: {0}")]
    MisplacedParenthesis(String),

    #[error("'{name}' expects {expected} operand(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid function name '{0}': only letters and underscores are allowed")]
    InvalidFunctionName(String),

    #[error("function name '{0}' collides with an operator")]
    OperatorCollision(String),

    #[error("function '{0}' is already registered")]
    DuplicateFunction(String),

    #[error("no function named '{0}'")]
    UnknownFunction(String),
}

impl Error {
    pub(crate) fn arity(name: impl Into<String>, expected: impl ToString, found: usize) -> Self {
        Error::ArityMismatch {
            name: name.into(),
            expected: expected.to_string(),
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
