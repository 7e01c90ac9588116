use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeelError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    #[error("type error: {0}")]
    Type(String),
}
