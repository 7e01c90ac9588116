//! A FEEL (Friendly Enough Expression Language) subset (§4.15): lexer,
//! parser, and two evaluators — a full expression evaluator for literal
//! expressions and DMN output entries, and a restricted unary-test
//! evaluator for DMN input entries.

#![deny(unsafe_code)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod unary_test;
pub mod value;

pub use ast::{BinaryOp, Expr};
pub use error::FeelError;
pub use eval::{evaluate, Bindings};
pub use lexer::{tokenize, Token};
pub use parser::parse;
pub use unary_test::{matches, parse_unary_tests, CompareOp, UnaryTest};
pub use value::FeelValue;
