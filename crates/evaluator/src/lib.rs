//! The `Evaluator` abstraction and its built-in implementations (§4.5):
//! static, JSON-rule, and the trait any custom or DMN-backed evaluator
//! implements directly.

#![deny(unsafe_code)]

pub mod evaluation;
pub mod json_rule;
pub mod static_eval;
pub mod traits;

pub use evaluation::Evaluation;
pub use json_rule::JsonRuleEvaluator;
pub use static_eval::StaticEvaluator;
pub use traits::{Evaluator, EvaluatorOutcome};
