//! The `Evaluator` abstraction (§4.5): anything that, given a context,
//! produces zero-or-one [`Evaluation`]. Polymorphism here is over this one
//! narrow interface — no inheritance hierarchy — so static, JSON-rule, DMN,
//! and host-supplied custom evaluators are all interchangeable list
//! elements in an `Agent`.

use crate::evaluation::Evaluation;
use chrono::{DateTime, Utc};
use condition::{Descriptor, EnrichmentClient};
use decision_core::Context;

/// The result of invoking one [`Evaluator`]: its verdict (if any), the
/// condition-descriptor trail for explainability, and the effective
/// context after any enrichment overlays it applied.
#[derive(Debug, Clone)]
pub struct EvaluatorOutcome {
    pub evaluation: Option<Evaluation>,
    /// Descriptors for the condition(s) that matched, if any.
    pub because: Vec<Descriptor>,
    /// Descriptors for conditions attempted but not matched (rules scanned
    /// before the winning one, or all rules if none matched).
    pub failed: Vec<Descriptor>,
    pub effective_context: Context,
}

impl EvaluatorOutcome {
    pub fn empty(ctx: Context) -> Self {
        Self { evaluation: None, because: Vec::new(), failed: Vec::new(), effective_context: ctx }
    }
}

/// A named, content-hashed, re-entrant producer of [`Evaluation`]s. A
/// `Custom` evaluator (§4.5) is simply any host type implementing this
/// trait directly; there is no separate marker type. Implementers must be
/// pure with respect to their inputs (context + their own immutable
/// configuration) for replay to hold — no wall-clock reads beyond the `now`
/// parameter, no RNG, no mutable shared state across calls.
pub trait Evaluator: Send + Sync {
    /// A stable name identifying this evaluator across runs; participates
    /// in `evaluator_signatures` in the audit record.
    fn name(&self) -> &str;

    /// Content hash of this evaluator's source (canonical ruleset hash for
    /// JSON/DMN evaluators; a declared version string for custom ones).
    fn content_hash(&self) -> &str;

    /// Evaluate `ctx` and return zero-or-one verdict plus explainability.
    /// `now` pins the wall-clock reference for any temporal operators so
    /// replay can supply the original instant.
    fn evaluate(
        &self,
        ctx: &Context,
        now: DateTime<Utc>,
        client: Option<&dyn EnrichmentClient>,
    ) -> EvaluatorOutcome;
}
