//! The static evaluator (§4.5): returns a fixed verdict regardless of
//! context. Useful as a test double or a default/fallback policy.

use crate::evaluation::Evaluation;
use crate::traits::{Evaluator, EvaluatorOutcome};
use chrono::{DateTime, Utc};
use condition::EnrichmentClient;
use decision_core::{content_hash, Context};

pub struct StaticEvaluator {
    name: String,
    content_hash: String,
    evaluation: Evaluation,
}

impl StaticEvaluator {
    pub fn new(name: impl Into<String>, evaluation: Evaluation) -> Self {
        let name = name.into();
        let hash = content_hash(&evaluation).unwrap_or_default();
        Self { name, content_hash: hash, evaluation }
    }
}

impl Evaluator for StaticEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn evaluate(
        &self,
        ctx: &Context,
        _now: DateTime<Utc>,
        _client: Option<&dyn EnrichmentClient>,
    ) -> EvaluatorOutcome {
        EvaluatorOutcome {
            evaluation: Some(self.evaluation.clone()),
            because: Vec::new(),
            failed: Vec::new(),
            effective_context: ctx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn always_returns_the_same_evaluation() {
        let eval = Evaluation::new("approve", 0.5, "default policy", "fallback");
        let ev = StaticEvaluator::new("fallback", eval.clone());
        let ctx = Context::new(json!({})).unwrap();
        let outcome = ev.evaluate(&ctx, Utc::now(), None);
        assert_eq!(outcome.evaluation, Some(eval));
    }
}
