//! The `Agent` orchestrator (§4.7): the 7-step `decide()` pipeline.

use crate::decision::Decision;
use crate::error::AgentError;
use crate::scoring::ScoringStrategy;
use audit::{AuditRecordBuilder, AuditSink, EvaluatorSignature, NullSink};
use chrono::{DateTime, Utc};
use condition::{Descriptor, EnrichmentClient};
use decision_core::{combine_hashes, content_hash, Context};
use evaluator::Evaluator;
use std::sync::Arc;

/// Holds an ordered list of evaluators, a scoring strategy, an optional
/// audit sink, and a validation flag. Holds no per-call mutable state, so
/// it is `Send + Sync` and safe to share across concurrent callers as long
/// as every evaluator is itself re-entrant.
pub struct Agent {
    evaluators: Vec<Arc<dyn Evaluator>>,
    scoring: Arc<dyn ScoringStrategy>,
    sink: Arc<dyn AuditSink>,
    strict: bool,
    validate_evaluations: bool,
    enrichment_client: Option<Arc<dyn EnrichmentClient>>,
    ruleset_hash: String,
}

pub struct AgentBuilder {
    evaluators: Vec<Arc<dyn Evaluator>>,
    scoring: Arc<dyn ScoringStrategy>,
    sink: Arc<dyn AuditSink>,
    strict: bool,
    validate_evaluations: bool,
    enrichment_client: Option<Arc<dyn EnrichmentClient>>,
}

impl AgentBuilder {
    pub fn new(scoring: Arc<dyn ScoringStrategy>) -> Self {
        Self {
            evaluators: Vec::new(),
            scoring,
            sink: Arc::new(NullSink),
            strict: false,
            validate_evaluations: false,
            enrichment_client: None,
        }
    }

    pub fn evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn validate_evaluations(mut self, validate: bool) -> Self {
        self.validate_evaluations = validate;
        self
    }

    pub fn enrichment_client(mut self, client: Arc<dyn EnrichmentClient>) -> Self {
        self.enrichment_client = Some(client);
        self
    }

    pub fn build(self) -> Agent {
        let ruleset_hash = combine_hashes(self.evaluators.iter().map(|e| e.content_hash()));
        Agent {
            evaluators: self.evaluators,
            scoring: self.scoring,
            sink: self.sink,
            strict: self.strict,
            validate_evaluations: self.validate_evaluations,
            enrichment_client: self.enrichment_client,
            ruleset_hash,
        }
    }
}

impl Agent {
    pub fn evaluators(&self) -> &[Arc<dyn Evaluator>] {
        &self.evaluators
    }

    pub fn ruleset_hash(&self) -> &str {
        &self.ruleset_hash
    }

    /// Run the decision pipeline for `ctx` at wall-clock reference `now`.
    pub fn decide(&self, ctx: &Context, now: DateTime<Utc>) -> Result<Decision, AgentError> {
        let client = self.enrichment_client.as_deref();

        let mut evaluations = Vec::new();
        let mut because = Vec::new();
        let mut failed_conditions = Vec::new();
        let mut signatures = Vec::new();
        let mut effective_context = ctx.clone();

        let evaluate_span = tracing::info_span!("agent.evaluate");
        {
            let _guard = evaluate_span.enter();
            for evaluator in &self.evaluators {
                signatures.push(EvaluatorSignature {
                    name: evaluator.name().to_string(),
                    content_hash: evaluator.content_hash().to_string(),
                });
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    evaluator.evaluate(ctx, now, client)
                }));
                let outcome = match outcome {
                    Ok(outcome) => outcome,
                    Err(panic) => {
                        let message = panic_message(&panic);
                        failed_conditions.push(Descriptor::leaf(
                            format!("{} failed: {message}", evaluator.name()),
                            false,
                        ));
                        continue;
                    }
                };
                because.extend(outcome.because);
                failed_conditions.extend(outcome.failed);
                effective_context = effective_context.with_overlay(outcome.effective_context.as_json());
                if let Some(evaluation) = outcome.evaluation {
                    if self.validate_evaluations && !evaluation.is_well_formed() {
                        failed_conditions.push(Descriptor::leaf(
                            format!("{} produced a malformed evaluation", evaluator.name()),
                            false,
                        ));
                        continue;
                    }
                    evaluations.push(evaluation);
                }
            }
        }

        if evaluations.is_empty() && self.strict {
            return Err(AgentError::NoEvaluations);
        }

        let score_span = tracing::info_span!("agent.score");
        let scored = {
            let _guard = score_span.enter();
            self.scoring.score(&evaluations)
        };

        let explanations: Vec<String> = evaluations
            .iter()
            .map(|e| format!("[{}] {}", e.evaluator_name, e.reason))
            .collect();

        let audit_span = tracing::info_span!("agent.audit");
        let audit = {
            let _guard = audit_span.enter();
            let context_hash = content_hash(effective_context.as_json())?;
            let record = AuditRecordBuilder::new(context_hash, self.ruleset_hash.clone())
                .decision(scored.decision.clone())
                .confidence(scored.confidence)
                .explanations(explanations.clone())
                .evaluator_signatures(signatures)
                .timestamp(Some(now.timestamp() as u64))
                .build()?;
            if let Err(err) = self.sink.record(&record) {
                tracing::warn!(error = %err, "audit sink failed, decision still returned");
            }
            record
        };

        Ok(Decision {
            decision: scored.decision,
            confidence: scored.confidence,
            explanations,
            evaluations,
            audit_payload: audit,
            because,
            failed_conditions,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
