//! `Decision` (§3): the frozen output of one `Agent::decide` call. Every
//! field is populated up front by the orchestrator; nothing on this type is
//! computed lazily, so a `Decision` can be serialized, stored, or replayed
//! against without re-touching the evaluators that produced it.

use audit::AuditRecord;
use condition::Descriptor;
use evaluator::Evaluation;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub decision: Option<String>,
    pub confidence: f64,
    pub explanations: Vec<String>,
    pub evaluations: Vec<Evaluation>,
    pub audit_payload: AuditRecord,
    pub because: Vec<Descriptor>,
    pub failed_conditions: Vec<Descriptor>,
}
