//! Scoring strategies (§4.6): pure functions from a list of [`Evaluation`]s
//! to `{decision, confidence}`. Ties resolve by first-seen order in the
//! evaluation list (stable) — so callers that care about tie-breaking
//! control it through evaluator ordering, not through the strategy.

use evaluator::Evaluation;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub decision: Option<String>,
    pub confidence: f64,
}

pub trait ScoringStrategy: Send + Sync {
    fn score(&self, evaluations: &[Evaluation]) -> Scored;
}

/// Groups evaluations by decision, sums weight per group, and picks the
/// group with the largest total; confidence is that group's share of the
/// total weight across all evaluations.
#[derive(Default)]
pub struct WeightedAverage;

impl ScoringStrategy for WeightedAverage {
    fn score(&self, evaluations: &[Evaluation]) -> Scored {
        if evaluations.is_empty() {
            return Scored { decision: None, confidence: 0.0 };
        }
        let (winner, winning_weight, total) = group_and_sum(evaluations);
        let confidence = if total > 0.0 { (winning_weight / total).clamp(0.0, 1.0) } else { 0.0 };
        Scored { decision: Some(winner), confidence: round4(confidence) }
    }
}

/// Picks the single evaluation with the greatest weight; confidence is
/// that evaluation's own weight.
#[derive(Default)]
pub struct MaxWeight;

impl ScoringStrategy for MaxWeight {
    fn score(&self, evaluations: &[Evaluation]) -> Scored {
        let Some(best) = evaluations.iter().enumerate().max_by(|(ia, a), (ib, b)| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ib.cmp(ia)) // first-seen wins ties: prefer the smaller original index
        }) else {
            return Scored { decision: None, confidence: 0.0 };
        };
        let (_, eval) = best;
        Scored { decision: Some(eval.decision.clone()), confidence: round4(eval.weight.clamp(0.0, 1.0)) }
    }
}

/// Groups by decision; the decision with highest agreement
/// (`count / total`) wins, ties broken by highest average weight. If the
/// winning agreement is below `min_agreement`, confidence is halved.
pub struct Consensus {
    pub min_agreement: f64,
}

impl Consensus {
    pub fn new(min_agreement: f64) -> Self {
        Self { min_agreement }
    }
}

impl ScoringStrategy for Consensus {
    fn score(&self, evaluations: &[Evaluation]) -> Scored {
        if evaluations.is_empty() {
            return Scored { decision: None, confidence: 0.0 };
        }
        let total = evaluations.len() as f64;
        let mut order = Vec::new();
        let mut groups: HashMap<&str, (usize, f64)> = HashMap::new();
        for e in evaluations {
            if !groups.contains_key(e.decision.as_str()) {
                order.push(e.decision.as_str());
            }
            let entry = groups.entry(e.decision.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += e.weight;
        }
        let winner = order
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                let (ca, wa) = groups[*a];
                let (cb, wb) = groups[*b];
                let agreement_a = ca as f64 / total;
                let agreement_b = cb as f64 / total;
                agreement_a
                    .partial_cmp(&agreement_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        let avg_a = wa / ca as f64;
                        let avg_b = wb / cb as f64;
                        avg_a.partial_cmp(&avg_b).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .then(ib.cmp(ia)) // first-seen wins ties
            })
            .map(|(_, decision)| *decision)
            .unwrap();
        let (count, sum_weight) = groups[winner];
        let agreement = count as f64 / total;
        let avg_weight = sum_weight / count as f64;
        let mut confidence = agreement * avg_weight;
        if agreement < self.min_agreement {
            confidence /= 2.0;
        }
        Scored { decision: Some(winner.to_string()), confidence: round4(confidence.clamp(0.0, 1.0)) }
    }
}

/// Picks the decision with the highest average weight; if that average is
/// at or above `threshold`, it wins outright. Otherwise `fallback` wins
/// with half that weight.
pub struct Threshold {
    pub threshold: f64,
    pub fallback: String,
}

impl Threshold {
    pub fn new(threshold: f64, fallback: impl Into<String>) -> Self {
        Self { threshold, fallback: fallback.into() }
    }
}

impl ScoringStrategy for Threshold {
    fn score(&self, evaluations: &[Evaluation]) -> Scored {
        if evaluations.is_empty() {
            return Scored { decision: Some(self.fallback.clone()), confidence: 0.0 };
        }
        let mut order = Vec::new();
        let mut groups: HashMap<&str, (usize, f64)> = HashMap::new();
        for e in evaluations {
            if !groups.contains_key(e.decision.as_str()) {
                order.push(e.decision.as_str());
            }
            let entry = groups.entry(e.decision.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += e.weight;
        }
        let best = order
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                let (ca, wa) = groups[*a];
                let (cb, wb) = groups[*b];
                (wa / ca as f64)
                    .partial_cmp(&(wb / cb as f64))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(ib.cmp(ia)) // first-seen wins ties
            })
            .map(|(_, decision)| *decision)
            .unwrap();
        let (count, sum_weight) = groups[best];
        let avg_weight = sum_weight / count as f64;
        if avg_weight >= self.threshold {
            Scored { decision: Some(best.to_string()), confidence: round4(avg_weight.clamp(0.0, 1.0)) }
        } else {
            Scored {
                decision: Some(self.fallback.clone()),
                confidence: round4((avg_weight / 2.0).clamp(0.0, 1.0)),
            }
        }
    }
}

fn group_and_sum(evaluations: &[Evaluation]) -> (String, f64, f64) {
    let mut order = Vec::new();
    let mut groups: HashMap<&str, f64> = HashMap::new();
    let mut total = 0.0;
    for e in evaluations {
        if !groups.contains_key(e.decision.as_str()) {
            order.push(e.decision.as_str());
        }
        *groups.entry(e.decision.as_str()).or_insert(0.0) += e.weight;
        total += e.weight;
    }
    let winner = order
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            groups[*a]
                .partial_cmp(&groups[*b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ib.cmp(ia)) // first-seen wins ties
        })
        .map(|(_, decision)| *decision)
        .unwrap();
    (winner.to_string(), groups[winner], total)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
