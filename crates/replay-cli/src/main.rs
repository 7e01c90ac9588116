//! Decision and replay CLI: build an `Agent` from a rule document (and
//! optionally a DMN table), run it once, or replay it against a previously
//! recorded audit record and report whether the two agree.

#![deny(unsafe_code)]

use agent::{replay_lenient, replay_outcome, Agent, AgentBuilder, Consensus, MaxWeight, ReplayOutcome, Threshold, WeightedAverage};
use audit::AuditRecord;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use decision_core::Context;
use evaluator::Evaluator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "decision-replay", about = "Run and replay decisions against a rule document")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(ValueEnum, Clone, Debug)]
enum Scoring {
    Weighted,
    MaxWeight,
    Consensus,
    Threshold,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a context once and print the resulting decision.
    Decide {
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        dmn: Option<PathBuf>,
        #[arg(long)]
        context: PathBuf,
        #[arg(long, value_enum, default_value = "weighted")]
        scoring: Scoring,
        #[arg(long, default_value_t = 0.5)]
        scoring_param: f64,
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        audit_out: Option<PathBuf>,
    },
    /// Re-run a context against an audit record and report divergence.
    Replay {
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        dmn: Option<PathBuf>,
        #[arg(long)]
        context: PathBuf,
        #[arg(long)]
        audit: PathBuf,
        #[arg(long, value_enum, default_value = "weighted")]
        scoring: Scoring,
        #[arg(long, default_value_t = 0.5)]
        scoring_param: f64,
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_json_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Decide { rules, dmn, context, scoring, scoring_param, strict, audit_out } => {
            cmd_decide(rules.as_deref(), dmn.as_deref(), &context, scoring, scoring_param, strict, audit_out.as_deref())
        }
        Command::Replay { rules, dmn, context, audit, scoring, scoring_param, lenient } => {
            cmd_replay(rules.as_deref(), dmn.as_deref(), &context, &audit, scoring, scoring_param, lenient)
        }
    }
}

fn build_agent(
    rules_path: Option<&Path>,
    dmn_path: Option<&Path>,
    scoring: Scoring,
    scoring_param: f64,
    strict: bool,
) -> Result<Agent, Box<dyn std::error::Error>> {
    let strategy: Arc<dyn agent::ScoringStrategy> = match scoring {
        Scoring::Weighted => Arc::new(WeightedAverage),
        Scoring::MaxWeight => Arc::new(MaxWeight),
        Scoring::Consensus => Arc::new(Consensus::new(scoring_param)),
        Scoring::Threshold => Arc::new(Threshold::new(scoring_param, "review")),
    };
    let mut builder = AgentBuilder::new(strategy).strict(strict);

    if let Some(path) = rules_path {
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        let ruleset = rules::validate_document(&raw)?;
        let ev: Arc<dyn Evaluator> = Arc::new(evaluator::JsonRuleEvaluator::new(ruleset)?);
        builder = builder.evaluator(ev);
    }

    if let Some(path) = dmn_path {
        let xml = fs::read_to_string(path)?;
        let graph = dmn::parse(&xml)?;
        let sink = graph
            .sinks()
            .first()
            .map(|d| d.id.clone())
            .ok_or("DMN document declares no decisions")?;
        let name = sink.clone();
        let ev: Arc<dyn Evaluator> = Arc::new(dmn::DmnEvaluator::new(name, graph, sink)?);
        builder = builder.evaluator(ev);
    }

    Ok(builder.build())
}

fn load_context(path: &Path) -> Result<Context, Box<dyn std::error::Error>> {
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(Context::new(raw)?)
}

fn cmd_decide(
    rules_path: Option<&Path>,
    dmn_path: Option<&Path>,
    context_path: &Path,
    scoring: Scoring,
    scoring_param: f64,
    strict: bool,
    audit_out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent = build_agent(rules_path, dmn_path, scoring, scoring_param, strict)?;
    let ctx = load_context(context_path)?;
    let decision = agent.decide(&ctx, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&decision.audit_payload)?);
    if let Some(path) = audit_out {
        fs::write(path, serde_json::to_string_pretty(&decision.audit_payload)?)?;
        eprintln!("wrote audit record to {}", path.display());
    }
    Ok(())
}

fn cmd_replay(
    rules_path: Option<&Path>,
    dmn_path: Option<&Path>,
    context_path: &Path,
    audit_path: &Path,
    scoring: Scoring,
    scoring_param: f64,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent = build_agent(rules_path, dmn_path, scoring, scoring_param, false)?;
    let ctx = load_context(context_path)?;
    let original: AuditRecord = serde_json::from_str(&fs::read_to_string(audit_path)?)?;
    let now = original
        .timestamp
        .and_then(|ts| chrono::DateTime::<Utc>::from_timestamp(ts as i64, 0))
        .unwrap_or_else(Utc::now);

    if lenient {
        let decision = replay_lenient(&agent, &ctx, now, &original)?;
        println!("{}", serde_json::to_string_pretty(&decision.audit_payload)?);
        return Ok(());
    }

    match replay_outcome(&agent, &ctx, now, &original)? {
        ReplayOutcome::Matched(decision) => {
            println!("replay matched: {}", decision.audit_payload.deterministic_hash);
        }
        ReplayOutcome::Diverged(diff) => {
            eprintln!("replay diverged in fields: {}", diff.differences.join(", "));
            println!("{}", serde_json::to_string_pretty(&diff.actual)?);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(contents).unwrap()).unwrap();
        path
    }

    fn sample_ruleset() -> serde_json::Value {
        json!({
            "version": "1",
            "ruleset": "kyc",
            "rules": [
                {"id": "low", "if": {"field": "amount", "op": "lt", "value": 100}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}},
                {"id": "default", "if": {"all": []}, "then": {"decision": "review", "weight": 0.5, "reason": "catch-all"}}
            ]
        })
    }

    #[test]
    fn decide_runs_against_a_rule_document() {
        let dir = tempdir().unwrap();
        let rules = write(dir.path(), "rules.json", &sample_ruleset());
        let context = write(dir.path(), "context.json", &json!({"amount": 10}));
        let agent = build_agent(Some(&rules), None, Scoring::Weighted, 0.5, false).unwrap();
        let ctx = load_context(&context).unwrap();
        let decision = agent.decide(&ctx, Utc::now()).unwrap();
        assert_eq!(decision.decision.as_deref(), Some("approve"));
    }

    #[test]
    fn replay_detects_no_divergence_for_identical_rerun() {
        let dir = tempdir().unwrap();
        let rules = write(dir.path(), "rules.json", &sample_ruleset());
        let context = write(dir.path(), "context.json", &json!({"amount": 10}));
        let agent = build_agent(Some(&rules), None, Scoring::Weighted, 0.5, false).unwrap();
        let ctx = load_context(&context).unwrap();
        let now = Utc::now();
        let original = agent.decide(&ctx, now).unwrap().audit_payload;
        let outcome = replay_outcome(&agent, &ctx, now, &original).unwrap();
        assert!(matches!(outcome, ReplayOutcome::Matched(_)));
    }
}
