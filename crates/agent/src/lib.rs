//! Scoring strategies, the decision orchestrator, and replay (§4.6-§4.10).

#![deny(unsafe_code)]

pub mod decision;
pub mod error;
pub mod orchestrator;
pub mod replay;
pub mod scoring;

pub use decision::Decision;
pub use error::{AgentError, ReplayError};
pub use orchestrator::{Agent, AgentBuilder};
pub use replay::{replay_lenient, replay_outcome, replay_strict, ReplayDiff, ReplayOutcome};
pub use scoring::{Consensus, MaxWeight, Scored, ScoringStrategy, Threshold, WeightedAverage};
