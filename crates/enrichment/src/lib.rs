//! The data enrichment operator (§4.13): endpoint configuration, a
//! single-flight TTL cache, a per-endpoint circuit breaker, and a
//! retrying blocking HTTP client, composed into the
//! [`condition::EnrichmentClient`] the condition evaluator calls into for
//! `fetch_from_api`.

#![deny(unsafe_code)]

pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod error;
pub mod operator;

pub use cache::EnrichmentCache;
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::HttpClient;
pub use config::{BackoffStrategy, CacheConfig, CircuitBreakerConfig, EndpointConfig, EndpointTable, HttpMethod, RetryConfig};
pub use error::EnrichmentError;
pub use operator::EnrichmentOperator;
