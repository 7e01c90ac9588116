//! Endpoint configuration (§4.13): a process-wide named-endpoint table
//! loaded once at startup, typically from YAML alongside the ruleset
//! documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum BackoffStrategy {
    Constant,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub auth: Option<String>,
    pub cache: CacheConfig,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
    pub circuit_breaker: CircuitBreakerConfig,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// The process-wide table of named endpoints, keyed by the endpoint name
/// referenced from a rule's `fetch_from_api` value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointTable {
    #[serde(flatten)]
    endpoints: HashMap<String, EndpointConfig>,
}

impl EndpointTable {
    pub fn from_yaml(yaml: &str) -> Result<Self, crate::error::EnrichmentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn get(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: EndpointConfig) {
        self.endpoints.insert(name.into(), config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_endpoint_table_from_yaml() {
        let yaml = r#"
credit_bureau:
  url: https://bureau.example/v1/score
  method: GET
  cache:
    ttl_seconds: 300
  timeout_ms: 2000
  retry:
    max_attempts: 3
    backoff: exponential
    base_delay_ms: 100
  circuit_breaker:
    failure_threshold: 5
    reset_timeout_ms: 30000
"#;
        let table = EndpointTable::from_yaml(yaml).unwrap();
        let endpoint = table.get("credit_bureau").unwrap();
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.cache.ttl_seconds, 300);
    }
}
