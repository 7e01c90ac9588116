//! A retrying blocking HTTP client (§4.13). Blocking rather than async:
//! `Agent::decide` has no suspension points, so the operator that backs
//! `fetch_from_api` cannot hand control back to an executor mid-call.

use crate::config::{BackoffStrategy, EndpointConfig, HttpMethod};
use reqwest::blocking::Client;
use serde_json::Value as Json;
use std::time::Duration;

pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self { client: Client::new() }
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the configured request, retrying per `endpoint.retry` on
    /// transport or non-2xx failures. Returns `Err` with a human-readable
    /// reason on exhaustion; the caller (the enrichment operator) turns
    /// that into a boolean `false`, never propagating it further.
    pub fn call(&self, endpoint: &EndpointConfig, params: &Json) -> Result<Json, String> {
        let mut last_error = String::from("no attempts made");
        for attempt in 0..endpoint.retry.max_attempts {
            match self.attempt(endpoint, params) {
                Ok(body) => return Ok(body),
                Err(message) => {
                    last_error = message;
                    if attempt + 1 < endpoint.retry.max_attempts {
                        std::thread::sleep(backoff_delay(&endpoint.retry, attempt));
                    }
                }
            }
        }
        Err(last_error)
    }

    fn attempt(&self, endpoint: &EndpointConfig, params: &Json) -> Result<Json, String> {
        let mut builder = match endpoint.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = match endpoint.method {
                    HttpMethod::Get => self.client.get(&endpoint.url),
                    _ => self.client.delete(&endpoint.url),
                };
                if let Some(map) = params.as_object() {
                    let query: Vec<(String, String)> =
                        map.iter().map(|(k, v)| (k.clone(), json_to_query_value(v))).collect();
                    builder = builder.query(&query);
                }
                builder
            }
            HttpMethod::Post => self.client.post(&endpoint.url).json(params),
            HttpMethod::Put => self.client.put(&endpoint.url).json(params),
        };
        builder = builder.timeout(endpoint.timeout());
        if let Some(auth) = &endpoint.auth {
            builder = builder.bearer_auth(auth);
        }
        let response = builder.send().map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("endpoint returned status {}", response.status()));
        }
        response.json::<Json>().map_err(|e| e.to_string())
    }
}

fn json_to_query_value(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn backoff_delay(retry: &crate::config::RetryConfig, attempt: u32) -> Duration {
    let millis = match retry.backoff {
        BackoffStrategy::Constant => retry.base_delay_ms,
        BackoffStrategy::Linear => retry.base_delay_ms * u64::from(attempt + 1),
        BackoffStrategy::Exponential => retry.base_delay_ms.saturating_mul(1 << attempt),
    };
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;

    #[test]
    fn exponential_backoff_doubles_each_attempt() {
        let retry = RetryConfig { max_attempts: 4, backoff: BackoffStrategy::Exponential, base_delay_ms: 10 };
        assert_eq!(backoff_delay(&retry, 0), Duration::from_millis(10));
        assert_eq!(backoff_delay(&retry, 1), Duration::from_millis(20));
        assert_eq!(backoff_delay(&retry, 2), Duration::from_millis(40));
    }

    #[test]
    fn linear_backoff_scales_with_attempt() {
        let retry = RetryConfig { max_attempts: 4, backoff: BackoffStrategy::Linear, base_delay_ms: 10 };
        assert_eq!(backoff_delay(&retry, 0), Duration::from_millis(10));
        assert_eq!(backoff_delay(&retry, 2), Duration::from_millis(30));
    }
}
