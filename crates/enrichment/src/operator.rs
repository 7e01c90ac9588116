//! `EnrichmentOperator` (§4.13): the concrete [`condition::EnrichmentClient`]
//! that wires a named-endpoint table to a cache, a circuit breaker per
//! endpoint, and a retrying HTTP client.

use crate::cache::EnrichmentCache;
use crate::circuit_breaker::CircuitBreaker;
use crate::client::HttpClient;
use crate::config::EndpointTable;
use condition::{EnrichmentClient, EnrichmentOutcome};
use dashmap::DashMap;
use decision_core::canonicalize;
use serde_json::{json, Value as Json};
use std::time::Duration;

pub struct EnrichmentOperator {
    endpoints: EndpointTable,
    cache: EnrichmentCache,
    breakers: DashMap<String, CircuitBreaker>,
    http: HttpClient,
}

impl EnrichmentOperator {
    pub fn new(endpoints: EndpointTable) -> Self {
        Self { endpoints, cache: EnrichmentCache::new(), breakers: DashMap::new(), http: HttpClient::new() }
    }

    fn breaker_for(&self, endpoint_name: &str, failure_threshold: u32, reset_timeout: Duration) -> dashmap::mapref::one::Ref<'_, String, CircuitBreaker> {
        if !self.breakers.contains_key(endpoint_name) {
            self.breakers
                .entry(endpoint_name.to_string())
                .or_insert_with(|| CircuitBreaker::new(failure_threshold, reset_timeout));
        }
        self.breakers.get(endpoint_name).expect("just inserted")
    }
}

fn apply_mapping(response: &Json, mapping: &Json) -> Json {
    let Some(mapping) = mapping.as_object() else { return Json::Object(Default::default()) };
    let mut fields = serde_json::Map::new();
    for (response_key, context_key) in mapping {
        let Some(context_key) = context_key.as_str() else { continue };
        let value = response.get(response_key).cloned().unwrap_or(Json::Null);
        fields.insert(context_key.to_string(), value);
    }
    Json::Object(fields)
}

impl EnrichmentClient for EnrichmentOperator {
    fn fetch(&self, endpoint_name: &str, params: &Json, mapping: &Json) -> EnrichmentOutcome {
        let Some(config) = self.endpoints.get(endpoint_name) else {
            return EnrichmentOutcome::default();
        };

        let cache_key = match canonicalize(&json!({"endpoint": endpoint_name, "params": params})) {
            Ok(bytes) => decision_core::hex_sha256(&bytes),
            Err(_) => return EnrichmentOutcome::default(),
        };

        let breaker = self.breaker_for(
            endpoint_name,
            config.circuit_breaker.failure_threshold,
            Duration::from_millis(config.circuit_breaker.reset_timeout_ms),
        );
        if !breaker.allow_request() {
            return EnrichmentOutcome::default();
        }

        let ttl = Duration::from_secs(config.cache.ttl_seconds);
        let mut call_failed = false;
        let response = self.cache.get_or_fetch(&cache_key, ttl, || match self.http.call(config, params) {
            Ok(body) => {
                breaker.record_success();
                body
            }
            Err(reason) => {
                tracing::warn!(endpoint = endpoint_name, error = %reason, "enrichment fetch failed");
                breaker.record_failure();
                call_failed = true;
                Json::Null
            }
        });

        if call_failed || response.is_null() {
            return EnrichmentOutcome::default();
        }
        EnrichmentOutcome { success: true, fields: apply_mapping(&response, mapping) }
    }
}
