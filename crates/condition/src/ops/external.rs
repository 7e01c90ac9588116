//! The `fetch_from_api` operator: the one operator in the taxonomy that
//! performs external I/O. The condition crate never talks HTTP itself — it
//! defines the narrow capability it needs ([`EnrichmentClient`]) and the
//! `enrichment` crate supplies an implementation wired to a cache, a
//! circuit breaker, and a retrying HTTP client.
//!
//! Per the non-fatality contract, any failure (no client configured, fetch
//! error, missing mapped fields) degrades to `false`; nothing here raises.

use decision_core::Context;
use serde_json::Value as Json;

/// The result of one `fetch_from_api` invocation: whether the call
/// succeeded and the side-context fields it populated via `mapping`.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutcome {
    pub success: bool,
    pub fields: Json,
}

/// Capability the `fetch_from_api` operator needs from its host. Implemented
/// by `enrichment::EnrichmentOperator`.
pub trait EnrichmentClient: Send + Sync {
    fn fetch(&self, endpoint: &str, params: &Json, mapping: &Json) -> EnrichmentOutcome;
}

/// Expand `{{dotted.path}}` templates in `params` using `ctx`. Unresolvable
/// paths are left as empty strings rather than raising.
pub fn expand_templates(params: &Json, ctx: &Context) -> Json {
    match params {
        Json::String(s) => Json::String(expand_string(s, ctx)),
        Json::Array(items) => Json::Array(items.iter().map(|v| expand_templates(v, ctx)).collect()),
        Json::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), expand_templates(v, ctx));
            }
            Json::Object(out)
        }
        other => other.clone(),
    }
}

fn expand_string(template: &str, ctx: &Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let path = after[..end].trim();
        let replacement = ctx
            .get(path)
            .as_json()
            .map(|v| match v {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        out.push_str(&replacement);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Evaluate `fetch_from_api`: returns the boolean verdict plus any derived
/// fields to overlay onto the context for subsequent conditions in the rule.
pub fn fetch_from_api(
    value: &Json,
    ctx: &Context,
    client: Option<&dyn EnrichmentClient>,
) -> (bool, Json) {
    let Some(client) = client else { return (false, Json::Null) };
    let Some(endpoint) = value.get("endpoint").and_then(Json::as_str) else {
        return (false, Json::Null);
    };
    let raw_params = value.get("params").cloned().unwrap_or(Json::Object(Default::default()));
    let params = expand_templates(&raw_params, ctx);
    let mapping = value.get("mapping").cloned().unwrap_or(Json::Object(Default::default()));
    let outcome = client.fetch(endpoint, &params, &mapping);
    (outcome.success, outcome.fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AlwaysOk;
    impl EnrichmentClient for AlwaysOk {
        fn fetch(&self, _endpoint: &str, _params: &Json, _mapping: &Json) -> EnrichmentOutcome {
            EnrichmentOutcome { success: true, fields: json!({"score": 700}) }
        }
    }

    struct AlwaysFail;
    impl EnrichmentClient for AlwaysFail {
        fn fetch(&self, _endpoint: &str, _params: &Json, _mapping: &Json) -> EnrichmentOutcome {
            EnrichmentOutcome { success: false, fields: Json::Null }
        }
    }

    #[test]
    fn expands_dotted_path_templates() {
        let ctx = Context::new(json!({"customer": {"id": "C1"}})).unwrap();
        let expanded = expand_templates(&json!({"id": "{{customer.id}}"}), &ctx);
        assert_eq!(expanded, json!({"id": "C1"}));
    }

    #[test]
    fn no_client_degrades_to_false() {
        let ctx = Context::new(json!({})).unwrap();
        let (ok, _) = fetch_from_api(&json!({"endpoint": "kyc"}), &ctx, None);
        assert!(!ok);
    }

    #[test]
    fn successful_fetch_returns_fields() {
        let ctx = Context::new(json!({})).unwrap();
        let (ok, fields) = fetch_from_api(&json!({"endpoint": "kyc"}), &ctx, Some(&AlwaysOk));
        assert!(ok);
        assert_eq!(fields, json!({"score": 700}));
    }

    #[test]
    fn failed_fetch_is_false_not_raised() {
        let ctx = Context::new(json!({})).unwrap();
        let (ok, _) = fetch_from_api(&json!({"endpoint": "kyc"}), &ctx, Some(&AlwaysFail));
        assert!(!ok);
    }
}
