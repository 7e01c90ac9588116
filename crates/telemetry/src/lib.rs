//! Structured logging for the decision engine (Phase 0 baseline OTel wiring to follow).

#![deny(unsafe_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("otel setup failed: {0}")]
    Otel(String),
}

/// Initialize structured logging (JSON) with env filter.
/// Set `RUST_LOG`, e.g. "info,agent=debug".
pub fn init_json_logging() {
    let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Initialize OpenTelemetry tracer (optional; behind `otel` feature). No tracing subscriber hookup.
#[cfg(feature = "otel")]
pub fn init_otel(service_name: &str) -> Result<(), TelemetryError> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::trace as sdktrace;
    use opentelemetry_sdk::{runtime, Resource};

    let resource = Resource::new(vec![KeyValue::new("service.name", service_name.to_owned())]);
    let _tracer_provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().http())
        .with_trace_config(sdktrace::config().with_resource(resource))
        .install_batch(runtime::Tokio)
        .map_err(|e| TelemetryError::Otel(e.to_string()))?;
    Ok(())
}

#[cfg(feature = "otel")]
pub mod metrics {
    //! OTel metrics (OTLP) for decision throughput and confidence.
    use super::TelemetryError;
    use once_cell::sync::OnceCell;
    use opentelemetry::global;
    use opentelemetry::metrics::{Counter, Histogram, Meter};

    static METRICS_INIT: OnceCell<()> = OnceCell::new();

    fn detect_service_name() -> String {
        std::env::var("OTEL_SERVICE_NAME")
            .or_else(|_| std::env::var("DECISION_ENGINE_SERVICE_NAME"))
            .unwrap_or_else(|_| "decision-engine".to_string())
    }

    fn init_metrics_from_env() -> Result<(), TelemetryError> {
        let _svc = detect_service_name();
        let provider = opentelemetry_otlp::new_pipeline()
            .metrics(opentelemetry_sdk::runtime::Tokio)
            .with_exporter(opentelemetry_otlp::new_exporter().http())
            .build()
            .map_err(|e| TelemetryError::Otel(e.to_string()))?;
        global::set_meter_provider(provider);
        Ok(())
    }

    fn ensure_metrics_provider() {
        let _ = METRICS_INIT.get_or_init(|| {
            let _ = init_metrics_from_env();
        });
    }

    #[derive(Clone)]
    pub struct CounterWrap {
        counter: Counter<u64>,
        hist: Histogram<u64>,
    }

    impl CounterWrap {
        /// Add a value to the counter and record into the histogram. Attributes ignored for now.
        pub fn add(&self, val: u64, _attrs: &[()]) {
            self.counter.add(val, &[]);
            self.hist.record(val, &[]);
        }
    }

    #[derive(Clone)]
    pub struct DecisionInstruments {
        decisions: CounterWrap,
        evaluations: CounterWrap,
    }

    impl DecisionInstruments {
        pub fn decisions(&self) -> CounterWrap {
            self.decisions.clone()
        }
        pub fn evaluations(&self) -> CounterWrap {
            self.evaluations.clone()
        }
    }

    pub fn init_decision_instruments() -> DecisionInstruments {
        ensure_metrics_provider();
        let meter: Meter = global::meter("decision_engine");
        let decisions = CounterWrap {
            counter: meter
                .u64_counter("decision_engine.decisions.total")
                .with_description("Total decisions produced (monotonic)")
                .init(),
            hist: meter
                .u64_histogram("decision_engine.decisions.confidence_pct")
                .with_description("Decision confidence, scaled to an integer percentage")
                .init(),
        };
        let evaluations = CounterWrap {
            counter: meter
                .u64_counter("decision_engine.evaluations.total")
                .with_description("Total evaluator invocations that produced a verdict")
                .init(),
            hist: meter
                .u64_histogram("decision_engine.evaluations.per_decision")
                .with_description("Evaluations contributing to a single decision")
                .init(),
        };
        DecisionInstruments { decisions, evaluations }
    }
}

/// Returns whether telemetry is initialized (stubbed).
pub fn is_initialized() -> bool {
    true
}

/// Process-local, non-OTel fallback counters for decision throughput.
#[derive(Clone, Default)]
pub struct DecisionMetrics {
    decisions_total: Arc<AtomicU64>,
    evaluations_total: Arc<AtomicU64>,
}

impl DecisionMetrics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn record(&self, evaluations: u64) {
        let _ = self.decisions_total.fetch_add(1, Ordering::Relaxed);
        if evaluations > 0 {
            let _ = self.evaluations_total.fetch_add(evaluations, Ordering::Relaxed);
        }
    }
    pub fn snapshot(&self) -> (u64, u64) {
        (self.decisions_total.load(Ordering::Relaxed), self.evaluations_total.load(Ordering::Relaxed))
    }
}
