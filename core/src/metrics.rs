use std::sync::Arc;

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::types::RiskColor;

/// Prometheus-tellere for scoring og cache. Hver instans har sitt eget
/// `Registry`, slik at tester kan telle uten å dele global tilstand.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    scores_total: IntCounterVec,
    score_errors_total: IntCounterVec,
    cache_hit_total: IntCounter,
    cache_miss_total: IntCounter,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("cache_hits", &self.cache_hits())
            .field("cache_misses", &self.cache_misses())
            .finish_non_exhaustive()
    }
}

static GLOBAL: Lazy<Option<Arc<Metrics>>> = Lazy::new(|| match Metrics::new() {
    Ok(m) => Some(Arc::new(m)),
    Err(e) => {
        log::error!("could not register global metrics, counting disabled: {e}");
        None
    }
});

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let scores_total = IntCounterVec::new(
            Opts::new("astrasync_scores_total", "Completed risk assessments"),
            &["source", "risk_color"],
        )?;
        let score_errors_total = IntCounterVec::new(
            Opts::new("astrasync_score_errors_total", "Failed scoring calls"),
            &["source"],
        )?;
        let cache_hit_total =
            IntCounter::new("astrasync_score_cache_hit_total", "Scores served from cache")?;
        let cache_miss_total =
            IntCounter::new("astrasync_score_cache_miss_total", "Scores computed on cache miss")?;

        registry.register(Box::new(scores_total.clone()))?;
        registry.register(Box::new(score_errors_total.clone()))?;
        registry.register(Box::new(cache_hit_total.clone()))?;
        registry.register(Box::new(cache_miss_total.clone()))?;

        Ok(Self {
            registry,
            scores_total,
            score_errors_total,
            cache_hit_total,
            cache_miss_total,
        })
    }

    /// Prosessvid instans for kallere som ikke injiserer egne tellere.
    /// `None` hvis registreringen feilet; da telles ingenting.
    pub fn global() -> Option<Arc<Metrics>> {
        GLOBAL.as_ref().map(Arc::clone)
    }

    pub fn record_score(&self, source: &str, color: RiskColor) {
        self.scores_total
            .with_label_values(&[source, color.as_str()])
            .inc();
    }

    pub fn record_score_error(&self, source: &str) {
        self.score_errors_total.with_label_values(&[source]).inc();
    }

    pub fn cache_hit(&self) {
        self.cache_hit_total.inc();
    }

    pub fn cache_miss(&self) {
        self.cache_miss_total.inc();
    }

    pub fn scores(&self, source: &str, color: RiskColor) -> u64 {
        self.scores_total
            .with_label_values(&[source, color.as_str()])
            .get()
    }

    pub fn score_errors(&self, source: &str) -> u64 {
        self.score_errors_total.with_label_values(&[source]).get()
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hit_total.get()
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_miss_total.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tekstformat for /metrics-eksponering.
    pub fn gather_text(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            log::error!("metrics encode failed: {e}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
