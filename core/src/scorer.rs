use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ordered_float::OrderedFloat;

use crate::config::{ClientConfig, ScoringMode};
use crate::error::ScoreError;
use crate::metrics::Metrics;
use crate::score_api::RemoteScorer;
use crate::scoring::score_entry;
use crate::types::{HealthEntry, RiskAssessment};

/// Felles grensesnitt for lokal heuristikk og /score-backend.
/// Kalleren velger implementasjon; begge tar og gir samme form.
pub trait Scorer: Send + Sync {
    /// Kort kildenavn, brukt som metrics-label.
    fn name(&self) -> &str;

    fn score(&self, entry: &HealthEntry) -> Result<RiskAssessment, ScoreError>;

    /// Samme entry gir alltid samme svar. Bare slike scorere kan caches;
    /// /score avhenger av profil og historikk på serveren.
    fn is_pure(&self) -> bool {
        false
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_pure(&self) -> bool {
        (**self).is_pure()
    }

    fn score(&self, entry: &HealthEntry) -> Result<RiskAssessment, ScoreError> {
        (**self).score(entry)
    }
}

/// Lokal regelbasert scorer (demo/fallback for modellen på serveren).
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl Scorer for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, entry: &HealthEntry) -> Result<RiskAssessment, ScoreError> {
        Ok(score_entry(entry))
    }

    fn is_pure(&self) -> bool {
        true
    }
}

/// Bygg scoreren konfigurasjonen ber om.
pub fn scorer_from_config(cfg: &ClientConfig, host: &str) -> Result<Box<dyn Scorer>, ScoreError> {
    match cfg.scoring_mode() {
        ScoringMode::Local => Ok(Box::new(HeuristicScorer)),
        ScoringMode::Remote => Ok(Box::new(RemoteScorer::from_config(cfg, host)?)),
    }
}

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

type EntryKey = ([Option<OrderedFloat<f64>>; 7], bool, bool);

fn entry_key(e: &HealthEntry) -> EntryKey {
    let f = |v: Option<f64>| v.map(OrderedFloat);
    (
        [
            f(e.bp_sys),
            f(e.bp_dia),
            f(e.spo2_avg),
            f(e.sleep_hours),
            f(e.steps),
            f(e.screen_time_min),
            f(e.resting_hr),
        ],
        e.alcohol,
        e.smoking,
    )
}

// Eldste nøkkel kastes først når kapasiteten er nådd.
#[derive(Default)]
struct Bounded {
    items: HashMap<EntryKey, RiskAssessment>,
    order: VecDeque<EntryKey>,
}

impl Bounded {
    fn insert(&mut self, key: EntryKey, value: RiskAssessment, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if self.items.insert(key, value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.items.remove(&oldest);
            }
        }
    }
}

/// Memoiserer vellykkede resultater per identisk entry, maks `capacity` stykker.
/// Feil caches aldri. Scorere som ikke er rene (`is_pure() == false`, f.eks.
/// `RemoteScorer`) slippes rett gjennom uten cache.
pub struct CachedScorer<S> {
    inner: S,
    cache: Mutex<Bounded>,
    capacity: usize,
    metrics: Option<Arc<Metrics>>,
}

impl<S: Scorer> CachedScorer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(Bounded::default()),
            capacity: DEFAULT_CACHE_CAPACITY,
            metrics: Metrics::global(),
        }
    }

    pub fn with_metrics(inner: S, metrics: Arc<Metrics>) -> Self {
        Self { metrics: Some(metrics), ..Self::new(inner) }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.items.clear();
            cache.order.clear();
        }
    }
}

impl<S: Scorer> Scorer for CachedScorer<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_pure(&self) -> bool {
        self.inner.is_pure()
    }

    fn score(&self, entry: &HealthEntry) -> Result<RiskAssessment, ScoreError> {
        if !self.inner.is_pure() {
            return self.inner.score(entry);
        }
        let key = entry_key(entry);

        // Forgiftet lås = behandle som cache-miss
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.items.get(&key) {
                if let Some(m) = &self.metrics {
                    m.cache_hit();
                }
                return Ok(hit.clone());
            }
        }

        if let Some(m) = &self.metrics {
            m.cache_miss();
        }
        let fresh = self.inner.score(entry)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, fresh.clone(), self.capacity);
        }
        Ok(fresh)
    }
}
