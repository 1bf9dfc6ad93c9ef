//! AstraSync core: heuristisk risikoscore for én dags helselogg, pluss
//! lager, /score-klient og varsling rundt den.

pub mod checkin;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod score_api;
pub mod scorer;
pub mod scoring;
pub mod storage;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use checkin::{CheckInOutcome, DailyCheckIn};
pub use config::{ClientConfig, ScoringMode};
pub use error::{ConfigError, ScoreError, StoreError};
pub use metrics::Metrics;
pub use models::{LogEntry, Profile};
pub use notify::{enable_alerts, AlertPolicy, AlertsStatus, LogNotifier, Notifier, Permission};
pub use score_api::{RemoteScorer, SyncedMetrics};
pub use scorer::{scorer_from_config, CachedScorer, HeuristicScorer, Scorer};
pub use scoring::{confidence_for, organ_summary, score_entry, score_entry_json, tier_for};
pub use storage::{today_iso, FileBackend, HealthRepository, KeyValueBackend, MemoryBackend, MAX_LOGS};
pub use types::{HealthEntry, HeartStatus, OrganSummary, RiskAssessment, RiskColor, SleepStatus};
