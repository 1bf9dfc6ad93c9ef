use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::ConfigError;
use crate::types::RiskColor;

/// Backend når appen kjøres lokalt (Flask-dev på 5001).
pub const LOCAL_API_BASE: &str = "http://127.0.0.1:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Hvilken scorer kalleren ønsker. Ingen automatisk fallback mellom dem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Produksjons-backend. Uten denne er /score av utenfor localhost.
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default, alias = "mode")]
    pub scoring: Option<ScoringMode>,
    #[serde(default)]
    pub alert_threshold: Option<RiskColor>,
}

impl ClientConfig {
    pub fn from_json(json_in: &str) -> Result<Self, ConfigError> {
        let mut de = serde_json::Deserializer::from_str(json_in);
        spte::deserialize(&mut de).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    /// API-base for gitt vertsnavn: localhost går alltid mot lokal backend,
    /// ellers konfigurert `api_base` (tom streng = ikke satt).
    pub fn api_base_for_host(&self, host: &str) -> Option<String> {
        if matches!(host, "localhost" | "127.0.0.1") {
            return Some(LOCAL_API_BASE.to_string());
        }
        self.api_base
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .map(str::to_string)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring.unwrap_or_default()
    }

    pub fn alert_threshold(&self) -> RiskColor {
        self.alert_threshold.unwrap_or(RiskColor::Red)
    }
}
