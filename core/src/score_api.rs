// core/src/score_api.rs
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_path_to_error as spte;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::ScoreError;
use crate::scorer::Scorer;
use crate::scoring::{next_steps_for, organ_summary, MAX_NEXT_STEPS, MAX_REASONS};
use crate::types::{
    lenient_bool, lenient_f64, HealthEntry, HeartStatus, OrganSummary, RiskAssessment, RiskColor,
    SleepStatus,
};

// ──────────────────────────────────────────────────────────────────────────────
// Wire-former fra backend (tolerante: serveren sender ofte bare kjernefeltene)
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AssessmentIn {
    risk_color: RiskColor,
    confidence: f64,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    next_steps: Option<Vec<String>>,
    #[serde(default)]
    organ: Option<OrganIn>,
}

#[derive(Debug, Default, Deserialize)]
struct OrganIn {
    #[serde(default)]
    heart: Option<HeartStatus>,
    #[serde(default)]
    kidney: Option<String>,
    #[serde(default)]
    sleep: Option<SleepStatus>,
}

impl AssessmentIn {
    /// Fyll ut det serveren ikke sendte fra lokale regler for samme entry.
    fn complete(self, entry: &HealthEntry) -> RiskAssessment {
        let local_organ = organ_summary(entry);
        let organ = self.organ.unwrap_or_default();

        let mut reasons = self.reasons;
        reasons.truncate(MAX_REASONS);

        let mut next_steps = self
            .next_steps
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| next_steps_for(self.risk_color));
        next_steps.truncate(MAX_NEXT_STEPS);

        let confidence = if self.confidence.is_finite() {
            self.confidence.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        RiskAssessment {
            risk_color: self.risk_color,
            confidence,
            reasons,
            next_steps,
            organ: OrganSummary {
                heart: organ.heart.unwrap_or(local_organ.heart),
                kidney: organ.kidney.unwrap_or(local_organ.kidney),
                sleep: organ.sleep.unwrap_or(local_organ.sleep),
            },
        }
    }
}

/// Delvis dagsinnslag fra /sync/google-fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncedMetrics {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub steps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub heart_rate_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub toilet_freq: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub alcohol: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub smoking: bool,
}

impl SyncedMetrics {
    /// Kopier feltene dagsinnslaget kjenner. Flagg fra synk overstyrer aldri
    /// et flagg brukeren selv har satt, og snittpuls fyller bare tom hvilepuls.
    pub fn apply_to(&self, entry: &mut HealthEntry) {
        if self.steps.is_some() {
            entry.steps = self.steps;
        }
        entry.alcohol |= self.alcohol;
        entry.smoking |= self.smoking;
        if entry.resting_hr.is_none() {
            entry.resting_hr = self.heart_rate_avg;
        }
    }
}

fn decode_error(e: spte::Error<serde_json::Error>) -> ScoreError {
    ScoreError::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    }
}

fn parse_body(body: &str) -> Result<Value, ScoreError> {
    serde_json::from_str(body).map_err(|e| ScoreError::Decode {
        path: ".".into(),
        message: e.to_string(),
    })
}

/// `{"error": ...}` med 2xx er fortsatt en feil, aldri et resultat.
fn reject_error_payload(status: u16, value: &Value) -> Result<(), ScoreError> {
    match value.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(s)) => Err(ScoreError::Api { status, message: s.clone() }),
        Some(other) => Err(ScoreError::Api { status, message: other.to_string() }),
    }
}

pub(crate) fn decode_assessment(
    status: u16,
    body: &str,
    entry: &HealthEntry,
) -> Result<RiskAssessment, ScoreError> {
    let value = parse_body(body)?;
    reject_error_payload(status, &value)?;
    let wire: AssessmentIn = spte::deserialize(value).map_err(decode_error)?;
    Ok(wire.complete(entry))
}

/// Klient mot AstraSync-backend – enkel blocking-versjon (ureq)
pub struct RemoteScorer {
    agent: Agent,
    base_url: String,
}

impl RemoteScorer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn from_config(cfg: &ClientConfig, host: &str) -> Result<Self, ScoreError> {
        let base = cfg.api_base_for_host(host).ok_or(ScoreError::NotConfigured)?;
        Ok(Self::new(base, cfg.timeout()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read_response(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<(u16, String), ScoreError> {
        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| ScoreError::Transport(e.to_string()))?;
                Ok((status, body))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let text = resp
                    .into_string()
                    .unwrap_or_else(|e| format!("unreadable error body: {e}"));
                log::error!("API Error: {}", text);
                Err(ScoreError::Api { status, message: text })
            }
            Err(ureq::Error::Transport(t)) => Err(ScoreError::Transport(t.to_string())),
        }
    }

    fn post_json<T: Serialize>(&self, path: &str, payload: &T) -> Result<(u16, String), ScoreError> {
        let result = self
            .agent
            .post(&self.url(path))
            .set("Content-Type", "application/json")
            .send_json(payload);
        self.read_response(result)
    }

    fn get_json(&self, path: &str) -> Result<(u16, String), ScoreError> {
        let result = self.agent.get(&self.url(path)).call();
        self.read_response(result)
    }

    /// GET /sync/google-fit
    pub fn sync_google_fit(&self) -> Result<SyncedMetrics, ScoreError> {
        let (status, body) = self.get_json("/sync/google-fit")?;
        let value = parse_body(&body)?;
        reject_error_payload(status, &value)?;
        let synced: SyncedMetrics = spte::deserialize(value).map_err(decode_error)?;
        log::debug!(
            "[sync] google-fit date={:?} steps={:?}",
            synced.date,
            synced.steps
        );
        Ok(synced)
    }
}

impl Scorer for RemoteScorer {
    fn name(&self) -> &str {
        "remote"
    }

    /// POST /score
    fn score(&self, entry: &HealthEntry) -> Result<RiskAssessment, ScoreError> {
        let (status, body) = self.post_json("/score", entry)?;
        let assessment = decode_assessment(status, &body, entry)?;
        log::debug!(
            "[score] {} => {} ({}%)",
            self.base_url,
            assessment.risk_color,
            assessment.confidence
        );
        Ok(assessment)
    }
}
