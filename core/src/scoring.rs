use serde_path_to_error as spte;

use crate::error::ScoreError;
use crate::types::{HealthEntry, HeartStatus, OrganSummary, RiskAssessment, RiskColor, SleepStatus};

pub const MAX_REASONS: usize = 3;
pub const MAX_NEXT_STEPS: usize = 3;

pub const CONFIDENCE_FLOOR: u32 = 55;
pub const CONFIDENCE_CEIL: u32 = 95;
const CONFIDENCE_PER_POINT: u32 = 8;

pub const RED_FROM: u32 = 6;
pub const YELLOW_FROM: u32 = 3;

pub const KIDNEY_PLACEHOLDER: &str = "Needs labs (optional)";

const GREEN_STEPS: [&str; 3] = [
    "Maintain routine and log daily",
    "Walk 20–30 min today",
    "Sleep target: 7+ hours",
];

const YELLOW_STEPS: [&str; 3] = [
    "Recheck BP twice daily for 3 days",
    "Hydrate and reduce screen time tonight",
    "If symptoms, consult a doctor",
];

const RED_STEPS: [&str; 3] = [
    "Consult doctor soon for confirmation",
    "Enter/Upload lab values (eGFR/ACR if available)",
    "Avoid heavy exertion; rest and monitor",
];

/// Én utløst regel: poeng + forklaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit {
    pub points: u32,
    pub reason: &'static str,
}

const fn hit(points: u32, reason: &'static str) -> Option<RuleHit> {
    Some(RuleHit { points, reason })
}

// Manglende verdi oppfyller aldri en terskel (samme som NaN).
#[inline]
fn at_least(v: Option<f64>, limit: f64) -> bool {
    matches!(v, Some(x) if x >= limit)
}

#[inline]
fn below(v: Option<f64>, limit: f64) -> bool {
    matches!(v, Some(x) if x < limit)
}

#[inline]
fn above(v: Option<f64>, limit: f64) -> bool {
    matches!(v, Some(x) if x > limit)
}

/// SpO₂ som faktisk er målt. 0 og NaN betyr "ikke målt", ikke "0 %".
pub fn measured_spo2(entry: &HealthEntry) -> Option<f64> {
    entry.spo2_avg.filter(|v| *v != 0.0 && !v.is_nan())
}

fn rule_blood_pressure(e: &HealthEntry) -> Option<RuleHit> {
    if at_least(e.bp_sys, 160.0) || at_least(e.bp_dia, 100.0) {
        hit(3, "BP very high")
    } else if at_least(e.bp_sys, 140.0) || at_least(e.bp_dia, 90.0) {
        hit(2, "BP trending high")
    } else {
        None
    }
}

fn rule_spo2(e: &HealthEntry) -> Option<RuleHit> {
    let spo2 = measured_spo2(e);
    if below(spo2, 90.0) {
        hit(3, "Low SpO₂ dips")
    } else if below(spo2, 94.0) {
        hit(2, "SpO₂ slightly low")
    } else {
        None
    }
}

fn rule_sleep(e: &HealthEntry) -> Option<RuleHit> {
    if below(e.sleep_hours, 4.0) {
        hit(3, "Very low sleep")
    } else if below(e.sleep_hours, 5.0) {
        hit(2, "Sleep deficit")
    } else {
        None
    }
}

fn rule_activity(e: &HealthEntry) -> Option<RuleHit> {
    if below(e.steps, 2000.0) { hit(1, "Very low activity") } else { None }
}

fn rule_screen_time(e: &HealthEntry) -> Option<RuleHit> {
    if above(e.screen_time_min, 360.0) { hit(1, "High screen time") } else { None }
}

fn rule_alcohol(e: &HealthEntry) -> Option<RuleHit> {
    if e.alcohol { hit(1, "Alcohol use logged") } else { None }
}

fn rule_smoking(e: &HealthEntry) -> Option<RuleHit> {
    if e.smoking { hit(2, "Smoking increases risk") } else { None }
}

/// Alle regler, i fast evalueringsrekkefølge. Rekkefølgen styrer hvilke
/// forklaringer som overlever kuttet til tre.
const RULES: [fn(&HealthEntry) -> Option<RuleHit>; 7] = [
    rule_blood_pressure,
    rule_spo2,
    rule_sleep,
    rule_activity,
    rule_screen_time,
    rule_alcohol,
    rule_smoking,
];

/// Evaluer hver regel nøyaktig én gang og returner treffene i regelrekkefølge.
pub fn evaluate_rules(entry: &HealthEntry) -> Vec<RuleHit> {
    RULES.iter().filter_map(|rule| rule(entry)).collect()
}

/// Summen av poeng. Ingen eksplisitt tak (typisk 0–14).
pub fn total_score(entry: &HealthEntry) -> u32 {
    evaluate_rules(entry).iter().map(|h| h.points).sum()
}

/// Klasse ut fra poengsum, vurdert fra høy til lav.
pub fn tier_for(score: u32) -> RiskColor {
    if score >= RED_FROM {
        RiskColor::Red
    } else if score >= YELLOW_FROM {
        RiskColor::Yellow
    } else {
        RiskColor::Green
    }
}

/// min(95, 55 + 8·score) – lineær, aldri under 55.
pub fn confidence_for(score: u32) -> u8 {
    let c = CONFIDENCE_FLOOR
        .saturating_add(score.saturating_mul(CONFIDENCE_PER_POINT))
        .min(CONFIDENCE_CEIL);
    c as u8
}

/// Faste anbefalinger per klasse (alltid tre).
pub fn next_steps_for(color: RiskColor) -> Vec<String> {
    let steps = match color {
        RiskColor::Green => &GREEN_STEPS,
        RiskColor::Yellow => &YELLOW_STEPS,
        RiskColor::Red => &RED_STEPS,
    };
    steps.iter().take(MAX_NEXT_STEPS).map(|s| s.to_string()).collect()
}

pub fn organ_summary(entry: &HealthEntry) -> OrganSummary {
    let heart = if at_least(entry.bp_sys, 140.0) || at_least(entry.resting_hr, 90.0) {
        HeartStatus::Elevated
    } else {
        HeartStatus::Normal
    };

    let sleep = if below(entry.sleep_hours, 6.0) || below(measured_spo2(entry), 94.0) {
        SleepStatus::AtRisk
    } else {
        SleepStatus::Normal
    };

    OrganSummary {
        heart,
        kidney: KIDNEY_PLACEHOLDER.to_string(),
        sleep,
    }
}

/// Heuristisk risikoscore for én dag. Ren og total: ingen feil, ingen tilstand.
pub fn score_entry(entry: &HealthEntry) -> RiskAssessment {
    let hits = evaluate_rules(entry);
    let score: u32 = hits.iter().map(|h| h.points).sum();
    let risk_color = tier_for(score);

    log::debug!(
        "score_entry: {} regel(er) utløst, score={} => {}",
        hits.len(),
        score,
        risk_color
    );

    RiskAssessment {
        risk_color,
        confidence: confidence_for(score),
        reasons: hits
            .iter()
            .take(MAX_REASONS)
            .map(|h| h.reason.to_string())
            .collect(),
        next_steps: next_steps_for(risk_color),
        organ: organ_summary(entry),
    }
}

/// JSON inn → JSON ut. Samme form som /score, brukt av Python-bindingen.
pub fn score_entry_json(json_in: &str) -> Result<String, ScoreError> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    let entry: HealthEntry = spte::deserialize(&mut de).map_err(|e| ScoreError::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })?;

    serde_json::to_string(&score_entry(&entry)).map_err(|e| ScoreError::Decode {
        path: ".".into(),
        message: e.to_string(),
    })
}
