use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Én dags loggede helsemålinger.
///
/// Alle målefelt er valgfrie: et felt som mangler utløser aldri en regel.
/// Tall aksepteres også som tekst ("128"), og `null`/`""` betyr "ikke målt".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub bp_sys: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub bp_dia: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub spo2_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub screen_time_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub alcohol: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub smoking: bool,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub resting_hr: Option<f64>,
}

/// Grov risikoklasse. Rekkefølgen (Green < Yellow < Red) brukes av varslingsterskelen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskColor {
    Green,
    Yellow,
    Red,
}

impl RiskColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskColor::Green => "Green",
            RiskColor::Yellow => "Yellow",
            RiskColor::Red => "Red",
        }
    }
}

impl fmt::Display for RiskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartStatus {
    Elevated,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepStatus {
    #[serde(rename = "At risk")]
    AtRisk,
    Normal,
}

/// Heuristiske flagg per organsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganSummary {
    pub heart: HeartStatus,
    /// Ingen nyresignal i input – alltid plassholderteksten.
    pub kidney: String,
    pub sleep: SleepStatus,
}

/// Resultatet av én scoring (lokal eller fra /score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_color: RiskColor,
    /// 55–95 for lokal heuristikk
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub next_steps: Vec<String>,
    pub organ: OrganSummary,
}

// ──────────────────────────────────────────────────────────────────────────────
// Tolerante feltparsere (skjemaer sender tall som tekst, backend sender 0/1 for flagg)
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberIn {
    Num(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagIn {
    Flag(bool),
    Num(f64),
    Text(String),
    Other(IgnoredAny),
}

fn parse_number_text(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Tall, talltekst, `null` eller `""`. Uleselig tekst og andre JSON-typer
/// (bool, objekt, liste) tolkes som "ikke målt".
pub(crate) fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberIn>::deserialize(de)? {
        Some(NumberIn::Num(v)) => Some(v),
        Some(NumberIn::Text(s)) => parse_number_text(&s),
        Some(NumberIn::Other(_)) | None => None,
    })
}

/// Som `lenient_f64`, men for heltall ≥ 0 (alder o.l.).
pub(crate) fn lenient_u32<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(de)?
        .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32))
}

/// `true/false`, `0/1`, `"yes"`/`"true"`/`"1"`; `null`, objekt og liste = false.
pub(crate) fn lenient_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagIn>::deserialize(de)? {
        Some(FlagIn::Flag(b)) => b,
        Some(FlagIn::Num(v)) => v != 0.0 && !v.is_nan(),
        Some(FlagIn::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Some(FlagIn::Other(_)) | None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_absent() {
        let e: HealthEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(e, HealthEntry::default());
    }

    #[test]
    fn numbers_as_text_and_flags_as_ints() {
        let e: HealthEntry = serde_json::from_str(
            r#"{"bp_sys":"142","bp_dia":" 88 ","spo2_avg":"","steps":null,"alcohol":1,"smoking":0}"#,
        )
        .unwrap();
        assert_eq!(e.bp_sys, Some(142.0));
        assert_eq!(e.bp_dia, Some(88.0));
        assert_eq!(e.spo2_avg, None);
        assert_eq!(e.steps, None);
        assert!(e.alcohol);
        assert!(!e.smoking);
    }

    #[test]
    fn garbage_text_counts_as_not_measured() {
        let e: HealthEntry = serde_json::from_str(r#"{"sleep_hours":"lots"}"#).unwrap();
        assert_eq!(e.sleep_hours, None);
    }

    #[test]
    fn wrong_json_types_degrade_to_absent() {
        let e: HealthEntry = serde_json::from_str(
            r#"{"bp_sys":true,"sleep_hours":{},"steps":[1],"alcohol":{"x":1},"smoking":[true]}"#,
        )
        .unwrap();
        assert_eq!(e, HealthEntry::default());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let e = HealthEntry { bp_sys: Some(120.0), ..Default::default() };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["bp_sys"], 120.0);
        assert!(v.get("spo2_avg").is_none());
        assert_eq!(v["alcohol"], false);
    }

    #[test]
    fn risk_color_ordering_and_wire_names() {
        assert!(RiskColor::Green < RiskColor::Yellow);
        assert!(RiskColor::Yellow < RiskColor::Red);
        assert_eq!(serde_json::to_string(&SleepStatus::AtRisk).unwrap(), "\"At risk\"");
        assert_eq!(RiskColor::Red.to_string(), "Red");
    }
}
