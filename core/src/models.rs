use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{lenient_f64, lenient_u32, HealthEntry};

/// Brukerprofil slik den lagres under `astrasync_profile`.
///
/// Profilen er fritt formet fra skjemaet; kjente felt tolkes, resten
/// bevares uendret i `extra` slik at ingenting går tapt ved lagring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// cm
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// kg
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub resting_hr: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        *self == Profile::default()
    }
}

/// Ett innslag i dagsloggen: dato + målingene for dagen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub entry: HealthEntry,
}

impl LogEntry {
    pub fn new(date: NaiveDate, entry: HealthEntry) -> Self {
        Self { date, entry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_keeps_unknown_keys() {
        let raw = json!({"name": "Kari", "age": "34", "goal": "10k steps"});
        let p: Profile = serde_json::from_value(raw).unwrap();
        assert_eq!(p.age, Some(34));
        assert_eq!(p.extra.get("goal"), Some(&json!("10k steps")));

        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["goal"], "10k steps");
        assert_eq!(back["age"], 34);
    }

    #[test]
    fn log_entry_is_flat_on_the_wire() {
        let raw = json!({"date": "2026-02-12", "steps": 8000, "alcohol": 0});
        let log: LogEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(log.date, NaiveDate::from_ymd_opt(2026, 2, 12).unwrap());
        assert_eq!(log.entry.steps, Some(8000.0));

        let back = serde_json::to_value(&log).unwrap();
        assert_eq!(back["date"], "2026-02-12");
        assert_eq!(back["steps"], 8000.0);
    }
}
