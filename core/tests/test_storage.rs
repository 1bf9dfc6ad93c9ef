// core/tests/test_storage.rs
use astrasync_core::storage::{LOGS_KEY, PROFILE_KEY};
use astrasync_core::{
    today_iso, FileBackend, HealthEntry, HealthRepository, KeyValueBackend, LogEntry,
    MemoryBackend, Profile, StoreError, MAX_LOGS,
};
use chrono::{Duration, NaiveDate};
use serde_json::json;
use std::fs;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(n)
}

fn log_for(n: i64) -> LogEntry {
    LogEntry::new(
        day(n),
        HealthEntry {
            steps: Some(1000.0 * n as f64),
            ..Default::default()
        },
    )
}

#[test]
fn profile_roundtrip_through_files() {
    let dir = "tests/tmp_store_profile";
    let _ = fs::remove_dir_all(dir);

    let mut profile: Profile = serde_json::from_value(json!({
        "user_id": "demo_user",
        "name": "Kari",
        "age": 41,
        "height": "172",
        "weight": 68.5,
        "goal": "sleep 7h"
    }))
    .unwrap();
    profile.resting_hr = Some(58.0);

    let mut repo = HealthRepository::new(FileBackend::new(dir));
    repo.save_profile(&profile).expect("save_profile feilet");

    // Les tilbake med et nytt repo over samme katalog
    let loaded = HealthRepository::new(FileBackend::new(dir))
        .load_profile()
        .expect("load_profile feilet");

    assert_eq!(loaded, profile);
    assert_eq!(loaded.height, Some(172.0));
    assert_eq!(loaded.extra.get("goal"), Some(&json!("sleep 7h")));
    assert!(fs::metadata(format!("{dir}/{PROFILE_KEY}.json")).is_ok());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_profile_and_logs_load_defaults() {
    let dir = "tests/tmp_store_missing";
    let _ = fs::remove_dir_all(dir);

    let repo = HealthRepository::new(FileBackend::new(dir));
    let profile = repo.load_profile().expect("load_profile");
    assert!(profile.is_empty());
    assert!(repo.load_logs().expect("load_logs").is_empty());
}

#[test]
fn add_log_keeps_newest_first_and_caps_at_60() {
    let mut repo = HealthRepository::new(MemoryBackend::new());

    let mut last_len = 0;
    for n in 1..=65 {
        last_len = repo.add_log(log_for(n)).expect("add_log");
    }
    assert_eq!(last_len, MAX_LOGS);

    let logs = repo.load_logs().unwrap();
    assert_eq!(logs.len(), 60);
    assert_eq!(logs[0].date, day(65), "nyeste skal ligge først");
    assert_eq!(logs[59].date, day(6), "eldste fem skal være kastet");
    assert_eq!(logs[0].entry.steps, Some(65000.0));
}

#[test]
fn save_logs_truncates_oversized_input() {
    let mut repo = HealthRepository::new(MemoryBackend::new());
    let logs: Vec<LogEntry> = (0..75).rev().map(log_for).collect();
    repo.save_logs(&logs).unwrap();

    let loaded = repo.load_logs().unwrap();
    assert_eq!(loaded.len(), MAX_LOGS);
    assert_eq!(loaded[0].date, day(74));
}

#[test]
fn recent_logs_takes_the_head() {
    let mut repo = HealthRepository::new(MemoryBackend::new());
    for n in 0..20 {
        repo.add_log(log_for(n)).unwrap();
    }
    let recent = repo.recent_logs(14).unwrap();
    assert_eq!(recent.len(), 14);
    assert_eq!(recent[0].date, day(19));
    assert_eq!(recent[13].date, day(6));

    assert_eq!(repo.recent_logs(100).unwrap().len(), 20);
}

#[test]
fn corrupt_json_is_an_error_not_a_reset() {
    let mut backend = MemoryBackend::new();
    backend.set(LOGS_KEY, "[{not json").unwrap();
    let repo = HealthRepository::new(backend);

    match repo.load_logs() {
        Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, LOGS_KEY),
        other => panic!("forventet Corrupt, fikk {other:?}"),
    }
}

#[test]
fn empty_stored_value_counts_as_absent() {
    let mut backend = MemoryBackend::new();
    backend.set(PROFILE_KEY, "").unwrap();
    backend.set(LOGS_KEY, "  ").unwrap();
    let repo = HealthRepository::new(backend);

    assert!(repo.load_profile().unwrap().is_empty());
    assert!(repo.load_logs().unwrap().is_empty());
}

#[test]
fn logs_on_disk_are_plain_json_with_dates() {
    let dir = "tests/tmp_store_logs";
    let _ = fs::remove_dir_all(dir);

    let mut repo = HealthRepository::new(FileBackend::new(dir));
    repo.add_log(log_for(1)).unwrap();
    repo.add_log(log_for(2)).unwrap();

    let raw = fs::read_to_string(format!("{dir}/{LOGS_KEY}.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["date"], "2026-01-03");
    assert_eq!(v[1]["date"], "2026-01-02");
    assert_eq!(v[0]["steps"], 2000.0);
    assert!(v[0].get("spo2_avg").is_none(), "fraværende felt skal ikke skrives");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn today_iso_is_a_plain_date() {
    let s = today_iso();
    assert_eq!(s.len(), 10);
    assert!(NaiveDate::parse_from_str(&s, "%Y-%m-%d").is_ok());
}
