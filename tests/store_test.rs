//! Integration tests: the analysis store on a real temp directory.

mod common;

use std::fs;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use game_stats::advanced_analysis;
use insights_service::fetcher::classify_record;
use insights_service::report::{AnalysisResult, ANALYSIS_VERSION};
use insights_service::AnalysisStore;
use serde_json::json;

const TTL: Duration = Duration::from_secs(4 * 60 * 60);

fn sample_result() -> AnalysisResult {
    let games: Vec<_> = (0..3)
        .filter_map(|n| classify_record(&common::white_win("tester", n), "tester"))
        .collect();
    AnalysisResult {
        username: "tester".to_string(),
        player_info: json!({"username": "tester"}),
        player_stats: None,
        advanced_stats: advanced_analysis(&games),
        total_analyzed: games.len(),
        games,
        analysis_timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        analysis_version: ANALYSIS_VERSION.to_string(),
    }
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = common::temp_dir("store_roundtrip");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let result = sample_result();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let saved = store.save_at(&result, now).unwrap();
    assert_eq!(saved.analysis_id, format!("tester_{}", now.timestamp()));
    assert_eq!(saved.expires_at, now + chrono::Duration::hours(4));

    let loaded = store
        .load_at(&saved.analysis_id, now + chrono::Duration::hours(3))
        .unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.analysis, result);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_after_ttl_is_absent_and_deletes() {
    let dir = common::temp_dir("store_expiry");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let saved = store.save_at(&sample_result(), now).unwrap();
    let path = dir.join(format!("{}.json", saved.analysis_id));
    assert!(path.exists());

    let later = now + chrono::Duration::hours(4) + chrono::Duration::seconds(1);
    assert!(store.load_at(&saved.analysis_id, later).is_none());
    assert!(!path.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_same_second_saves_get_distinct_ids() {
    let dir = common::temp_dir("store_collision");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let now = Utc::now();
    let result = sample_result();

    let first = store.save_at(&result, now).unwrap();
    let second = store.save_at(&result, now).unwrap();
    assert_ne!(first.analysis_id, second.analysis_id);
    assert_eq!(second.analysis_id, format!("{}_1", first.analysis_id));
    assert_eq!(store.info().unwrap().entry_count, 2);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_writers_sharing_a_directory_never_share_an_id() {
    let dir = common::temp_dir("store_shared");
    let first_store = AnalysisStore::open(&dir, TTL).unwrap();
    let second_store = AnalysisStore::open(&dir, TTL).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let result = sample_result();

    // an id already claimed by another writer, still empty
    let claimed = format!("tester_{}", now.timestamp());
    fs::write(dir.join(format!("{claimed}.json")), "").unwrap();

    let first = first_store.save_at(&result, now).unwrap();
    let second = second_store.save_at(&result, now).unwrap();
    assert_eq!(first.analysis_id, format!("{claimed}_1"));
    assert_eq!(second.analysis_id, format!("{claimed}_2"));
    assert!(second_store.load_at(&first.analysis_id, now).is_some());
    assert!(first_store.load_at(&second.analysis_id, now).is_some());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_sweep_removes_orphaned_temp_files() {
    let dir = common::temp_dir("store_orphans");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let orphan = dir.join("tester_1.json.tmp");
    fs::write(&orphan, "{").unwrap();

    assert_eq!(store.sweep().unwrap(), 0);
    assert!(orphan.exists());
    assert_eq!(store.info().unwrap().entry_count, 0);

    let later = Utc::now() + chrono::Duration::hours(5);
    store.sweep_at(later).unwrap();
    assert!(!orphan.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_corrupt_and_invalid_ids() {
    let dir = common::temp_dir("store_bad");
    let store = AnalysisStore::open(&dir, TTL).unwrap();

    assert!(store.load("nobody_1").is_none());
    fs::write(dir.join("broken_1.json"), "{not json").unwrap();
    assert!(store.load("broken_1").is_none());
    assert!(store.load("../outside").is_none());
    assert!(store.delete("../outside").is_err());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_sweep_removes_only_expired_entries() {
    let dir = common::temp_dir("store_sweep");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let old = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let fresh = old + chrono::Duration::hours(3);
    let result = sample_result();

    store.save_at(&result, old).unwrap();
    let kept = store.save_at(&result, fresh).unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let now = old + chrono::Duration::hours(5);
    assert_eq!(store.sweep_at(now).unwrap(), 1);
    assert_eq!(store.sweep_at(now).unwrap(), 0);

    let info = store.info().unwrap();
    assert_eq!(info.entry_count, 1);
    assert!(info.total_size > 0);
    assert!(store.load_at(&kept.analysis_id, now).is_some());
    assert!(dir.join("notes.txt").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_delete() {
    let dir = common::temp_dir("store_delete");
    let store = AnalysisStore::open(&dir, TTL).unwrap();
    let saved = store.save(&sample_result()).unwrap();

    assert!(store.delete(&saved.analysis_id).unwrap());
    assert!(!store.delete(&saved.analysis_id).unwrap());
    assert!(store.load(&saved.analysis_id).is_none());

    fs::remove_dir_all(&dir).unwrap();
}
