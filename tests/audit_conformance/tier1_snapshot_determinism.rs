//! Snapshot determinism and canonical serialization
//!
//! Identical structural state must serialize to identical bytes, across
//! repeated calls, across independently built registrars, and across a
//! trip through the filesystem.

use crate::common::*;
use tenet::{checksum, verify_checksum};

#[test]
fn repeated_serialization_is_byte_identical() {
    for mode in BOTH_MODES {
        let r = registrar_with(mode, &mixed_sequence());
        let first = to_canonical_string(&take_snapshot(&r)).unwrap();
        let second = to_canonical_string(&take_snapshot(&r)).unwrap();
        assert_eq!(first, second, "mode {mode}");
    }
}

#[test]
fn independent_builds_serialize_identically() {
    for mode in BOTH_MODES {
        let left = registrar_with(mode, &mixed_sequence());
        let right = registrar_with(mode, &mixed_sequence());
        assert_eq!(
            to_canonical_string(&take_snapshot(&left)).unwrap(),
            to_canonical_string(&take_snapshot(&right)).unwrap(),
            "mode {mode}"
        );
    }
}

#[test]
fn serialized_snapshot_round_trips_at_schema_level() {
    for mode in BOTH_MODES {
        let snapshot = take_snapshot(&registrar_with(mode, &mixed_sequence()));
        let canonical = to_canonical_string(&snapshot).unwrap();
        assert_eq!(parse_snapshot(&canonical).unwrap(), snapshot, "mode {mode}");
    }
}

#[test]
fn snapshot_reflects_replacement_and_ordering() {
    let r = registrar_with(EngineMode::Native, &mixed_sequence());
    let snapshot = take_snapshot(&r);

    // A was re-registered at index 1, B at index 3; refusals left nothing
    assert_eq!(
        snapshot.state_ids,
        vec![StateId::new("A"), StateId::new("B")]
    );
    assert_eq!(snapshot.ordering.assigned[&StateId::new("A")], 1);
    assert_eq!(snapshot.ordering.assigned[&StateId::new("B")], 3);
    assert_eq!(snapshot.ordering.max_index, 3);
    assert_eq!(
        snapshot.lineage[&StateId::new("A")],
        Some(StateId::new("A"))
    );
    assert_eq!(snapshot.version, "1.0");
    assert!(!snapshot.state_ids.iter().any(StateId::is_empty));
}

#[test]
fn snapshot_is_a_pure_read() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &mixed_sequence());
        let before = to_canonical_string(&take_snapshot(&r)).unwrap();
        take_snapshot(&r);
        take_snapshot(&r);
        assert_eq!(r.state_count(), 2, "mode {mode}");
        assert_eq!(r.next_index(), 4);

        // The registrar keeps judging normally afterwards
        assert!(r.register(&root("C")).is_accepted());
        assert_ne!(to_canonical_string(&take_snapshot(&r)).unwrap(), before);
    }
}

#[test]
fn canonical_text_survives_the_filesystem() {
    for mode in BOTH_MODES {
        let snapshot = take_snapshot(&registrar_with(mode, &mixed_sequence()));
        let canonical = to_canonical_string(&snapshot).unwrap();
        let sum = checksum(&canonical);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.snapshot");
        std::fs::write(&path, &canonical).unwrap();
        let read_back = std::fs::read_to_string(&path).unwrap();

        assert!(verify_checksum(&read_back, sum), "mode {mode}");
        assert_eq!(parse_snapshot(&read_back).unwrap(), snapshot);

        let rebuilt = rehydrate(&read_back, &RehydrateOptions::new(mode)).unwrap();
        assert_eq!(
            to_canonical_string(&take_snapshot(&rebuilt)).unwrap(),
            canonical
        );
    }
}

#[test]
fn checksum_detects_single_byte_corruption() {
    let snapshot = take_snapshot(&registrar_with(EngineMode::Native, &mixed_sequence()));
    let canonical = to_canonical_string(&snapshot).unwrap();
    let sum = checksum(&canonical);

    let corrupted = canonical.replacen("\"A\"", "\"Z\"", 1);
    assert_ne!(canonical, corrupted);
    assert!(!verify_checksum(&corrupted, sum));
}

#[test]
fn empty_registrar_snapshots_canonically() {
    for mode in BOTH_MODES {
        let snapshot = take_snapshot(&registrar(mode));
        assert!(snapshot.state_ids.is_empty());
        assert_eq!(snapshot.ordering.max_index, -1);
        let canonical = to_canonical_string(&snapshot).unwrap();
        assert_eq!(parse_snapshot(&canonical).unwrap(), snapshot, "mode {mode}");
    }
}
