//! File loading through `ProfileLoader`.

use std::io::Write;

use personality_knot_bench::{BenchError, ProfileLoader};
use personality_knot_core::Dimension;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_profile_file_with_bad_records() {
    let file = write_temp(
        r#"{"profiles": [
            {"user_id": "u1", "dimensions": {"openness": 0.8, "curiosity": 0.6}, "created_at": "2024-03-01"},
            {"user_id": "u2", "dimensions": {"openness": null}},
            {"user_id": "u3", "dimensions": {"openness": -0.2}},
            {"user_id": 4, "dimensions": {"openness": 0.3}},
            {"user_id": "u1", "dimensions": {"openness": 0.1}}
        ]}"#,
    );
    let report = ProfileLoader::load_profiles(file.path()).unwrap();

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.rejected_count(), 3);
    assert_eq!(report.items[0].value(Dimension::Openness), Some(0.8));
    assert!(report.items[0].created_at().is_some());
    assert_eq!(report.items[1].id(), "4");

    let rejected: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
    assert_eq!(rejected, vec![1, 2, 4]);
}

#[test]
fn test_label_file() {
    let file = write_temp(
        r#"[{"user_a": "u1", "user_b": "u2", "is_compatible": true, "compatibility_score": 0.8},
            {"id_a": "u1", "id_b": "u3", "is_compatible": false, "compatibility_score": 1.7},
            {"id_a": "u2", "is_compatible": false, "compatibility_score": 0.2}]"#,
    );
    let report = ProfileLoader::load_labels(file.path()).unwrap();
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.rejected_count(), 2);
    assert_eq!(report.items[0].id_b, "u2");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProfileLoader::load_profiles(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BenchError::Io { .. }));
}

#[test]
fn test_scalar_document_unsupported() {
    let file = write_temp("42");
    assert!(matches!(
        ProfileLoader::load_profiles(file.path()),
        Err(BenchError::UnsupportedFormat { .. })
    ));
}
