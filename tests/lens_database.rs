use polylens::error::LensDatabaseError;
use polylens::lenses::database::{builtin, LensDatabase, DOUBLE_GAUSS_50MM};
use polylens::lenses::OpticalSample;
use std::fs;
use std::path::Path;

const VALID: &str = r#"{
    "name": "Wide 24mm",
    "focal_length": 24.0,
    "max_fstop": 1.4,
    "polynomial_degree": 1,
    "sensor_diagonal": 30.0,
    "coefficients": { "basis": "graded5", "exit_pupil_x": [0.0, 1.0, 0.0, 24.0], "exit_pupil_y": [0.0, 0.0, 1.0, 0.0, 24.0] }
}"#;

#[test]
fn directory_should_load_valid_lenses_and_skip_broken_ones() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wide_24mm.json"), VALID).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
    fs::write(dir.path().join("no_degree.json"), VALID.replace("\"polynomial_degree\": 1", "\"polynomial_degree\": 0")).unwrap();

    let database = LensDatabase::load(dir.path());
    assert_eq!(database.path(), Some(dir.path()));
    assert!(database.file("broken").is_none());
    assert!(database.contains("wide_24mm"));

    let lens = database.get("wide_24mm").unwrap();
    assert_eq!(lens.constants.name, "Wide 24mm");
    assert_eq!(lens.constants.fstop_min, 1.4);
    assert_eq!(lens.constants.sensor_diagonal, 30.0);
    let out = lens.evaluate(&OpticalSample::new(1.0, 1.0, 0.5, 0.0, 0.55));
    assert!((out.x - 13.0).abs() < 1e-5);

    assert!(matches!(database.get("no_degree"), Err(LensDatabaseError::Invalid { .. })));
    assert!(matches!(database.get("broken"), Err(LensDatabaseError::NotFound(_))));

    let ids: Vec<String> = database.lens_list().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["double_gauss_50mm", "no_degree", "wide_24mm"]);
}

#[test]
fn validate_should_report_every_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wide_24mm.json"), VALID).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("no_degree.json"), VALID.replace("\"polynomial_degree\": 1", "\"polynomial_degree\": 0")).unwrap();
    fs::write(dir.path().join("huge.json"), VALID.replace("\"polynomial_degree\": 1", "\"polynomial_degree\": 4294967295")).unwrap();
    fs::write(dir.path().join("no_basis.json"), VALID.replace("\"basis\": \"graded5\", ", "")).unwrap();

    let database = LensDatabase::load(dir.path());
    let report = database.validate();
    assert!(!report.is_ok());
    assert_eq!(report.valid, vec!["double_gauss_50mm", "wide_24mm"]);

    let invalid: Vec<&str> = report.invalid.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(invalid, vec!["broken", "huge", "no_basis", "no_degree"]);
    assert!(matches!(report.invalid[0].1, LensDatabaseError::Json { .. }));
    assert!(matches!(report.invalid[1].1, LensDatabaseError::Invalid { .. }));
    assert!(matches!(report.invalid[2].1, LensDatabaseError::Json { .. }));
    assert!(matches!(report.invalid[3].1, LensDatabaseError::Invalid { .. }));
}

#[test]
fn search_should_find_lenses_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let with_metadata = VALID.replace("\"sensor_diagonal\"", "\"metadata\": { \"manufacturer\": \"Nikon\" },\n    \"sensor_diagonal\"");
    fs::write(dir.path().join("wide_24mm.json"), with_metadata).unwrap();

    let database = LensDatabase::load(dir.path());
    let hits: Vec<String> = database.search("nikon").into_iter().map(|(id, _)| id).collect();
    assert_eq!(hits, vec!["wide_24mm"]);
    assert_eq!(database.search("double").len(), 1);
    assert!(database.search("leica").is_empty());
}

#[test]
fn missing_directory_should_leave_builtin_lenses() {
    let dir = tempfile::tempdir().unwrap();
    let database = LensDatabase::load(dir.path().join("missing"));
    assert_eq!(database.len(), 1);
    assert!(database.get(DOUBLE_GAUSS_50MM).is_ok());
}

#[test]
fn shipped_lens_file_should_match_builtin() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("lenses");
    let database = LensDatabase::load(&dir);
    let from_file = database.get(DOUBLE_GAUSS_50MM).unwrap();
    let reference = builtin(DOUBLE_GAUSS_50MM).unwrap();

    assert_eq!(from_file.constants, reference.constants);
    for &(x, y, dx, dy) in [(0.0, 0.0, 0.0, 0.0), (3.0, -2.0, 0.1, 0.2), (-10.0, 7.5, -0.25, 0.05)].iter() {
        let sample = OpticalSample::new(x, y, dx, dy, 0.6);
        let a = from_file.evaluate(&sample);
        let b = reference.evaluate(&sample);
        assert!((a.x - b.x).abs() < 1e-4, "{} vs {}", a.x, b.x);
        assert!((a.y - b.y).abs() < 1e-4);
        assert!((a.dx - b.dx).abs() < 1e-6);
        assert!((a.dy - b.dy).abs() < 1e-6);
    }
}
