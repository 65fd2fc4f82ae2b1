use std::sync::Mutex;

use tempfile::NamedTempFile;

use pan_tracker::config::TrackdConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "TRACKD_CONFIG",
        "TRACKD_SOURCE",
        "TRACKD_SERIAL_PORT",
        "TRACKD_SERIAL_BAUD",
        "TRACKD_LABELS",
        "TRACKD_MIN_CONFIDENCE",
        "TRACKD_LEFT_THRESHOLD",
        "TRACKD_RIGHT_THRESHOLD",
        "TRACKD_TARGET_FPS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "source": "captures/backyard.jsonl",
        "serial": {
            "port": "/dev/ttyACM0",
            "baud": 115200
        },
        "detector": {
            "labels": ["person"],
            "min_confidence": 0.7
        },
        "tracking": {
            "left_threshold": 0.4,
            "right_threshold": 0.6,
            "target_fps": 15
        },
        "frame": {
            "width": 1280,
            "height": 720
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("TRACKD_CONFIG", file.path());
    std::env::set_var("TRACKD_LABELS", "person, dog");
    std::env::set_var("TRACKD_MIN_CONFIDENCE", "0.85");

    let cfg = TrackdConfig::load().expect("load config");

    assert_eq!(cfg.source, "captures/backyard.jsonl");
    assert_eq!(cfg.serial.port, "/dev/ttyACM0");
    assert_eq!(cfg.serial.baud, 115200);
    assert_eq!(cfg.labels, vec!["person", "dog"]);
    assert_eq!(cfg.min_confidence, 0.85);
    assert_eq!(cfg.left_threshold, 0.4);
    assert_eq!(cfg.right_threshold, 0.6);
    assert_eq!(cfg.target_fps, 15);
    assert_eq!(cfg.frame_width, 1280);
    assert_eq!(cfg.frame_height, 720);

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = TrackdConfig::load().expect("load defaults");

    assert_eq!(cfg.source, "stub://walker");
    assert_eq!(cfg.serial.port, "stub://actuator");
    assert_eq!(cfg.serial.baud, 9600);
    assert_eq!(cfg.labels, vec!["person", "dog"]);
    assert_eq!(cfg.min_confidence, 0.8);
    assert_eq!(cfg.left_threshold, 0.425);
    assert_eq!(cfg.right_threshold, 0.575);

    clear_env();
}

#[test]
fn degenerate_thresholds_are_fatal_not_corrected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("TRACKD_LEFT_THRESHOLD", "0.6");
    std::env::set_var("TRACKD_RIGHT_THRESHOLD", "0.4");
    assert!(TrackdConfig::load().is_err());

    clear_env();
}

#[test]
fn empty_label_list_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{"detector": {"labels": []}}"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("TRACKD_CONFIG", file.path());

    assert!(TrackdConfig::load().is_err());

    clear_env();
}

#[test]
fn out_of_range_confidence_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("TRACKD_MIN_CONFIDENCE", "1.5");
    assert!(TrackdConfig::load().is_err());

    clear_env();
}
