//! 配置文件加载测试

use std::io::Write;
use swerve_steer::config::SteerConfig;
use swerve_steer::error::ConfigError;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
nominal_voltage = 12.0

[calibration]
ticks_per_rotation = 2048.0
steer_reduction = 0.046666666666666666
velocity_rate_multiplier = 10.0

[resync]
max_angular_velocity_deg = 1.0
iterations = 100

[motion_profile]
velocity_constant = 0.0107
acceleration_constant = 0.0
static_constant = 0.0
"#,
    );

    let config = SteerConfig::load(file.path()).unwrap();
    let settings = config.validate().unwrap();

    assert!(settings.use_motion_profile());
    assert_eq!(settings.resync().iterations, 100);
    assert!(
        (settings.position_scale() - std::f64::consts::TAU / 2048.0 * 0.046666666666666666).abs()
            < 1e-15
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SteerConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_malformed_file() {
    let file = write_config("[calibration\nsteer_reduction = ");
    let err = SteerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(format!("{}", err).starts_with("Failed to parse config"));
}

#[test]
fn test_voltage_after_table_is_rejected() {
    // 顶层键写在表之后会落入 motion_profile 表，被 deny_unknown_fields 拒绝
    let file = write_config(
        r#"
[calibration]
steer_reduction = 0.05

[motion_profile]
velocity_constant = 0.01
acceleration_constant = 0.0
static_constant = 0.0
nominal_voltage = 12.0
"#,
    );
    assert!(matches!(
        SteerConfig::load(file.path()).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[test]
fn test_load_then_validate_rejects_zero_reduction() {
    let file = write_config("[calibration]\nsteer_reduction = 0.0\n");
    let config = SteerConfig::load(file.path()).unwrap();
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidCalibration { .. }
    ));
}

#[test]
fn test_bundled_sample_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/steer.toml");
    let config = SteerConfig::load(path).unwrap();

    let settings = config.validate().unwrap();
    assert!(settings.use_motion_profile());
    assert_eq!(settings.resync().iterations, 500);
}
