//! 转向轴配置
//!
//! 分两层：
//!
//! - [`SteerConfig`]：可序列化的原始配置（TOML 文件），字段贴近物理含义
//! - [`SteerSettings`]：校验后的控制器参数（弧度/tick 标定系数、同步策略）
//!
//! 校验只在构造时进行一次，控制周期内不再检查。
//!
//! # 配置文件示例
//!
//! ```toml
//! nominal_voltage = 12.0
//!
//! [calibration]
//! ticks_per_rotation = 2048.0
//! steer_reduction = 0.046666666666666666
//! velocity_rate_multiplier = 10.0
//!
//! [resync]
//! max_angular_velocity_deg = 0.5
//! iterations = 500
//!
//! [motion_profile]
//! velocity_constant = 0.0107
//! acceleration_constant = 0.0
//! static_constant = 0.0
//! ```

use crate::error::ConfigError;
use crate::units::{Deg, RadPerSecond};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fs;
use std::path::Path;

/// 电机内部传感器每圈 tick 数
pub const DEFAULT_TICKS_PER_ROTATION: f64 = 2048.0;

/// 速度采样倍率：传感器速度单位为 tick / 100ms
pub const DEFAULT_VELOCITY_RATE_MULTIPLIER: f64 = 10.0;

/// 触发同步所需的连续静止周期数
pub const DEFAULT_RESYNC_ITERATIONS: u32 = 500;

/// 静止判定阈值（°/s）
pub const DEFAULT_RESYNC_MAX_ANGULAR_VELOCITY_DEG: f64 = 0.5;

/// 转向轴配置（原始形式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SteerConfig {
    /// 标称电压（V），仅用于运动规划增益换算
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_voltage: Option<f64>,

    /// 标定参数
    pub calibration: CalibrationConfig,

    /// 静止同步策略
    #[serde(default)]
    pub resync: ResyncConfig,

    /// 运动规划参数；存在即启用运动规划位置命令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_profile: Option<MotionProfileConfig>,
}

/// 标定参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// 每圈 tick 数
    #[serde(default = "default_ticks_per_rotation")]
    pub ticks_per_rotation: f64,

    /// 转向减速比（轮子转角 / 电机转角）
    pub steer_reduction: f64,

    /// 速度单位换算倍率
    #[serde(default = "default_velocity_rate_multiplier")]
    pub velocity_rate_multiplier: f64,
}

/// 静止同步参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResyncConfig {
    /// 静止判定阈值（°/s）
    #[serde(default = "default_resync_max_angular_velocity_deg")]
    pub max_angular_velocity_deg: f64,

    /// 连续静止周期数
    #[serde(default = "default_resync_iterations")]
    pub iterations: u32,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            max_angular_velocity_deg: DEFAULT_RESYNC_MAX_ANGULAR_VELOCITY_DEG,
            iterations: DEFAULT_RESYNC_ITERATIONS,
        }
    }
}

/// 运动规划参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionProfileConfig {
    /// 速度常数
    pub velocity_constant: f64,
    /// 加速度常数
    pub acceleration_constant: f64,
    /// 静摩擦常数
    pub static_constant: f64,
}

fn default_ticks_per_rotation() -> f64 {
    DEFAULT_TICKS_PER_ROTATION
}

fn default_velocity_rate_multiplier() -> f64 {
    DEFAULT_VELOCITY_RATE_MULTIPLIER
}

fn default_resync_max_angular_velocity_deg() -> f64 {
    DEFAULT_RESYNC_MAX_ANGULAR_VELOCITY_DEG
}

fn default_resync_iterations() -> u32 {
    DEFAULT_RESYNC_ITERATIONS
}

impl SteerConfig {
    /// 使用默认标定创建配置
    ///
    /// # 参数
    ///
    /// - `steer_reduction`: 转向减速比
    pub fn new(steer_reduction: f64) -> Self {
        Self {
            nominal_voltage: None,
            calibration: CalibrationConfig {
                ticks_per_rotation: DEFAULT_TICKS_PER_ROTATION,
                steer_reduction,
                velocity_rate_multiplier: DEFAULT_VELOCITY_RATE_MULTIPLIER,
            },
            resync: ResyncConfig::default(),
            motion_profile: None,
        }
    }

    /// 启用运动规划
    pub fn with_motion_profile(
        mut self,
        velocity_constant: f64,
        acceleration_constant: f64,
        static_constant: f64,
    ) -> Self {
        self.motion_profile = Some(MotionProfileConfig {
            velocity_constant,
            acceleration_constant,
            static_constant,
        });
        self
    }

    /// 设置标称电压
    pub fn with_nominal_voltage(mut self, nominal_voltage: f64) -> Self {
        self.nominal_voltage = Some(nominal_voltage);
        self
    }

    /// 设置同步策略
    pub fn with_resync(mut self, max_angular_velocity_deg: f64, iterations: u32) -> Self {
        self.resync = ResyncConfig {
            max_angular_velocity_deg,
            iterations,
        };
        self
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 是否启用运动规划
    pub fn has_motion_profile(&self) -> bool {
        self.motion_profile.is_some()
    }

    /// 校验并换算为控制器参数
    pub fn validate(&self) -> Result<SteerSettings, ConfigError> {
        let calibration = &self.calibration;
        if !calibration.ticks_per_rotation.is_finite() || calibration.ticks_per_rotation <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                param: "calibration.ticks_per_rotation".to_string(),
                reason: format!("{} (must be finite and > 0)", calibration.ticks_per_rotation),
            });
        }
        if !calibration.velocity_rate_multiplier.is_finite()
            || calibration.velocity_rate_multiplier <= 0.0
        {
            return Err(ConfigError::InvalidParameter {
                param: "calibration.velocity_rate_multiplier".to_string(),
                reason: format!(
                    "{} (must be finite and > 0)",
                    calibration.velocity_rate_multiplier
                ),
            });
        }
        check_scale("calibration.steer_reduction", calibration.steer_reduction)?;

        if let Some(profile) = &self.motion_profile {
            for (param, value) in [
                ("motion_profile.velocity_constant", profile.velocity_constant),
                ("motion_profile.acceleration_constant", profile.acceleration_constant),
                ("motion_profile.static_constant", profile.static_constant),
            ] {
                if !value.is_finite() {
                    return Err(ConfigError::InvalidParameter {
                        param: param.to_string(),
                        reason: format!("{} (must be finite)", value),
                    });
                }
            }
        }

        match self.nominal_voltage {
            Some(voltage) if !voltage.is_finite() || voltage <= 0.0 => {
                return Err(ConfigError::InvalidParameter {
                    param: "nominal_voltage".to_string(),
                    reason: format!("{} (must be finite and > 0)", voltage),
                });
            },
            None if self.has_motion_profile() => {
                // 上游没有给出缺省电压时的换算规则，这里不猜测
                tracing::warn!(
                    "Motion profile configured without nominal_voltage; velocity gain compensation is left to the motor setup layer"
                );
            },
            _ => {},
        }

        let resync = ResyncPolicy::new(
            Deg(self.resync.max_angular_velocity_deg),
            self.resync.iterations,
        )?;

        let position_scale =
            TAU / calibration.ticks_per_rotation * calibration.steer_reduction;
        let velocity_scale = position_scale * calibration.velocity_rate_multiplier;

        Ok(SteerSettings::from_scales(position_scale, velocity_scale, self.has_motion_profile())?
            .with_resync(resync))
    }
}

fn check_scale(param: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value == 0.0 {
        return Err(ConfigError::InvalidCalibration { param, value });
    }
    Ok(())
}

/// 静止同步策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResyncPolicy {
    /// 角速度绝对值低于此值视为静止
    pub max_angular_velocity: RadPerSecond,
    /// 连续静止多少个周期后触发同步
    pub iterations: u32,
}

impl ResyncPolicy {
    /// 创建同步策略
    ///
    /// 阈值必须为有限正数，周期数必须大于 0。
    pub fn new(max_angular_velocity: Deg, iterations: u32) -> Result<Self, ConfigError> {
        if !max_angular_velocity.0.is_finite() || max_angular_velocity.0 <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                param: "resync.max_angular_velocity_deg".to_string(),
                reason: format!("{} (must be finite and > 0)", max_angular_velocity.0),
            });
        }
        if iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                param: "resync.iterations".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(Self {
            max_angular_velocity: RadPerSecond::from_deg_per_sec(max_angular_velocity.0),
            iterations,
        })
    }
}

impl Default for ResyncPolicy {
    fn default() -> Self {
        Self {
            max_angular_velocity: RadPerSecond::from_deg_per_sec(
                DEFAULT_RESYNC_MAX_ANGULAR_VELOCITY_DEG,
            ),
            iterations: DEFAULT_RESYNC_ITERATIONS,
        }
    }
}

/// 校验后的控制器参数
///
/// 构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteerSettings {
    position_scale: f64,
    velocity_scale: f64,
    use_motion_profile: bool,
    resync: ResyncPolicy,
}

impl SteerSettings {
    /// 直接由标定系数构造
    ///
    /// # 参数
    ///
    /// - `position_scale`: 每 tick 对应的轮子转角（rad），含减速比
    /// - `velocity_scale`: 每速度单位对应的角速度（rad/s）
    /// - `use_motion_profile`: 是否使用运动规划位置命令
    ///
    /// 两个系数都必须是有限非零值。
    pub fn from_scales(
        position_scale: f64,
        velocity_scale: f64,
        use_motion_profile: bool,
    ) -> Result<Self, ConfigError> {
        check_scale("position_scale", position_scale)?;
        check_scale("velocity_scale", velocity_scale)?;
        Ok(Self {
            position_scale,
            velocity_scale,
            use_motion_profile,
            resync: ResyncPolicy::default(),
        })
    }

    /// 替换同步策略
    pub fn with_resync(mut self, resync: ResyncPolicy) -> Self {
        self.resync = resync;
        self
    }

    /// 每 tick 对应的弧度
    #[inline]
    pub fn position_scale(&self) -> f64 {
        self.position_scale
    }

    /// 每速度单位对应的 rad/s
    #[inline]
    pub fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }

    /// 是否使用运动规划位置命令
    #[inline]
    pub fn use_motion_profile(&self) -> bool {
        self.use_motion_profile
    }

    /// 同步策略
    #[inline]
    pub fn resync(&self) -> ResyncPolicy {
        self.resync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
nominal_voltage = 12.0

[calibration]
steer_reduction = 0.05

[resync]
iterations = 250

[motion_profile]
velocity_constant = 0.01
acceleration_constant = 0.002
static_constant = 0.0
"#;

    #[test]
    fn test_parse_sample_with_defaults() {
        let config = SteerConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.nominal_voltage, Some(12.0));
        assert_eq!(config.calibration.ticks_per_rotation, 2048.0);
        assert_eq!(config.calibration.velocity_rate_multiplier, 10.0);
        assert_eq!(config.resync.iterations, 250);
        assert_eq!(config.resync.max_angular_velocity_deg, 0.5);
        assert!(config.has_motion_profile());
    }

    #[test]
    fn test_validate_derives_scales() {
        let settings = SteerConfig::from_toml_str(SAMPLE).unwrap().validate().unwrap();

        let expected = TAU / 2048.0 * 0.05;
        assert!((settings.position_scale() - expected).abs() < 1e-15);
        assert!((settings.velocity_scale() - expected * 10.0).abs() < 1e-15);
        assert!(settings.use_motion_profile());
        assert_eq!(settings.resync().iterations, 250);
        assert!(
            (settings.resync().max_angular_velocity.0 - 0.5_f64.to_radians()).abs() < 1e-15
        );
    }

    #[test]
    fn test_minimal_config() {
        let config = SteerConfig::from_toml_str("[calibration]\nsteer_reduction = 0.1\n").unwrap();
        let settings = config.validate().unwrap();

        assert!(!settings.use_motion_profile());
        assert_eq!(settings.resync(), ResyncPolicy::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SteerConfig::from_toml_str(
            "[calibration]\nsteer_reduction = 0.1\nsteer_ratio = 2.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_reduction_rejected() {
        let err = SteerConfig::from_toml_str("[calibration]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let err = SteerConfig::new(0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCalibration {
                param: "calibration.steer_reduction",
                ..
            }
        ));

        let err = SteerConfig::new(f64::NAN).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCalibration { .. }));

        let mut config = SteerConfig::new(0.05);
        config.calibration.ticks_per_rotation = -1.0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_invalid_resync_rejected() {
        let err = SteerConfig::new(0.05).with_resync(0.5, 0).validate().unwrap_err();
        assert!(format!("{}", err).contains("resync.iterations"));

        let err = SteerConfig::new(0.05).with_resync(-1.0, 10).validate().unwrap_err();
        assert!(format!("{}", err).contains("max_angular_velocity_deg"));
    }

    #[test]
    fn test_invalid_motion_profile_rejected() {
        let err = SteerConfig::new(0.05)
            .with_motion_profile(f64::INFINITY, 0.0, 0.0)
            .validate()
            .unwrap_err();
        assert!(format!("{}", err).contains("velocity_constant"));
    }

    #[test]
    fn test_invalid_nominal_voltage_rejected() {
        let err = SteerConfig::new(0.05).with_nominal_voltage(0.0).validate().unwrap_err();
        assert!(format!("{}", err).contains("nominal_voltage"));
    }

    #[test]
    fn test_motion_profile_without_voltage_is_accepted() {
        let settings = SteerConfig::new(0.05)
            .with_motion_profile(0.01, 0.0, 0.0)
            .validate()
            .unwrap();
        assert!(settings.use_motion_profile());
    }

    #[test]
    fn test_from_scales_rejects_non_finite() {
        assert!(SteerSettings::from_scales(f64::NAN, 1.0, false).is_err());
        assert!(SteerSettings::from_scales(1.0, f64::INFINITY, false).is_err());
        assert!(SteerSettings::from_scales(0.0, 1.0, false).is_err());
        assert!(SteerSettings::from_scales(1.0, 10.0, true).is_ok());
    }

    #[test]
    fn test_serialize_roundtrip_through_toml() {
        let config = SteerConfig::new(0.05).with_motion_profile(0.01, 0.0, 0.0);
        let text = toml::to_string(&config).unwrap();
        let parsed = SteerConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
