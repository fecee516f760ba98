//! Builder 模式实现
//!
//! 校验配置，创建控制器，并在创建时用绝对值编码器初始化电机传感器偏置。

use crate::config::{SteerConfig, SteerSettings};
use crate::controller::SteerController;
use crate::error::{BuildError, ConfigError};
use crate::hardware::{AbsoluteEncoder, SteerMotor};

/// 转向控制器 Builder
///
/// # Example
///
/// ```no_run
/// # use swerve_steer::config::SteerConfig;
/// # use swerve_steer::builder::SteerControllerBuilder;
/// # use swerve_steer::sim::SimulatedMechanism;
/// let config = SteerConfig::new(7.0 / 150.0);
/// let mechanism = SimulatedMechanism::new(config.validate().unwrap());
///
/// let controller = SteerControllerBuilder::from_config(&config)
///     .unwrap()
///     .build(mechanism.motor(), mechanism.encoder())
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SteerControllerBuilder {
    settings: SteerSettings,
    seed_on_build: bool,
}

impl SteerControllerBuilder {
    /// 由已校验的参数创建
    pub fn new(settings: SteerSettings) -> Self {
        Self {
            settings,
            seed_on_build: true,
        }
    }

    /// 由原始配置创建（会先校验）
    pub fn from_config(config: &SteerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.validate()?))
    }

    /// 构造时是否用绝对值编码器初始化电机传感器（默认开启）
    pub fn seed_on_build(mut self, seed: bool) -> Self {
        self.seed_on_build = seed;
        self
    }

    /// 创建控制器
    ///
    /// 开启初始同步时，会执行一次 [`SteerController::resync`]。
    pub fn build<M, E>(
        self,
        motor: M,
        encoder: E,
    ) -> Result<SteerController<M, E>, BuildError<M::Error, E::Error>>
    where
        M: SteerMotor,
        E: AbsoluteEncoder,
    {
        let mut controller = SteerController::new(motor, encoder, self.settings);

        if self.seed_on_build {
            let absolute = controller.resync().map_err(BuildError::Seed)?;
            tracing::info!(
                "Steer sensor seeded from absolute encoder: {}",
                absolute.to_deg()
            );
        }

        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::PositionCommand;
    use crate::units::Rad;
    use std::io;

    #[derive(Debug, Default)]
    struct OffsetMotor {
        offsets: Vec<f64>,
    }

    impl SteerMotor for OffsetMotor {
        type Error = io::Error;

        fn position_ticks(&mut self) -> Result<i64, io::Error> {
            Ok(0)
        }

        fn velocity_ticks(&mut self) -> Result<i64, io::Error> {
            Ok(0)
        }

        fn command_position(&mut self, _command: PositionCommand) -> Result<(), io::Error> {
            Ok(())
        }

        fn override_sensor_offset(&mut self, ticks: f64) -> Result<(), io::Error> {
            self.offsets.push(ticks);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Encoder(Result<f64, ()>);

    impl AbsoluteEncoder for Encoder {
        type Error = io::Error;

        fn absolute_angle(&mut self) -> Result<Rad, io::Error> {
            self.0
                .map(Rad)
                .map_err(|_| io::Error::other("encoder not ready"))
        }
    }

    fn settings() -> SteerSettings {
        SteerSettings::from_scales(0.5, 5.0, false).unwrap()
    }

    #[test]
    fn test_build_seeds_sensor() {
        let controller = SteerControllerBuilder::new(settings())
            .build(OffsetMotor::default(), Encoder(Ok(1.0)))
            .unwrap();

        // 1.0 rad / 0.5 rad·tick⁻¹ = 2 tick
        assert_eq!(controller.motor().offsets, vec![2.0]);
        assert_eq!(controller.resync_counter(), 0);
    }

    #[test]
    fn test_build_without_seed() {
        let controller = SteerControllerBuilder::new(settings())
            .seed_on_build(false)
            .build(OffsetMotor::default(), Encoder(Err(())))
            .unwrap();

        assert!(controller.motor().offsets.is_empty());
    }

    #[test]
    fn test_build_seed_failure() {
        let err = SteerControllerBuilder::new(settings())
            .build(OffsetMotor::default(), Encoder(Err(())))
            .unwrap_err();

        assert!(matches!(err, BuildError::Seed(_)));
        assert!(format!("{}", err).contains("encoder not ready"));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let err = SteerControllerBuilder::from_config(&SteerConfig::new(f64::NAN)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCalibration { .. }));
    }
}
