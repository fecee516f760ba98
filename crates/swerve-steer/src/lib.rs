//! # Swerve Steer
//!
//! 舵轮（swerve drive）转向轴控制器。
//!
//! 把 `[0, 2π)` 上的目标轮子航向转换为电机闭环位置命令。电机内部传感器的累计
//! 转角无界，控制器负责：
//!
//! - **角度展开**：在累计角所在的那一圈里找到等价目标，并总是走较短的一侧
//! - **静止同步**：轮子连续静止一段时间后，用绝对值编码器覆盖电机传感器偏置
//!
//! ## 模块
//!
//! - `units`: 强类型单位（`Rad`、`Deg`、`RadPerSecond`）
//! - `hardware`: 电机/绝对值编码器协作接口
//! - `config`: 配置文件与校验后的控制器参数
//! - `unwrap`: 角度展开算法
//! - `controller`: 转向轴控制器
//! - `builder`: 带初始同步的控制器构造
//! - `telemetry`: 遥测快照
//! - `loop_runner`: 固定频率控制循环
//! - `sim`: 仿真硬件
//!
//! ## 快速开始
//!
//! ```rust
//! use swerve_steer::prelude::*;
//!
//! let config = SteerConfig::new(7.0 / 150.0);
//! let mechanism = SimulatedMechanism::new(config.validate().unwrap())
//!     .with_initial_heading(Rad(0.3));
//!
//! let mut controller = SteerControllerBuilder::from_config(&config)
//!     .unwrap()
//!     .build(mechanism.motor(), mechanism.encoder())
//!     .unwrap();
//!
//! controller.request_heading(Rad(1.2)).unwrap();
//! assert_eq!(controller.last_requested_heading(), Rad(1.2));
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod loop_runner;
pub mod sim;
pub mod telemetry;
pub mod units;
pub mod unwrap;

pub mod prelude;

// 重新导出常用类型
pub use builder::SteerControllerBuilder;
pub use config::{ResyncPolicy, SteerConfig, SteerSettings};
pub use controller::SteerController;
pub use error::{BuildError, ConfigError, LoopError, SteerError};
pub use hardware::{AbsoluteEncoder, PositionCommand, SteerMotor};
pub use telemetry::SteerSnapshot;
pub use units::{Deg, Rad, RadPerSecond};
