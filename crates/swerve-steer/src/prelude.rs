//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use swerve_steer::prelude::*;
//! ```

// 控制器与构造
pub use crate::builder::SteerControllerBuilder;
pub use crate::controller::SteerController;

// 配置
pub use crate::config::{ResyncPolicy, SteerConfig, SteerSettings};

// 硬件接口（常用 Trait）
pub use crate::hardware::{AbsoluteEncoder, PositionCommand, SteerMotor};

// 仿真
pub use crate::sim::SimulatedMechanism;

// 单位
pub use crate::units::{Deg, Rad, RadPerSecond};

// 错误类型
pub use crate::error::{BuildError, ConfigError, SteerError};
