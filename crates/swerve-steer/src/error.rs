//! 错误类型体系
//!
//! 按来源分层：
//!
//! - [`ConfigError`]：构造期的标定/配置错误，只在构造时检查，不在每个控制周期检查
//! - [`SteerError`]：控制周期内的错误，电机/编码器错误原样透传
//! - [`BuildError`]：构造控制器时的错误（配置错误或初始同步失败）
//! - [`LoopError`]：控制循环的错误
//!
//! 控制器本身不重试：过期的控制命令重发并不安全，下一个控制周期会覆盖它。

use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 标定系数无效（非有限值或为零）
    #[error("Invalid calibration '{param}': {value} (must be finite and non-zero)")]
    InvalidCalibration {
        /// 参数名
        param: &'static str,
        /// 实际值
        value: f64,
    },

    /// 参数无效
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// 参数名
        param: String,
        /// 原因
        reason: String,
    },

    /// 配置文件读取失败
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 控制周期错误
///
/// `M` / `E` 分别是电机和绝对值编码器的错误类型。
#[derive(Debug, Error)]
pub enum SteerError<M, E> {
    /// 电机通信失败
    #[error("Steer motor error: {0}")]
    Motor(#[source] M),

    /// 绝对值编码器通信失败
    #[error("Absolute encoder error: {0}")]
    Encoder(#[source] E),

    /// 目标航向不是有限值
    #[error("Requested heading is not finite: {0}")]
    NonFiniteTarget(f64),
}

impl<M, E> SteerError<M, E> {
    /// 是否为硬件通信错误
    ///
    /// 调用方据此决定跳过本周期还是停止该转向轴。
    pub fn is_hardware(&self) -> bool {
        matches!(self, SteerError::Motor(_) | SteerError::Encoder(_))
    }
}

/// 控制器构造错误
#[derive(Debug, Error)]
pub enum BuildError<M, E> {
    /// 配置无效
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 初始同步失败
    #[error("Initial sensor seed failed: {0}")]
    Seed(#[source] SteerError<M, E>),
}

/// 控制循环错误
#[derive(Debug, Error)]
pub enum LoopError<M, E> {
    /// 控制频率无效
    #[error("Invalid frequency_hz: {0} (must be finite and > 0)")]
    InvalidFrequency(f64),

    /// 控制周期失败
    #[error(transparent)]
    Steer(#[from] SteerError<M, E>),
}
