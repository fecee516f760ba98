//! Loop Runner - 固定频率控制循环
//!
//! 每个周期调用一次 [`SteerController::request_heading`]，用 `spin_sleep`
//! 低抖动休眠到下一个周期。
//!
//! # 周期超时
//!
//! 某个周期被调度延迟时不追赶：下一次调用直接读取最新的传感器数据，
//! 截止时间从当前时刻重新计算，并记一次 overrun。
//!
//! # 使用场景
//!
//! ```rust,no_run
//! use swerve_steer::loop_runner::{run_steering_loop, LoopConfig};
//! # use swerve_steer::config::SteerConfig;
//! # use swerve_steer::builder::SteerControllerBuilder;
//! # use swerve_steer::sim::SimulatedMechanism;
//! # use swerve_steer::units::Rad;
//! # let config = SteerConfig::new(0.05);
//! # let mechanism = SimulatedMechanism::new(config.validate().unwrap());
//! # let mut controller = SteerControllerBuilder::from_config(&config).unwrap()
//! #     .build(mechanism.motor(), mechanism.encoder()).unwrap();
//! let config = LoopConfig {
//!     frequency_hz: 50.0,
//!     max_iterations: Some(500),
//! };
//!
//! let stats = run_steering_loop(&mut controller, |_| Some(Rad(1.0)), &config, None).unwrap();
//! println!("{} iterations, {} resyncs", stats.iterations, stats.resyncs);
//! ```

use crate::controller::SteerController;
use crate::error::LoopError;
use crate::hardware::{AbsoluteEncoder, SteerMotor};
use crate::units::Rad;
use spin_sleep::SpinSleeper;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 控制循环配置
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// 控制频率（Hz）
    ///
    /// 例如：50.0 表示 50Hz（20ms 周期）
    pub frequency_hz: f64,

    /// 最大迭代次数（None 表示无限循环）
    pub max_iterations: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 50.0,
            max_iterations: None,
        }
    }
}

/// 控制循环统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// 已完成的周期数
    pub iterations: usize,
    /// 超出周期的次数
    pub overruns: usize,
    /// 循环期间触发的同步次数
    pub resyncs: u64,
}

/// 运行转向控制循环
///
/// 阻塞直到：
/// - 发生错误（原样返回，不重试）
/// - `targets` 返回 `None`
/// - 达到 `max_iterations`
/// - `stop` 被置位
///
/// # 参数
///
/// - `controller`: 转向控制器
/// - `targets`: 按周期序号给出目标航向；也可以在这里推进仿真
/// - `config`: 循环配置
/// - `stop`: 可选的停止标志（如 Ctrl+C 处理器设置）
pub fn run_steering_loop<M, E, F>(
    controller: &mut SteerController<M, E>,
    mut targets: F,
    config: &LoopConfig,
    stop: Option<&AtomicBool>,
) -> Result<LoopStats, LoopError<M::Error, E::Error>>
where
    M: SteerMotor,
    E: AbsoluteEncoder,
    F: FnMut(usize) -> Option<Rad>,
{
    if !config.frequency_hz.is_finite() || config.frequency_hz <= 0.0 {
        return Err(LoopError::InvalidFrequency(config.frequency_hz));
    }
    // 频率过低时周期超出 Duration 的表示范围
    let period = Duration::try_from_secs_f64(1.0 / config.frequency_hz)
        .map_err(|_| LoopError::InvalidFrequency(config.frequency_hz))?;
    if config.frequency_hz > 1000.0 {
        tracing::warn!(
            "Very high steering loop frequency: {} Hz. Motor status frames may lag behind.",
            config.frequency_hz
        );
    }

    let sleeper = SpinSleeper::default();
    let resyncs_before = controller.resync_total();

    let mut stats = LoopStats::default();
    let mut deadline = Instant::now() + period;

    loop {
        if let Some(max_iter) = config.max_iterations
            && stats.iterations >= max_iter
        {
            break;
        }
        if let Some(stop) = stop
            && stop.load(Ordering::Relaxed)
        {
            tracing::info!("Steering loop stopped after {} iterations", stats.iterations);
            break;
        }

        let Some(target) = targets(stats.iterations) else {
            break;
        };

        controller.request_heading(target)?;
        stats.iterations += 1;

        let now = Instant::now();
        if now < deadline {
            sleeper.sleep(deadline - now);
            deadline += period;
        } else {
            stats.overruns += 1;
            tracing::debug!(
                "Steering loop overrun by {:?} at iteration {}",
                now - deadline,
                stats.iterations
            );
            deadline = now + period;
        }
    }

    stats.resyncs = controller.resync_total() - resyncs_before;
    Ok(stats)
}
