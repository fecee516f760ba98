//! 转向轴控制器
//!
//! 每个控制周期调用一次 [`SteerController::request_heading`]：
//!
//! 1. 读取电机累计位置，换算为累计角
//! 2. 静止检测：连续 N 个周期角速度低于阈值时，用绝对值编码器重新同步电机传感器
//! 3. 把 `[0, 2π)` 上的目标航向展开到累计角所在的那一圈，并走最短路径
//! 4. 换算回 tick 并下发位置命令
//!
//! # 周期性同步
//!
//! 上电时绝对值编码器偶尔尚未就绪，初始同步可能读到错误值。同步只在
//! 轮子静止时发生，运动中的周期不会覆盖传感器偏置。
//!
//! # 线程模型
//!
//! 同步、单线程，不阻塞、不挂起。每个实例独占自己的电机/编码器句柄，
//! 不需要加锁。

use crate::config::SteerSettings;
use crate::error::SteerError;
use crate::hardware::{AbsoluteEncoder, PositionCommand, SteerMotor};
use crate::telemetry::SteerSnapshot;
use crate::units::{Rad, RadPerSecond};
use crate::unwrap::unwrap_target;

/// 控制周期错误的简写
pub type SteerResult<T, M, E> =
    Result<T, SteerError<<M as SteerMotor>::Error, <E as AbsoluteEncoder>::Error>>;

/// 转向轴控制器
///
/// `M` 为电机句柄，`E` 为绝对值编码器句柄。两者都可以是 `&mut T`，
/// 控制器并不管理它们的生命周期。
#[derive(Debug)]
pub struct SteerController<M, E> {
    motor: M,
    encoder: E,
    settings: SteerSettings,

    /// 最近一次请求的航向（未展开）
    reference_angle: Rad,

    /// 连续静止周期计数
    resync_counter: u32,

    /// 累计同步次数
    resync_total: u64,
}

impl<M, E> SteerController<M, E>
where
    M: SteerMotor,
    E: AbsoluteEncoder,
{
    /// 创建控制器
    ///
    /// 不访问硬件。需要初始同步时使用
    /// [`SteerControllerBuilder`](crate::builder::SteerControllerBuilder)。
    pub fn new(motor: M, encoder: E, settings: SteerSettings) -> Self {
        Self {
            motor,
            encoder,
            settings,
            reference_angle: Rad::ZERO,
            resync_counter: 0,
            resync_total: 0,
        }
    }

    /// 请求新的轮子航向
    ///
    /// # 参数
    ///
    /// - `target`: 目标航向，通常在 `[0, 2π)`，任意有限值均可
    ///
    /// # 错误
    ///
    /// - `NonFiniteTarget`: 目标不是有限值，不访问硬件
    /// - `Motor` / `Encoder`: 硬件错误原样返回，本周期剩余步骤不执行，
    ///   `last_requested_heading()` 保持不变
    pub fn request_heading(&mut self, target: Rad) -> SteerResult<(), M, E> {
        if !target.is_finite() {
            return Err(SteerError::NonFiniteTarget(target.0));
        }

        let mut current = self.running_angle().map_err(SteerError::Motor)?;

        let velocity = self.angular_velocity().map_err(SteerError::Motor)?;
        if velocity.abs() < self.settings.resync().max_angular_velocity {
            // 同步失败时计数停在阈值，下一个静止周期重试
            self.resync_counter = self
                .resync_counter
                .saturating_add(1)
                .min(self.settings.resync().iterations);
            if self.resync_counter >= self.settings.resync().iterations {
                // 传感器刚被覆盖，本周期直接使用已知的绝对角
                current = self.resync()?;
            }
        } else {
            self.resync_counter = 0;
        }

        let unwrapped = unwrap_target(target, current);
        let command = PositionCommand::new(
            unwrapped.0 / self.settings.position_scale(),
            self.settings.use_motion_profile(),
        );
        self.motor.command_position(command).map_err(SteerError::Motor)?;

        self.reference_angle = target;
        Ok(())
    }

    /// 用绝对值编码器重新同步电机传感器
    ///
    /// 读取绝对角，换算为 tick 写入电机的传感器偏置寄存器（一次性覆盖，
    /// 不是闭环修正），并清零静止计数。返回写入后电机应报告的累计角，
    /// 调用方直接使用它而无需再次读取电机。
    pub fn resync(&mut self) -> SteerResult<Rad, M, E> {
        let absolute = self.encoder.absolute_angle().map_err(SteerError::Encoder)?;
        let offset_ticks = absolute.0 / self.settings.position_scale();
        self.motor
            .override_sensor_offset(offset_ticks)
            .map_err(SteerError::Motor)?;
        self.resync_counter = 0;
        self.resync_total += 1;

        tracing::debug!(
            absolute = absolute.0,
            offset_ticks,
            "Steer sensor resynchronized from absolute encoder"
        );
        Ok(absolute)
    }

    /// 当前航向，范围 `[0, 2π)`
    ///
    /// 只读，不影响控制器状态。
    pub fn current_heading(&mut self) -> Result<Rad, M::Error> {
        Ok(self.running_angle()?.wrap_positive())
    }

    /// 最近一次请求的航向（原值，未展开）
    #[inline]
    pub fn last_requested_heading(&self) -> Rad {
        self.reference_angle
    }

    /// 当前连续静止周期数
    #[inline]
    pub fn resync_counter(&self) -> u32 {
        self.resync_counter
    }

    /// 累计同步次数（含构造时的初始同步）
    #[inline]
    pub fn resync_total(&self) -> u64 {
        self.resync_total
    }

    /// 控制器参数
    #[inline]
    pub fn settings(&self) -> &SteerSettings {
        &self.settings
    }

    /// 采集一次遥测快照
    pub fn snapshot(&mut self) -> SteerResult<SteerSnapshot, M, E> {
        let state_angle = self.current_heading().map_err(SteerError::Motor)?;
        let absolute_angle = self.encoder.absolute_angle().map_err(SteerError::Encoder)?;
        Ok(SteerSnapshot {
            reference_angle: self.reference_angle,
            state_angle,
            absolute_angle,
            resync_counter: self.resync_counter,
        })
    }

    /// 电机句柄
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// 电机句柄（可变）
    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    /// 编码器句柄
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// 编码器句柄（可变）
    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    /// 拆出硬件句柄
    pub fn into_parts(self) -> (M, E) {
        (self.motor, self.encoder)
    }

    fn running_angle(&mut self) -> Result<Rad, M::Error> {
        let ticks = self.motor.position_ticks()?;
        Ok(Rad(ticks as f64 * self.settings.position_scale()))
    }

    fn angular_velocity(&mut self) -> Result<RadPerSecond, M::Error> {
        let ticks = self.motor.velocity_ticks()?;
        Ok(RadPerSecond(ticks as f64 * self.settings.velocity_scale()))
    }
}
