//! 硬件协作接口
//!
//! 控制器不拥有、也不构造硬件，只通过这两个 trait 调用：
//!
//! - [`SteerMotor`]：转向电机。位置/速度以原始 tick 表示，累计值无界。
//! - [`AbsoluteEncoder`]：绝对值编码器。报告 `[0, 2π)` 内的轮子航向，
//!   与电机转过的圈数无关。
//!
//! 错误类型由实现方定义，控制器原样向上传播，不做重试。

use crate::units::Rad;

/// 闭环位置命令（单位：原始 tick）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionCommand {
    /// 普通闭环位置命令
    Position(f64),
    /// 带运动规划（梯形速度曲线）的位置命令
    MotionProfiled(f64),
}

impl PositionCommand {
    /// 根据是否启用运动规划构造命令
    #[inline]
    pub fn new(ticks: f64, motion_profiled: bool) -> Self {
        if motion_profiled {
            PositionCommand::MotionProfiled(ticks)
        } else {
            PositionCommand::Position(ticks)
        }
    }

    /// 目标 tick 值
    #[inline]
    pub fn ticks(self) -> f64 {
        match self {
            PositionCommand::Position(ticks) | PositionCommand::MotionProfiled(ticks) => ticks,
        }
    }

    /// 是否为运动规划命令
    #[inline]
    pub fn is_motion_profiled(self) -> bool {
        matches!(self, PositionCommand::MotionProfiled(_))
    }
}

/// 转向电机句柄
pub trait SteerMotor {
    /// 通信或设备错误
    type Error: std::error::Error + Send + Sync + 'static;

    /// 读取内部传感器的累计位置（tick）
    fn position_ticks(&mut self) -> Result<i64, Self::Error>;

    /// 读取内部传感器速度（tick / 采样单位时间）
    fn velocity_ticks(&mut self) -> Result<i64, Self::Error>;

    /// 下发闭环位置命令
    fn command_position(&mut self, command: PositionCommand) -> Result<(), Self::Error>;

    /// 一次性覆盖内部传感器的零点偏置
    ///
    /// 写入后，传感器报告的位置即为 `ticks`（相对于当前转子位置）。
    fn override_sensor_offset(&mut self, ticks: f64) -> Result<(), Self::Error>;
}

/// 绝对值编码器句柄
pub trait AbsoluteEncoder {
    /// 通信或设备错误
    type Error: std::error::Error + Send + Sync + 'static;

    /// 读取绝对航向，范围 `[0, 2π)`
    fn absolute_angle(&mut self) -> Result<Rad, Self::Error>;
}

impl<T: SteerMotor + ?Sized> SteerMotor for &mut T {
    type Error = T::Error;

    fn position_ticks(&mut self) -> Result<i64, Self::Error> {
        (**self).position_ticks()
    }

    fn velocity_ticks(&mut self) -> Result<i64, Self::Error> {
        (**self).velocity_ticks()
    }

    fn command_position(&mut self, command: PositionCommand) -> Result<(), Self::Error> {
        (**self).command_position(command)
    }

    fn override_sensor_offset(&mut self, ticks: f64) -> Result<(), Self::Error> {
        (**self).override_sensor_offset(ticks)
    }
}

impl<T: AbsoluteEncoder + ?Sized> AbsoluteEncoder for &mut T {
    type Error = T::Error;

    fn absolute_angle(&mut self) -> Result<Rad, Self::Error> {
        (**self).absolute_angle()
    }
}
