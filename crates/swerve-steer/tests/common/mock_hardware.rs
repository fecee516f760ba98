//! Mock 硬件接口
//!
//! 可直接设定读数、并记录所有写入的电机和编码器。

use std::io;
use swerve_steer::hardware::{AbsoluteEncoder, PositionCommand, SteerMotor};
use swerve_steer::units::Rad;

/// 模拟电机
#[derive(Debug, Default)]
pub struct MockMotor {
    /// 下次读取返回的位置（tick）
    pub position: i64,
    /// 下次读取返回的速度
    pub velocity: i64,
    /// 已下发的命令
    pub commands: Vec<PositionCommand>,
    /// 已写入的传感器偏置
    pub offsets: Vec<f64>,
    /// 是否模拟通信失败
    pub offline: bool,
}

impl MockMotor {
    pub fn at(position: i64, velocity: i64) -> Self {
        Self {
            position,
            velocity,
            ..Default::default()
        }
    }

    pub fn last_command(&self) -> Option<PositionCommand> {
        self.commands.last().copied()
    }

    fn check(&self) -> Result<(), io::Error> {
        if self.offline {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "motor offline"));
        }
        Ok(())
    }
}

impl SteerMotor for MockMotor {
    type Error = io::Error;

    fn position_ticks(&mut self) -> Result<i64, io::Error> {
        self.check()?;
        Ok(self.position)
    }

    fn velocity_ticks(&mut self) -> Result<i64, io::Error> {
        self.check()?;
        Ok(self.velocity)
    }

    fn command_position(&mut self, command: PositionCommand) -> Result<(), io::Error> {
        self.check()?;
        self.commands.push(command);
        Ok(())
    }

    fn override_sensor_offset(&mut self, ticks: f64) -> Result<(), io::Error> {
        self.check()?;
        self.offsets.push(ticks);
        Ok(())
    }
}

/// 模拟绝对值编码器
#[derive(Debug)]
pub struct MockEncoder {
    pub angle: Rad,
    pub reads: usize,
    pub offline: bool,
}

impl MockEncoder {
    pub fn new(angle: Rad) -> Self {
        Self {
            angle,
            reads: 0,
            offline: false,
        }
    }
}

impl AbsoluteEncoder for MockEncoder {
    type Error = io::Error;

    fn absolute_angle(&mut self) -> Result<Rad, io::Error> {
        if self.offline {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "encoder offline"));
        }
        self.reads += 1;
        Ok(self.angle)
    }
}
