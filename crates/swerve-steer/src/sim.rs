//! 仿真硬件
//!
//! 用于测试和命令行仿真，无需真实电机。
//!
//! [`SimulatedMechanism`] 描述一个转向机构：转子位置、电机传感器偏置、轮子的
//! 真实朝向。[`SimulatedSteerMotor`] 和 [`SimulatedAbsoluteEncoder`] 是同一机构
//! 上的两个句柄，共享状态（`parking_lot::Mutex`）。
//!
//! - 电机报告的位置 = 转子位置 + 传感器偏置（上电时偏置为 0，与轮子朝向无关）
//! - 绝对值编码器报告轮子真实朝向（可叠加偏差，模拟上电时读数不准）
//! - 位置命令在 [`SimulatedMechanism::step`] 中以限定转速逼近
//!
//! # 示例
//!
//! ```rust
//! use swerve_steer::config::SteerSettings;
//! use swerve_steer::sim::SimulatedMechanism;
//! use swerve_steer::units::Rad;
//!
//! let settings = SteerSettings::from_scales(0.001, 0.01, false).unwrap();
//! let mechanism = SimulatedMechanism::new(settings).with_initial_heading(Rad(1.0));
//! assert!((mechanism.wheel_heading().0 - 1.0).abs() < 1e-12);
//! ```

use crate::config::SteerSettings;
use crate::hardware::{AbsoluteEncoder, PositionCommand, SteerMotor};
use crate::units::{Rad, RadPerSecond};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 默认最大转向速度（rad/s）
pub const DEFAULT_MAX_SPEED: RadPerSecond = RadPerSecond(4.0 * std::f64::consts::PI);

/// 命令/偏置记录的容量，超出后丢弃最早的记录
pub const HISTORY_CAPACITY: usize = 1024;

/// 仿真设备错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// 设备断开（故障注入）
    #[error("Simulated {device} disconnected")]
    Disconnected {
        /// 设备名
        device: &'static str,
    },
}

#[derive(Debug)]
struct MechanismState {
    position_scale: f64,
    velocity_scale: f64,
    rotor_ticks: f64,
    sensor_offset_ticks: f64,
    mount_offset: Rad,
    setpoint: Option<f64>,
    velocity_ticks_per_sec: f64,
    max_speed: RadPerSecond,
    encoder_bias: Rad,
    motor_fault: bool,
    encoder_fault: bool,
    commands: VecDeque<PositionCommand>,
    offsets: VecDeque<f64>,
}

fn record<T>(history: &mut VecDeque<T>, item: T) {
    if history.len() == HISTORY_CAPACITY {
        history.pop_front();
    }
    history.push_back(item);
}

impl MechanismState {
    fn reported_ticks(&self) -> f64 {
        self.rotor_ticks + self.sensor_offset_ticks
    }

    fn wheel_heading(&self) -> Rad {
        (Rad(self.rotor_ticks * self.position_scale) + self.mount_offset).wrap_positive()
    }
}

/// 仿真转向机构
///
/// `Clone` 得到的是同一机构的另一个句柄。
#[derive(Debug, Clone)]
pub struct SimulatedMechanism {
    state: Arc<Mutex<MechanismState>>,
}

impl SimulatedMechanism {
    /// 按控制器参数创建仿真机构，轮子初始朝向为 0
    pub fn new(settings: SteerSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(MechanismState {
                position_scale: settings.position_scale(),
                velocity_scale: settings.velocity_scale(),
                rotor_ticks: 0.0,
                sensor_offset_ticks: 0.0,
                mount_offset: Rad::ZERO,
                setpoint: None,
                velocity_ticks_per_sec: 0.0,
                max_speed: DEFAULT_MAX_SPEED,
                encoder_bias: Rad::ZERO,
                motor_fault: false,
                encoder_fault: false,
                commands: VecDeque::with_capacity(HISTORY_CAPACITY),
                offsets: VecDeque::new(),
            })),
        }
    }

    /// 设置轮子初始朝向（电机传感器仍从 0 开始计数）
    pub fn with_initial_heading(self, heading: Rad) -> Self {
        {
            let mut state = self.state.lock();
            state.mount_offset = heading - Rad(state.rotor_ticks * state.position_scale);
        }
        self
    }

    /// 设置最大转向速度
    pub fn with_max_speed(self, max_speed: RadPerSecond) -> Self {
        self.state.lock().max_speed = max_speed.abs();
        self
    }

    /// 电机句柄
    pub fn motor(&self) -> SimulatedSteerMotor {
        SimulatedSteerMotor {
            state: Arc::clone(&self.state),
        }
    }

    /// 绝对值编码器句柄
    pub fn encoder(&self) -> SimulatedAbsoluteEncoder {
        SimulatedAbsoluteEncoder {
            state: Arc::clone(&self.state),
        }
    }

    /// 推进仿真时间
    ///
    /// 转子以不超过最大转速的速度逼近最近一次的位置命令。
    pub fn step(&self, dt: Duration) {
        let dt_sec = dt.as_secs_f64();
        if dt_sec <= 0.0 {
            return;
        }

        let mut state = self.state.lock();
        let Some(setpoint) = state.setpoint else {
            state.velocity_ticks_per_sec = 0.0;
            return;
        };

        let error = setpoint - state.reported_ticks();
        let max_step = state.max_speed.0 / state.position_scale.abs() * dt_sec;
        let delta = error.clamp(-max_step, max_step);

        state.rotor_ticks += delta;
        state.velocity_ticks_per_sec = delta / dt_sec;
    }

    /// 让转子静止（清除速度，保留位置与命令）
    pub fn settle(&self) {
        let mut state = self.state.lock();
        if let Some(setpoint) = state.setpoint {
            state.rotor_ticks = setpoint - state.sensor_offset_ticks;
        }
        state.velocity_ticks_per_sec = 0.0;
    }

    /// 轮子真实朝向，`[0, 2π)`
    pub fn wheel_heading(&self) -> Rad {
        self.state.lock().wheel_heading()
    }

    /// 设置绝对值编码器读数偏差
    pub fn set_encoder_bias(&self, bias: Rad) {
        self.state.lock().encoder_bias = bias;
    }

    /// 电机故障注入
    pub fn set_motor_fault(&self, fault: bool) {
        self.state.lock().motor_fault = fault;
    }

    /// 编码器故障注入
    pub fn set_encoder_fault(&self, fault: bool) {
        self.state.lock().encoder_fault = fault;
    }

    /// 已下发的位置命令（最近 [`HISTORY_CAPACITY`] 条，按时间顺序）
    pub fn commands(&self) -> Vec<PositionCommand> {
        self.state.lock().commands.iter().copied().collect()
    }

    /// 已写入的传感器偏置（最近 [`HISTORY_CAPACITY`] 条）
    pub fn offsets(&self) -> Vec<f64> {
        self.state.lock().offsets.iter().copied().collect()
    }
}

/// 仿真电机句柄
#[derive(Debug, Clone)]
pub struct SimulatedSteerMotor {
    state: Arc<Mutex<MechanismState>>,
}

impl SteerMotor for SimulatedSteerMotor {
    type Error = SimError;

    fn position_ticks(&mut self) -> Result<i64, SimError> {
        let state = self.state.lock();
        if state.motor_fault {
            return Err(SimError::Disconnected { device: "motor" });
        }
        Ok(state.reported_ticks().round() as i64)
    }

    fn velocity_ticks(&mut self) -> Result<i64, SimError> {
        let state = self.state.lock();
        if state.motor_fault {
            return Err(SimError::Disconnected { device: "motor" });
        }
        // 速度单位满足 units × velocity_scale = rad/s
        let rad_per_sec = state.velocity_ticks_per_sec * state.position_scale;
        Ok((rad_per_sec / state.velocity_scale).round() as i64)
    }

    fn command_position(&mut self, command: PositionCommand) -> Result<(), SimError> {
        let mut state = self.state.lock();
        if state.motor_fault {
            return Err(SimError::Disconnected { device: "motor" });
        }
        state.setpoint = Some(command.ticks());
        record(&mut state.commands, command);
        Ok(())
    }

    fn override_sensor_offset(&mut self, ticks: f64) -> Result<(), SimError> {
        let mut state = self.state.lock();
        if state.motor_fault {
            return Err(SimError::Disconnected { device: "motor" });
        }
        state.sensor_offset_ticks = ticks - state.rotor_ticks;
        // 偏置变化后旧命令失去意义，保持原地
        state.setpoint = None;
        record(&mut state.offsets, ticks);
        Ok(())
    }
}

/// 仿真绝对值编码器句柄
#[derive(Debug, Clone)]
pub struct SimulatedAbsoluteEncoder {
    state: Arc<Mutex<MechanismState>>,
}

impl AbsoluteEncoder for SimulatedAbsoluteEncoder {
    type Error = SimError;

    fn absolute_angle(&mut self) -> Result<Rad, SimError> {
        let state = self.state.lock();
        if state.encoder_fault {
            return Err(SimError::Disconnected { device: "encoder" });
        }
        Ok((state.wheel_heading() + state.encoder_bias).wrap_positive())
    }
}
