//! 遥测快照
//!
//! 供仪表盘显示的只读视图，由 [`SteerController::snapshot`] 采集。
//!
//! [`SteerController::snapshot`]: crate::controller::SteerController::snapshot

use crate::units::{Deg, Rad};
use serde::Serialize;
use std::fmt;

/// 转向轴状态快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteerSnapshot {
    /// 最近一次请求的航向
    pub reference_angle: Rad,
    /// 电机传感器换算出的当前航向，`[0, 2π)`
    pub state_angle: Rad,
    /// 绝对值编码器读数，`[0, 2π)`
    pub absolute_angle: Rad,
    /// 连续静止周期数
    pub resync_counter: u32,
}

impl SteerSnapshot {
    /// 请求航向（角度）
    pub fn reference_deg(&self) -> Deg {
        self.reference_angle.to_deg()
    }

    /// 当前航向（角度）
    pub fn state_deg(&self) -> Deg {
        self.state_angle.to_deg()
    }

    /// 绝对值编码器读数（角度）
    pub fn absolute_deg(&self) -> Deg {
        self.absolute_angle.to_deg()
    }

    /// 电机传感器与绝对值编码器的偏差，归一化到 `[-π, π]`
    pub fn sensor_drift(&self) -> Rad {
        (self.state_angle - self.absolute_angle).normalize()
    }
}

impl fmt::Display for SteerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reference={} state={} absolute={} resync_counter={}",
            self.reference_deg(),
            self.state_deg(),
            self.absolute_deg(),
            self.resync_counter
        )
    }
}
