//! 强类型单位系统
//!
//! 使用 NewType 模式区分弧度、角度和角速度，防止单位混淆。
//!
//! 转向控制里同时存在两种"角度"：
//!
//! - **航向角**（heading）：落在 `[0, 2π)` 圆周上的轮子朝向
//! - **累计角**（running angle）：电机内部传感器累计的无界转角
//!
//! 两者都用 [`Rad`] 表示，区别只在于是否经过 [`Rad::wrap_positive`]。
//!
//! # 示例
//!
//! ```rust
//! use swerve_steer::units::{Rad, Deg};
//!
//! let heading = Rad(7.5).wrap_positive();
//! assert!((heading.0 - (7.5 - std::f64::consts::TAU)).abs() < 1e-12);
//!
//! let angle_deg = Rad(std::f64::consts::PI).to_deg();
//! assert!((angle_deg.0 - 180.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 弧度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rad(pub f64);

impl Rad {
    /// 零弧度常量
    pub const ZERO: Self = Rad(0.0);

    /// π 弧度（180度）
    pub const PI: Self = Rad(PI);

    /// 2π 弧度（360度）
    pub const TAU: Self = Rad(TAU);

    /// 转换为角度
    #[inline]
    pub fn to_deg(self) -> Deg {
        Deg(self.0.to_degrees())
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Rad(self.0.abs())
    }

    /// 是否为有限值
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// 归一化到 `[0, 2π)` 范围（floor 风格取模）
    ///
    /// 负数先取余再加 2π。对极小的负数，`x % 2π + 2π` 在浮点下会舍入成
    /// 恰好 2π，此时折回 0，保证结果严格小于 2π。
    pub fn wrap_positive(self) -> Self {
        let mut angle = self.0 % TAU;
        if angle < 0.0 {
            angle += TAU;
        }
        if angle >= TAU {
            angle = 0.0;
        }
        Rad(angle)
    }

    /// 归一化到 `[-π, π]` 范围
    pub fn normalize(self) -> Self {
        let mut angle = self.0 % TAU;
        if angle > PI {
            angle -= TAU;
        } else if angle < -PI {
            angle += TAU;
        }
        Rad(angle)
    }
}

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

impl Add for Rad {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Rad(self.0 + rhs.0)
    }
}

impl Sub for Rad {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Rad(self.0 - rhs.0)
    }
}

impl Mul<f64> for Rad {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Rad(self.0 * rhs)
    }
}

impl Div<f64> for Rad {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        Rad(self.0 / rhs)
    }
}

impl Neg for Rad {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Rad(-self.0)
    }
}

impl AddAssign for Rad {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Rad {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// 角度（NewType）
///
/// 只用于配置文件和显示，控制计算全部使用 [`Rad`]。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deg(pub f64);

impl Deg {
    /// 转换为弧度
    #[inline]
    pub fn to_rad(self) -> Rad {
        Rad(self.0.to_radians())
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

/// 角速度（rad/s）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadPerSecond(pub f64);

impl RadPerSecond {
    /// 由 °/s 构造
    #[inline]
    pub fn from_deg_per_sec(value: f64) -> Self {
        RadPerSecond(value.to_radians())
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        RadPerSecond(self.0.abs())
    }
}

impl fmt::Display for RadPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad/s", self.0)
    }
}
