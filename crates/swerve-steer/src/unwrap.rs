//! 角度展开（unwrapping）
//!
//! 目标航向在 `[0, 2π)` 上，而电机传感器的累计角无界。展开就是在累计角所在的
//! 那一圈里找出与目标航向等价、且离当前累计角最近的那个值：
//!
//! ```text
//! current_mod = wrap_positive(current)
//! unwrapped   = target + (current - current_mod)
//! if target - current_mod >  π { unwrapped -= 2π }
//! if target - current_mod < -π { unwrapped += 2π }
//! ```
//!
//! 对 `[0, 2π)` 内的目标，结果满足 `|unwrapped - current| ≤ π`，即电机总是走
//! 较短的那一侧。

use crate::units::Rad;

/// 计算展开后的目标角
///
/// # 参数
///
/// - `target`: 目标航向（通常在 `[0, 2π)`，任意有限值均可）
/// - `current`: 当前累计角（未取模）
///
/// # 示例
///
/// ```rust
/// use swerve_steer::units::Rad;
/// use swerve_steer::unwrap::unwrap_target;
///
/// // 当前累计角 0.1，目标 6.0：反向走 0.383 rad 比正向走 5.9 rad 更近
/// let unwrapped = unwrap_target(Rad(6.0), Rad(0.1));
/// assert!((unwrapped.0 - (6.0 - std::f64::consts::TAU)).abs() < 1e-12);
/// ```
pub fn unwrap_target(target: Rad, current: Rad) -> Rad {
    let current_mod = current.wrap_positive();
    let mut unwrapped = target + (current - current_mod);

    let delta = target - current_mod;
    if delta > Rad::PI {
        unwrapped -= Rad::TAU;
    } else if delta < -Rad::PI {
        unwrapped += Rad::TAU;
    }

    unwrapped
}
