//! 命令定义和实现

pub mod check;
pub mod simulate;

pub use check::CheckCommand;
pub use simulate::SimulateCommand;

use anyhow::{Context, Result};
use std::path::Path;
use swerve_steer::config::SteerConfig;

/// 加载配置文件，附带路径上下文
pub fn load_config(path: &Path) -> Result<SteerConfig> {
    SteerConfig::load(path).with_context(|| format!("loading {}", path.display()))
}
