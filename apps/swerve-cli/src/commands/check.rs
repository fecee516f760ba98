//! 配置校验命令

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// 配置校验命令参数
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

impl CheckCommand {
    /// 执行校验
    pub fn execute(&self) -> Result<()> {
        let config = super::load_config(&self.config)?;
        let settings = config.validate()?;
        let resync = settings.resync();

        println!("✅ {} is valid", self.config.display());
        println!("  position_scale:     {:.6e} rad/tick", settings.position_scale());
        println!("  velocity_scale:     {:.6e} rad/s per unit", settings.velocity_scale());
        println!(
            "  command:            {}",
            if settings.use_motion_profile() {
                "motion profiled"
            } else {
                "position"
            }
        );
        println!(
            "  resync:             after {} still cycles below {:.3}°/s",
            resync.iterations,
            resync.max_angular_velocity.0.to_degrees()
        );

        Ok(())
    }
}
