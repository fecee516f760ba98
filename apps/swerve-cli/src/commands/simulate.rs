//! 仿真命令
//!
//! 在仿真机构上运行转向控制循环，结束后打印遥测快照。

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use swerve_steer::builder::SteerControllerBuilder;
use swerve_steer::loop_runner::{LoopConfig, run_steering_loop};
use swerve_steer::sim::SimulatedMechanism;
use swerve_steer::units::{Deg, Rad};

/// 仿真命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 控制频率（Hz）
    #[arg(short, long, default_value_t = 50.0)]
    pub frequency: f64,

    /// 目标航向（度），可重复指定，依次执行
    #[arg(short, long = "target-deg", default_values_t = [90.0])]
    pub targets: Vec<f64>,

    /// 每个目标保持的周期数
    #[arg(long, default_value_t = 100)]
    pub hold: usize,

    /// 轮子初始朝向（度）
    #[arg(long, default_value_t = 0.0)]
    pub initial_deg: f64,

    /// 上电时绝对值编码器的读数偏差（度），仅影响初始同步
    #[arg(long, default_value_t = 0.0)]
    pub encoder_glitch_deg: f64,

    /// 以 JSON 输出快照
    #[arg(long)]
    pub json: bool,
}

impl SimulateCommand {
    /// 执行仿真
    pub fn execute(&self) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            bail!("--frequency must be a positive, finite number (got {})", self.frequency);
        }
        let dt = Duration::try_from_secs_f64(1.0 / self.frequency)
            .with_context(|| format!("--frequency {} is too low", self.frequency))?;

        if self.targets.is_empty() {
            bail!("at least one --target-deg is required");
        }
        if self.hold == 0 {
            bail!("--hold must be > 0");
        }

        let config = super::load_config(&self.config)?;
        let settings = config.validate()?;

        let mechanism =
            SimulatedMechanism::new(settings).with_initial_heading(Deg(self.initial_deg).to_rad());
        mechanism.set_encoder_bias(Deg(self.encoder_glitch_deg).to_rad());
        let mut controller =
            SteerControllerBuilder::new(settings).build(mechanism.motor(), mechanism.encoder())?;
        mechanism.set_encoder_bias(Rad::ZERO);

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;

        let targets: Vec<Rad> = self.targets.iter().map(|&d| Deg(d).to_rad()).collect();
        let loop_config = LoopConfig {
            frequency_hz: self.frequency,
            max_iterations: Some(targets.len() * self.hold),
        };
        let hold = self.hold;

        tracing::info!(
            "Simulating {} targets at {} Hz ({} cycles each)",
            targets.len(),
            self.frequency,
            hold
        );

        let stats = run_steering_loop(
            &mut controller,
            |i| {
                mechanism.step(dt);
                targets.get(i / hold).copied()
            },
            &loop_config,
            Some(&stop),
        )?;

        let snapshot = controller.snapshot()?;
        if self.json {
            let report = serde_json::json!({
                "snapshot": snapshot,
                "wheel_heading": mechanism.wheel_heading(),
                "iterations": stats.iterations,
                "overruns": stats.overruns,
                "resyncs": stats.resyncs,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("📊 {}", snapshot);
            println!(
                "  wheel={} iterations={} overruns={} resyncs={}",
                mechanism.wheel_heading().to_deg(),
                stats.iterations,
                stats.overruns,
                stats.resyncs
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SimulateCommand,
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = TestCli::parse_from(["test", "--config", "steer.toml"]);
        assert_eq!(cli.args.frequency, 50.0);
        assert_eq!(cli.args.targets, vec![90.0]);
        assert_eq!(cli.args.hold, 100);
        assert!(!cli.args.json);
    }

    #[test]
    fn test_simulate_multiple_targets() {
        let cli = TestCli::parse_from([
            "test",
            "-c",
            "steer.toml",
            "--target-deg",
            "10",
            "--target-deg",
            "350",
            "--hold",
            "5",
        ]);
        assert_eq!(cli.args.targets, vec![10.0, 350.0]);
        assert_eq!(cli.args.hold, 5);
    }

    #[test]
    fn test_zero_hold_rejected() {
        let cli = TestCli::parse_from(["test", "-c", "steer.toml", "--hold", "0"]);
        assert!(cli.args.execute().is_err());
    }

    #[test]
    fn test_invalid_frequency_is_error() {
        let config = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/steer.toml");
        for frequency in [
            "--frequency=0",
            "--frequency=-5",
            "--frequency=NaN",
            "--frequency=1e-30",
        ] {
            let cli = TestCli::parse_from(["test", "-c", config, frequency]);
            assert!(cli.args.execute().is_err(), "frequency {}", frequency);
        }
    }
}
