//! # Swerve CLI
//!
//! Command-line tool for swerve steering configurations.
//!
//! ```bash
//! # 校验配置并打印换算后的参数
//! swerve-cli check --config steer.toml
//!
//! # 在仿真机构上运行转向控制循环
//! swerve-cli simulate --config steer.toml --target-deg 90 --target-deg 350 --hold 150
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{CheckCommand, SimulateCommand};

/// Swerve CLI - 舵轮转向工具
#[derive(Parser, Debug)]
#[command(name = "swerve-cli")]
#[command(about = "Check and simulate swerve steering configurations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 校验配置文件
    Check {
        #[command(flatten)]
        args: CheckCommand,
    },

    /// 在仿真硬件上运行转向控制循环
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("swerve_cli=info".parse()?)
                .add_directive("swerve_steer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { args } => args.execute(),
        Commands::Simulate { args } => args.execute(),
    }
}
