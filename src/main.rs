//! Airlift CLI - cloud builds for mobile applications
//!
//! Usage: airlift build --platform <android|ios|all> [--profile <name>]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;

use airlift::build::{start_android_build, start_ios_build, BuildContext};
use airlift::client::BuildServiceClient;
use airlift::config::{self, ConfigWarning};
use airlift::prompt::TerminalPrompter;
use airlift::ui;

/// Airlift - trigger cloud builds of mobile applications
#[derive(Parser, Debug)]
#[command(name = "airlift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Trigger a cloud build of the current project
    Build {
        /// Platform to build for
        #[arg(long, value_enum)]
        platform: PlatformArg,

        /// Build profile name from airlift.json
        #[arg(long, default_value = "release")]
        profile: String,

        /// Never prompt; use configured values and fallbacks instead
        #[arg(long)]
        non_interactive: bool,

        /// Project directory (defaults to the current directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PlatformArg {
    Android,
    Ios,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            platform,
            profile,
            non_interactive,
            project_dir,
        } => run_build(platform, profile, non_interactive, project_dir),
    }
}

fn run_build(
    platform: PlatformArg,
    profile: String,
    non_interactive: bool,
    project_dir: Option<PathBuf>,
) -> Result<()> {
    let project_dir = match project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let interactive = !non_interactive && std::io::stdin().is_terminal();

    let (manifest, manifest_warnings) = config::load_manifest(&project_dir)?;
    report_warnings(config::APP_MANIFEST_FILE, &manifest_warnings);

    let (build_config, config_warnings) = config::load_build_config(&project_dir)?;
    report_warnings(config::BUILD_CONFIG_FILE, &config_warnings);

    let client = BuildServiceClient::from_env();
    let mut prompter = TerminalPrompter;

    let platforms: &[PlatformArg] = match platform {
        PlatformArg::All => &[PlatformArg::Android, PlatformArg::Ios],
        PlatformArg::Android => &[PlatformArg::Android],
        PlatformArg::Ios => &[PlatformArg::Ios],
    };

    for platform in platforms {
        let ctx = BuildContext::new(
            project_dir.clone(),
            manifest.clone(),
            profile.clone(),
            interactive,
        )?;
        let build_id = match platform {
            PlatformArg::Android => {
                start_android_build(&mut prompter, &client, &ctx, &build_config)?
            }
            PlatformArg::Ios => start_ios_build(&mut prompter, &client, &ctx, &build_config)?,
            PlatformArg::All => unreachable!("expanded above"),
        };
        ui::success(&format!("Build queued: {build_id}"));
        println!("{build_id}");
    }

    Ok(())
}

fn report_warnings(file: &str, warnings: &[ConfigWarning]) {
    for warning in warnings {
        ui::warn(&format!("Unknown config key '{}' in {file}", warning.key));
    }
}
