use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use update_checker::checker::{CheckState, Interval, StateSnapshot};
use update_checker::config::{self, CheckerConfig};
use update_checker::logging;
use update_checker::version::types::{Platform, UpdateState, VersionValue};

#[derive(Parser)]
#[command(name = "update-checker")]
#[command(version, about = "Check whether an app is up to date or must be updated")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Remote config URL advertising latest and required versions
    #[arg(long, global = true)]
    remote_url: Option<String>,

    /// Platform rules for comparison and remote keys
    #[arg(long, global = true, value_parser = parse_platform)]
    platform: Option<Platform>,

    /// Fixed local app version
    #[arg(long, global = true)]
    app_version: Option<String>,

    /// File holding the local app version
    #[arg(long, global = true)]
    version_file: Option<PathBuf>,

    /// Readable version used to detect development builds
    #[arg(long, global = true)]
    display_version: Option<String>,

    /// Re-check interval in milliseconds (watch only); 0 checks once
    #[arg(long, global = true, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Treat remote failures as "no versions advertised"
    #[arg(long, global = true)]
    lenient: bool,

    /// Log file (defaults to the data directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Mirror debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run one check and print the result (default)
    Check,
    /// Keep checking and print every result until interrupted
    Watch,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    match value {
        "ios" => Ok(Platform::Ios),
        "android" => Ok(Platform::Android),
        "desktop" => Ok(Platform::Desktop),
        other => Err(format!(
            "unknown platform '{}', expected ios, android or desktop",
            other
        )),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CheckerConfig> {
    let mut config = match &cli.config {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };

    if let Some(url) = &cli.remote_url {
        config.remote.url = Some(url.clone());
    }
    if let Some(platform) = cli.platform {
        config.platform = platform;
    }
    if let Some(version) = &cli.app_version {
        config.version = Some(VersionValue::parse(version));
    }
    if let Some(path) = &cli.version_file {
        config.version_file = Some(path.clone());
    }
    if let Some(display_version) = &cli.display_version {
        config.display_version = Some(display_version.clone());
    }
    if let Some(ms) = cli.interval {
        config.interval = Interval::from_millis(ms);
    }
    if cli.lenient {
        config.remote.lenient = true;
    }

    Ok(config)
}

fn print_state(state: &CheckState) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(&StateSnapshot::from(state))?);
    Ok(())
}

fn exit_code(state: &CheckState) -> ExitCode {
    if state.error().is_some() {
        return ExitCode::FAILURE;
    }
    match state.update_state() {
        UpdateState::None => ExitCode::SUCCESS,
        UpdateState::Latest => ExitCode::from(10),
        UpdateState::Required => ExitCode::from(20),
        UpdateState::Unresolved => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => {
            let checker = config.builder()?.interval(Interval::Once).spawn()?;
            let state = checker.settled().await;
            print_state(&state)?;
            checker.shutdown().await;
            Ok(exit_code(&state))
        }
        Command::Watch => {
            let checker = config.builder()?.spawn()?;
            let mut states = checker.subscribe();
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            let initial = states.borrow_and_update().clone();
            if !initial.is_checking() {
                print_state(&initial)?;
            }

            loop {
                tokio::select! {
                    changed = states.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = states.borrow_and_update().clone();
                        if !state.is_checking() {
                            print_state(&state)?;
                        }
                    }
                    _ = &mut ctrl_c => {
                        info!("Interrupted, stopping update checker");
                        break;
                    }
                }
            }

            checker.shutdown().await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone().unwrap_or_else(config::log_path);
    let _guard = logging::init(&log_file, cli.verbose)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
