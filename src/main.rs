//! Weekly Reporter CLI
//!
//! Usage:
//!   weekly-reporter [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML)
//!   -n, --now            Generate one report immediately and exit
//!   --log <FILTER>       Log filter (env-filter syntax)
//!   -h, --help           Print help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use weekly_reporter::{
    generate_report, Config, Renderer, ScheduleDescriptor, Scheduler, SourceResolver, SystemClock,
};

#[derive(Parser)]
#[command(name = "weekly-reporter")]
#[command(about = "Automated weekly slide-deck report generation")]
struct Cli {
    /// Configuration file (TOML); falls back to built-in defaults if absent
    #[arg(short, long, default_value = "config/config.toml")]
    config: PathBuf,

    /// Generate one report immediately and exit instead of scheduling
    #[arg(short = 'n', long)]
    now: bool,

    /// Log filter (env-filter syntax, e.g. "info" or "weekly_reporter=debug")
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .init();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %cli.config.display(), error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if cli.now {
        run_once(&config);
        // Automation-friendly: a failed run is reported above, not
        // propagated as a process failure.
        return ExitCode::SUCCESS;
    }

    run_scheduler(&cli.config, config);
    ExitCode::SUCCESS
}

fn run_once(config: &Config) {
    info!("running report generation immediately");
    match generate_report(config) {
        Ok(path) => info!(path = %path.display(), "report generation completed"),
        Err(e) => error!(error = %e, "report generation failed"),
    }
}

fn run_scheduler(config_path: &std::path::Path, config: Config) {
    let descriptor = ScheduleDescriptor::from_config(&config.schedule);
    info!("weekly reports scheduler starting");
    info!(
        day = %descriptor.day,
        time = %descriptor.time.format("%H:%M"),
        config = %config_path.display(),
        output = %config.output.directory.display(),
        "schedule"
    );

    let resolver = SourceResolver::from_config(&config.data_source);
    let renderer = Renderer::from_config(&config);
    let (mut scheduler, trigger) =
        Scheduler::new(descriptor, resolver, renderer, Box::new(SystemClock));
    // Keep the manual-trigger side alive for the life of the loop
    let _trigger = trigger;

    let token = scheduler.cancellation_token();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        error!(error = %e, "failed to install interrupt handler");
    }

    scheduler.run_loop();
    info!("scheduler stopped");
}
