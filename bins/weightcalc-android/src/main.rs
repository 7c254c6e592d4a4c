//! Weight Calculator Android CLI
//!
//! Publishes packaged APKs under their canonical names and drives the Gradle
//! packaging tasks that produce them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use weightcalc_android::publish::{locate, publish, PublishResult};
use weightcalc_android::{gradle, ArtifactLayout, Variant};
use weightcalc_cli::output::{format_count, format_duration, format_size, Status};
use weightcalc_cli::progress;
use weightcalc_core::config::Config;
use weightcalc_core::error::{exit_codes, Error};
use weightcalc_telemetry::{TelemetryConfig, Timer};

#[derive(Parser)]
#[command(name = "weightcalc-android")]
#[command(about = "Publish and build Weight Calculator Android artifacts")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Build output root (overrides general.build_dir)
    #[arg(long, global = true, env = "WEIGHTCALC_BUILD_DIR")]
    build_dir: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy built APKs to their canonical names
    Publish {
        /// Variant to publish: release, debug (default: both)
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// Run the Gradle packaging task, then publish its APK
    Build {
        /// Variant to build: release, debug
        #[arg(long, default_value = "debug")]
        variant: Variant,
        /// Android project directory (overrides general.project_dir)
        #[arg(long)]
        project_dir: Option<PathBuf>,
        /// Only run the Gradle task
        #[arg(long)]
        no_publish: bool,
    },

    /// Show candidate output locations and which one would be published
    Locate {
        /// Variant to inspect: release, debug (default: both)
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    Status::set_quiet(cli.quiet);

    weightcalc_telemetry::init_with_config(
        TelemetryConfig::for_verbosity(cli.verbose).with_json(cli.log_json),
    )?;

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report_error(&e)),
    };
    if let Some(ref path) = config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let layout = ArtifactLayout::from_config(&config.schema, cli.build_dir.as_deref());

    let exit_code = match cli.command {
        Commands::Publish { variant } => run_publish(&layout, &selected(variant)),
        Commands::Build {
            variant,
            project_dir,
            no_publish,
        } => {
            let project_dir =
                project_dir.unwrap_or_else(|| PathBuf::from(&config.schema.general.project_dir));
            run_build(&project_dir, &layout, variant, no_publish)
        }
        Commands::Locate { variant } => run_locate(&layout, &selected(variant)),
        Commands::Config { json } => run_config(&config, json),
    };

    std::process::exit(exit_code);
}

fn selected(variant: Option<Variant>) -> Vec<Variant> {
    variant.map_or_else(|| Variant::ALL.to_vec(), |v| vec![v])
}

fn report_error(err: &Error) -> i32 {
    Status::error(&err.to_string());
    tracing::debug!(report = ?err.to_report(), "Command failed");
    err.code.exit_code()
}

fn run_publish(layout: &ArtifactLayout, variants: &[Variant]) -> i32 {
    for &variant in variants {
        let result = layout
            .artifact(variant)
            .and_then(|artifact| publish(&artifact, layout.overwrite));

        match result {
            Ok(result) => report_publish(variant, &result),
            Err(e) => return report_error(&e),
        }
    }

    exit_codes::SUCCESS
}

fn report_publish(variant: Variant, result: &PublishResult) {
    match result {
        PublishResult::Copied {
            source,
            dest,
            bytes,
        } => Status::success(&format!(
            "Copied {} → {} ({})",
            display_name(source),
            dest.display(),
            format_size(*bytes)
        )),
        PublishResult::Unchanged { dest, .. } => {
            Status::info(&format!("{} is already up to date", dest.display()));
        }
        PublishResult::NotFound { checked } => Status::warning(&not_found_message(variant, checked)),
    }
}

fn not_found_message(variant: Variant, checked: &[PathBuf]) -> String {
    let paths: Vec<String> = checked.iter().map(|p| p.display().to_string()).collect();
    format!(
        "No {} APK found to copy (checked {})",
        variant,
        paths.join(", ")
    )
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_build(project_dir: &Path, layout: &ArtifactLayout, variant: Variant, no_publish: bool) -> i32 {
    let task = variant.assemble_task();
    let timer = Timer::start(task);
    let spinner = progress::spinner(&format!("Running {}...", task));

    let result = if no_publish {
        gradle::assemble_checked(project_dir, variant).map(|_| None)
    } else {
        gradle::assemble_and_publish(project_dir, layout, variant).map(Some)
    };

    let elapsed = format_duration(timer.stop());

    match result {
        Ok(published) => {
            progress::finish_success(&spinner, &format!("{} finished in {}", task, elapsed));
            if let Some(published) = published {
                report_publish(variant, &published);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            progress::finish_error(&spinner, &format!("{} failed after {}", task, elapsed));
            report_error(&e)
        }
    }
}

fn run_locate(layout: &ArtifactLayout, variants: &[Variant]) -> i32 {
    for &variant in variants {
        let artifact = match layout.artifact(variant) {
            Ok(artifact) => artifact,
            Err(e) => return report_error(&e),
        };
        let statuses = locate(&artifact);
        let found = statuses.iter().filter(|s| s.exists()).count();

        Status::header(&format!(
            "{} ({})",
            variant,
            format_count(found, "candidate found", "candidates found")
        ));
        for status in &statuses {
            let marker = if status.selected {
                "→".green().to_string()
            } else {
                " ".to_string()
            };
            let size = status
                .size
                .map_or_else(|| "missing".dimmed().to_string(), format_size);
            println!("  {} {} {}", marker, status.path.display(), size);
        }
        println!("  = {}", artifact.dest_path().display().bold());
    }

    exit_codes::SUCCESS
}

fn run_config(config: &Config, json: bool) -> i32 {
    let rendered = if json {
        config.to_json()
    } else {
        config.to_toml()
    };

    match rendered {
        Ok(text) => {
            if let Some(ref path) = config.path {
                Status::info(&format!("Loaded from {}", path.display()));
            }
            println!("{}", text);
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
