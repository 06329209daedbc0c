// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use netbatch::utils::logging::{format_error, format_step, format_success, format_warning};
use netbatch::{
    BatchPlan, BatchPlanner, BatchRunner, Config, HealthCheck, HealthReport, HealthStatus,
    JsonExporter, ProcessLauncher, Validator,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "netbatch")]
#[command(version)]
#[command(about = "Build topic networks from a NELA database with an external network tool", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled profile, or the named ones
    Run {
        #[arg(short, long = "profile", value_name = "NAME")]
        profiles: Vec<String>,

        /// Print the invocations without running them
        #[arg(long)]
        dry_run: bool,

        /// Exit with an error if any invocation failed
        #[arg(long)]
        strict: bool,

        #[arg(long)]
        no_report: bool,
    },

    /// Show the invocations a run would issue
    Plan {
        #[arg(short, long = "profile", value_name = "NAME")]
        profiles: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// List configured profiles
    Profiles,

    /// Check the network tool, database and topic directories
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    netbatch::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using built-in profiles",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Run {
            profiles,
            dry_run,
            strict,
            no_report,
        } => {
            if dry_run {
                cmd_plan(&config, &profiles, false)?;
            } else {
                cmd_run(&config, &profiles, strict, no_report, cli.color).await?;
            }
        }
        Commands::Plan { profiles, json } => {
            cmd_plan(&config, &profiles, json)?;
        }
        Commands::Profiles => {
            cmd_profiles(&config);
        }
        Commands::Verify => {
            cmd_verify(&config)?;
        }
    }

    Ok(())
}

fn build_plan(config: &Config, names: &[String]) -> Result<BatchPlan> {
    let profiles = config
        .select_profiles(names)
        .context("Failed to select run profiles")?;

    for profile in profiles.iter().filter(|p| !p.enabled) {
        warn!("Running disabled profile {} on request", profile.name);
    }

    Ok(BatchPlanner::new(config).plan(&profiles))
}

async fn cmd_run(
    config: &Config,
    names: &[String],
    strict: bool,
    no_report: bool,
    color: bool,
) -> Result<()> {
    let plan = build_plan(config, names)?;
    info!(
        "Running {} invocations for profiles: {}",
        plan.len(),
        plan.profiles.join(", ")
    );

    let runner = BatchRunner::new(ProcessLauncher).with_progress(true, color);
    let report = runner.run(&plan).await.context("Batch run failed")?;

    if config.batch.write_report && !no_report {
        let exporter = JsonExporter::new(&config.batch.reports_dir)
            .context("Failed to create reports directory")?;
        exporter
            .write_report(&report, true)
            .context("Failed to write batch report")?;
    }

    let stats = &report.stats;
    println!(
        "{}",
        format_success(&format!(
            "{} of {} invocations succeeded ({:.1}%), {} networks written",
            stats.invocations_succeeded,
            stats.invocations_planned,
            stats.success_rate(),
            stats.networks_written
        ))
    );

    for outcome in report.failures() {
        println!(
            "{}",
            format_error(&format!(
                "{} -> {}",
                outcome.invocation.input_path.display(),
                outcome.invocation.output_path.display()
            ))
        );
    }

    if strict && report.has_failures() {
        anyhow::bail!(
            "{} invocations failed",
            report.stats.invocations_failed
        );
    }

    Ok(())
}

fn cmd_plan(config: &Config, names: &[String], json: bool) -> Result<()> {
    let plan = build_plan(config, names)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?
        );
        return Ok(());
    }

    println!("Output directories:");
    for dir in &plan.output_dirs {
        println!("  {}", dir.display());
    }
    println!();

    let total = plan.len();
    for (idx, invocation) in plan.invocations.iter().enumerate() {
        println!("{}", format_step(idx + 1, total, &invocation.command_line()));
    }

    if plan.is_empty() {
        println!("{}", format_warning("No topic files found for the selected profiles"));
    }

    Ok(())
}

fn cmd_profiles(config: &Config) {
    for profile in &config.profiles {
        let state = if profile.enabled { "enabled" } else { "disabled" };
        println!("{} ({})", profile.name, state);
        if !profile.description.is_empty() {
            println!("  {}", profile.description);
        }
        for target in &profile.targets {
            let marker = if target.enabled { "" } else { " [disabled]" };
            println!(
                "  {} -> {}{}",
                target.input_dir.display(),
                target.output_dir.display(),
                marker
            );
        }
        for output in &profile.outputs {
            println!(
                "  {}*.{} {}",
                output.label,
                config.batch.output_extension,
                output.flags.to_args().join(" ")
            );
        }
    }
}

fn cmd_verify(config: &Config) -> Result<()> {
    let mut checks = Vec::new();

    let program = &config.tool.program;
    if program_available(program) {
        checks.push(HealthCheck::healthy(&format!("program {}", program)));
    } else {
        checks.push(HealthCheck::unhealthy(
            &format!("program {}", program),
            "not found on PATH".to_string(),
        ));
    }

    if let Some(ref script) = config.tool.script {
        checks.push(file_check("script", script));
    }
    if let Some(ref database) = config.tool.database {
        checks.push(file_check("database", database));
    }
    if let Some(ref dir) = config.tool.working_dir {
        let component = format!("working directory {}", dir.display());
        match Validator::validate_directory(dir) {
            Ok(()) => checks.push(HealthCheck::healthy(&component)),
            Err(e) => checks.push(HealthCheck::unhealthy(&component, e.to_string())),
        }
    }

    for profile in config.select_profiles(&[])? {
        for target in profile.active_targets() {
            let component = format!("{}: {}", profile.name, target.input_dir.display());
            match Validator::validate_directory(&target.input_dir) {
                Ok(()) => checks.push(HealthCheck::healthy(&component)),
                Err(e) => checks.push(HealthCheck::degraded(
                    &component,
                    format!("{}; no networks will be built from it", e),
                )),
            }
        }
    }

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    print!("{}", report.format());

    if report.overall_status == HealthStatus::Unhealthy {
        anyhow::bail!("environment check failed");
    }
    Ok(())
}

fn file_check(kind: &str, path: &Path) -> HealthCheck {
    let component = format!("{} {}", kind, path.display());
    match Validator::validate_file_path(path) {
        Ok(()) => HealthCheck::healthy(&component),
        Err(e) => HealthCheck::unhealthy(&component, e.to_string()),
    }
}

fn program_available(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }

    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
