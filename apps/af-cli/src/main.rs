use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use af_app::{
    AppError, AppResult, Notice, ReplayOptions, ReplayReport, list_sessions, load_session,
    replay_file, summarize_session,
};
use af_config::DashboardConfig;
use af_controls::ControlMode;
use af_telemetry::{Metric, MetricStats, Status, Summary};

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "AgriFlow CLI - greenhouse telemetry and actuator control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a dashboard config file
    Validate {
        /// Path to the config YAML file
        config_path: PathBuf,
    },
    /// Print the default config as YAML
    Defaults,
    /// Replay a JSON-lines file of store snapshots through the dashboard
    Replay {
        /// Snapshot file, one JSON object per line
        input: PathBuf,
        /// Path to the config YAML file (defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Control mode to switch to before the first snapshot
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Make the first N store writes fail
        #[arg(long, default_value_t = 0)]
        fail_writes: usize,
        /// Record the replay as a session under this directory
        #[arg(long)]
        record: Option<PathBuf>,
        /// Print the final dashboard view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recorded sessions
    Sessions {
        /// Session directory
        dir: PathBuf,
    },
    /// Show details of a recorded session
    ShowSession {
        /// Session directory
        dir: PathBuf,
        /// Session ID to display
        session_id: String,
    },
    /// Export one metric of a recorded session as CSV
    ExportSeries {
        /// Session directory
        dir: PathBuf,
        /// Session ID
        session_id: String,
        /// Metric to export
        #[arg(value_enum)]
        metric: MetricArg,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Manual,
    Auto,
}

impl From<ModeArg> for ControlMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Manual => ControlMode::Manual,
            ModeArg::Auto => ControlMode::Auto,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Temperature,
    Humidity,
    SoilMoisture,
    Sunlight,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Temperature => Metric::Temperature,
            MetricArg::Humidity => Metric::Humidity,
            MetricArg::SoilMoisture => Metric::SoilMoisture,
            MetricArg::Sunlight => Metric::Sunlight,
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Defaults => cmd_defaults(),
        Commands::Replay {
            input,
            config,
            mode,
            fail_writes,
            record,
            json,
        } => {
            let options = ReplayOptions {
                mode: mode.map(ControlMode::from),
                fail_writes,
                record_dir: record,
            };
            cmd_replay(&input, config.as_deref(), &options, json)
        }
        Commands::Sessions { dir } => cmd_sessions(&dir),
        Commands::ShowSession { dir, session_id } => cmd_show_session(&dir, &session_id),
        Commands::ExportSeries {
            dir,
            session_id,
            metric,
            output,
        } => cmd_export_series(&dir, &session_id, metric.into(), output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> AppResult<DashboardConfig> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            Ok(af_config::load_yaml(path)?)
        }
        None => {
            tracing::info!("no config given, using defaults");
            Ok(DashboardConfig::default())
        }
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = af_config::load_yaml(config_path)?;
    tracing::info!(path = %config_path.display(), name = %config.name, "config validated");
    println!("✓ Config is valid ({})", config.name);
    println!("  History capacity: {}", config.history.capacity);
    println!(
        "  Light: on below {}, off at {}",
        config.auto.light.low, config.auto.light.high
    );
    println!(
        "  Pump: on below {}, off at {}",
        config.auto.pump.low, config.auto.pump.high
    );
    Ok(())
}

fn cmd_defaults() -> AppResult<()> {
    let yaml = serde_yaml::to_string(&DashboardConfig::default())
        .map_err(|e| AppError::Config(e.to_string()))?;
    print!("{}", yaml);
    Ok(())
}

fn cmd_replay(
    input: &Path,
    config_path: Option<&Path>,
    options: &ReplayOptions,
    json: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    println!("Replaying {} ({})", input.display(), config.name);

    let report = replay_file(
        &config,
        input,
        options,
        Some(&mut |notice: &Notice| {
            println!("  [{}] {}", notice.level.label(), notice.message);
        }),
    )?;

    tracing::info!(
        readings = report.readings,
        commands = report.commands.len(),
        "replay done"
    );
    print_replay_report(&report);

    if json {
        let view = serde_json::to_string_pretty(&report.view)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{}", view);
    }
    Ok(())
}

fn print_replay_report(report: &ReplayReport) {
    println!("\n✓ Replay completed");
    println!("  Readings: {}", report.readings);
    if report.empty_pushes > 0 {
        println!("  Empty pushes: {}", report.empty_pushes);
    }
    if report.ingress_errors > 0 {
        println!("  Ingress errors: {}", report.ingress_errors);
    }

    let engine = report.view.engine;
    println!(
        "  Auto evaluations: {} (skipped while in flight: {})",
        engine.evaluated, engine.skipped_in_flight
    );

    println!("\nCommands:");
    if report.commands.is_empty() {
        println!("  (none)");
    }
    for record in &report.commands {
        let status = if record.ok { "ok" } else { "FAILED" };
        println!(
            "  {} {:<6} {} [{}]",
            record.timestamp,
            format!("{:?}", record.origin).to_lowercase(),
            record.command,
            status
        );
    }

    println!("\nFinal state:");
    println!("  Mode: {}", report.view.mode);
    println!(
        "  Light: {}  Pump: {}",
        on_off(report.store.light),
        on_off(report.store.pump)
    );

    print_summary(&report.view.summary);

    if let Some(assessment) = &report.view.assessment {
        println!("\nLatest reading:");
        for metric in Metric::TRACKED {
            if let Some(status) = assessment.get(metric) {
                let label = match status {
                    Status::Normal => "Normal",
                    Status::Warning => "Warning",
                };
                println!("  {}: {}", metric, label);
            }
        }
    }

    if let Some(session_id) = &report.session_id {
        println!("\n✓ Session recorded: {}", session_id);
    }
}

fn print_summary(summary: &Summary) {
    println!("\nAnalytics ({} samples):", summary.samples);
    for metric in Metric::TRACKED {
        match summary.get(metric) {
            Some(MetricStats { mean, min, max, .. }) => println!(
                "  {:<14} mean={:.2}  min={:.2}  max={:.2}",
                metric.label(),
                mean,
                min,
                max
            ),
            None => println!("  {:<14} no data", metric.label()),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn cmd_sessions(dir: &Path) -> AppResult<()> {
    let sessions = list_sessions(dir)?;

    if sessions.is_empty() {
        println!("No recorded sessions in {}", dir.display());
    } else {
        println!("Sessions:");
        for manifest in sessions {
            println!(
                "  {} {} ({} readings, started {})",
                manifest.session_id, manifest.name, manifest.reading_count, manifest.started_at
            );
        }
    }
    Ok(())
}

fn cmd_show_session(dir: &Path, session_id: &str) -> AppResult<()> {
    println!("Loading session: {}", session_id);

    let (manifest, readings, commands) = load_session(dir, session_id)?;
    let summary = summarize_session(&readings, &commands);

    println!("\nSession Summary:");
    println!("  Name: {}", manifest.name);
    println!("  Started: {}", manifest.started_at);
    println!("  Ended: {}", manifest.ended_at);
    println!("  Final mode: {}", manifest.final_mode);
    if let Some((first, last)) = &summary.time_range {
        println!("  Readings: {} ({} - {})", readings.len(), first, last);
    } else {
        println!("  Readings: 0");
    }
    println!(
        "  Commands: {} ({} failed)",
        summary.commands, summary.failed_commands
    );

    print_summary(&summary.summary);

    Ok(())
}

fn cmd_export_series(
    dir: &Path,
    session_id: &str,
    metric: Metric,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, readings, _commands) = load_session(dir, session_id)?;
    tracing::info!(session_id, %metric, points = readings.len(), "exporting series");

    // Build CSV
    let mut csv = String::from("timestamp,value\n");
    for reading in &readings {
        csv.push_str(&format!("{},{}\n", reading.timestamp, reading.value(metric)));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            readings.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
