//! roadmap — schedule a plan file from the command line.
//!
//! `roadmap plan <input.json>` prints the changelog, the per-initiative
//! schedule and a KPI summary (or the raw output with `--format json`).
//! `roadmap sample` prints the reference plan as JSON.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use u_roadmap::config::PlannerConfig;
use u_roadmap::models::{PlanInput, PlanOutput};
use u_roadmap::sample::sample_plan;
use u_roadmap::scheduler::{PlanKpi, RoadmapScheduler};
use u_roadmap::validation::validate_plan;

// ── CLI ─────────────────────────────────────────────────────────────

/// Capacity-aware roadmap scheduler.
#[derive(Parser, Debug)]
#[command(name = "roadmap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule a plan file.
    Plan {
        /// Plan input JSON.
        input: PathBuf,

        /// Planner config TOML.
        #[arg(long, env = "ROADMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Never allocate past a target window's end.
        #[arg(long)]
        strict_window: bool,

        /// Override the number of periods in the horizon.
        #[arg(long)]
        periods: Option<u32>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run input validation first and log findings.
        #[arg(long)]
        validate: bool,
    },
    /// Print the sample plan as JSON.
    Sample,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROADMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sample => {
            println!("{}", sample_plan().to_json_pretty()?);
        }
        Command::Plan {
            input,
            config,
            strict_window,
            periods,
            format,
            validate,
        } => {
            let config = match config {
                Some(path) => PlannerConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => PlannerConfig::default(),
            };

            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("reading plan {}", input.display()))?;
            let mut plan = PlanInput::from_json_str(&source)
                .with_context(|| format!("parsing plan {}", input.display()))?;

            config.apply_to(&mut plan.settings);
            if let Some(periods) = periods {
                plan.settings.total_periods = periods;
            }
            if strict_window {
                plan.settings.strict_window = true;
            }

            if validate {
                match validate_plan(&plan) {
                    Ok(()) => info!("plan passed validation"),
                    Err(errors) => {
                        for e in &errors {
                            warn!(kind = ?e.kind, "{}", e.message);
                        }
                    }
                }
            }

            let output = RoadmapScheduler::new()
                .with_thresholds(config.utilization)
                .schedule(&plan);

            match format {
                Format::Json => println!("{}", output.to_json_pretty()?),
                Format::Text => print!("{}", render_text(&output)),
            }
        }
    }
    Ok(())
}

fn render_text(output: &PlanOutput) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Changelog");
    for entry in &output.changelog {
        let _ = writeln!(out, "  [{}] {}", entry.level, entry.message);
    }

    let _ = writeln!(out, "\nSchedule");
    for item in &output.scheduled {
        let span = match (item.start_period, item.end_period) {
            (Some(s), Some(e)) => format!("S{s}-S{e}"),
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<28} {:<16} {:<4} {:<9} remaining {}",
            item.initiative_name,
            item.team_id,
            item.priority.to_string(),
            span,
            item.remaining_effort
        );
    }

    let kpi = PlanKpi::calculate(output);
    let _ = writeln!(out, "\nSummary");
    let _ = writeln!(
        out,
        "  placed {} / partial {} / blocked {} / invalid {}",
        kpi.placed, kpi.partially_placed, kpi.blocked, kpi.invalid
    );
    let _ = writeln!(
        out,
        "  effort placed {} of {}, window misses {}",
        kpi.placed_effort, kpi.total_effort, kpi.window_misses
    );
    let _ = writeln!(
        out,
        "  utilization avg {:.0}% peak {}% ({} hot cells)",
        kpi.avg_utilization_pct, kpi.peak_utilization_pct, kpi.hot_cells
    );
    out
}
