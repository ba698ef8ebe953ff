use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod chart;
mod config;
mod models;
mod prepare;
mod report;

#[derive(Parser)]
#[command(name = "skill-radar")]
#[command(about = "Renders a radar chart of skill proficiency scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample profile as a starting point
    Init {
        #[arg(long, default_value = "profile.json")]
        out: PathBuf,
    },
    /// Render the radar chart PNG
    #[command(group(
        ArgGroup::new("source")
            .args(["profile", "csv"])
            .required(true)
            .multiple(false)
    ))]
    Render {
        /// Profile JSON with skills and proficiency bands
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Skill CSV (name,level); pairs with the default bands
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value = "radar_chart.png")]
        out: PathBuf,
        #[arg(long, default_value_t = chart::DEFAULT_WIDTH)]
        width: u32,
        #[arg(long, default_value_t = chart::DEFAULT_HEIGHT)]
        height: u32,
        #[arg(long, default_value_t = chart::DEFAULT_MARGIN)]
        margin: u32,
        /// Line width of the skill trace
        #[arg(long, default_value_t = 4.0)]
        line_width: f64,
    },
    /// Print a plain-text summary of skills and their bands
    #[command(group(
        ArgGroup::new("source")
            .args(["profile", "csv"])
            .required(true)
            .multiple(false)
    ))]
    Summary {
        /// Profile JSON with skills and proficiency bands
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Skill CSV (name,level); pairs with the default bands
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the summary here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_source(profile: Option<&Path>, csv: Option<&Path>) -> anyhow::Result<config::Profile> {
    match (profile, csv) {
        (Some(path), _) => config::load_profile(path),
        (_, Some(path)) => config::load_csv(path),
        (None, None) => anyhow::bail!("either --profile or --csv is required"),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { out } => {
            config::write_profile(&config::sample_profile(), &out)?;
            println!("Sample profile written to {}.", out.display());
        }
        Commands::Render {
            profile,
            csv,
            out,
            width,
            height,
            margin,
            line_width,
        } => {
            let source = load_source(profile.as_deref(), csv.as_deref())?;
            let dataset = prepare::prepare(&source.skills, &source.bands)?;
            info!(
                skills = dataset.skill_count(),
                bands = dataset.band_names.len(),
                "prepared chart dataset"
            );

            let options = chart::RenderOptions {
                width,
                height,
                margin,
                skill_style: models::TraceStyle::new(models::FillMode::None, 1.0, line_width)?,
                ..chart::RenderOptions::default()
            };
            chart::render_png(&dataset, &out, &options)?;
            println!("Radar chart written to {}.", out.display());
        }
        Commands::Summary { profile, csv, out } => {
            let source = load_source(profile.as_deref(), csv.as_deref())?;
            let dataset = prepare::prepare(&source.skills, &source.bands)?;
            let summary = report::build_summary(&dataset, &source.bands, Utc::now().date_naive());

            match out {
                Some(path) => {
                    std::fs::write(&path, summary)
                        .with_context(|| format!("failed to write summary: {}", path.display()))?;
                    println!("Summary written to {}.", path.display());
                }
                None => print!("{summary}"),
            }
        }
    }

    Ok(())
}
