use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tripweave_shared::MapPoint;

mod cli;

/// tripweave - multi-city trip planning
#[derive(Parser)]
#[command(name = "tripweave")]
#[command(about = "Plan multi-city trips with generated itineraries and maps", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an itinerary and its maps from a trip file
    Plan {
        /// JSON file with destinations, dates and picks
        #[arg(long)]
        trip: PathBuf,

        /// Output directory (overrides config file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Identify the city under a point of a map image
    Locate {
        /// PNG map to look at
        #[arg(long, conflicts_with = "render", required_unless_present = "render")]
        image: Option<PathBuf>,

        /// Render a base map of this region first and look at it
        #[arg(long)]
        render: Option<String>,

        #[arg(long)]
        x: u32,

        #[arg(long)]
        y: u32,

        /// Image width in pixels
        #[arg(long)]
        width: u32,

        /// Image height in pixels
        #[arg(long)]
        height: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = tripweave::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    tripweave::observability::init_observability(
        "tripweave",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Plan { trip, out } => {
            if let Some(out) = out {
                config.output.dir = out;
            }

            cli::plan::plan(config, &trip).await
        }
        Commands::Locate {
            image,
            render,
            x,
            y,
            width,
            height,
        } => {
            let point = MapPoint {
                x,
                y,
                width,
                height,
            };

            cli::locate::locate(config, image, render, point).await
        }
    }
}
