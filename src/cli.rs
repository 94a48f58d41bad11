use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terramind", version, about = "Land health monitoring CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config and database
    Check,
    /// Manage land plots
    Plot {
        #[command(subcommand)]
        command: PlotCommands,
    },
    /// Analyze a plot and store the resulting snapshot
    Analyze {
        /// Plot id
        plot: i64,

        /// Red band reflectance (requires --nir and --blue)
        #[arg(long, requires_all = ["nir", "blue"])]
        red: Option<f64>,

        /// Near-infrared band reflectance
        #[arg(long, requires_all = ["red", "blue"])]
        nir: Option<f64>,

        /// Blue band reflectance
        #[arg(long, requires_all = ["red", "nir"])]
        blue: Option<f64>,

        /// Seed for the synthetic estimator (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score regenerative recommendations for a plot's analysis
    Recommend {
        /// Plot id
        plot: i64,

        /// Score a specific analysis instead of the latest
        #[arg(long)]
        analysis: Option<i64>,

        /// Emit recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track progress between a plot's oldest and newest analyses
    Progress {
        /// Plot id
        plot: i64,

        /// Emit the progress report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a plot's stored analysis history
    History {
        /// Plot id
        plot: i64,

        /// Emit the history as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PlotCommands {
    /// Register a new plot
    Add {
        /// Plot name
        name: String,

        /// Latitude in degrees (falls back to the config default)
        #[arg(long)]
        latitude: Option<f64>,

        /// Longitude in degrees (falls back to the config default)
        #[arg(long)]
        longitude: Option<f64>,

        /// Plot area in hectares
        #[arg(long)]
        area: Option<f64>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List registered plots
    List,
    /// Remove a plot and its stored analyses
    Remove {
        /// Plot id
        id: i64,
    },
}
