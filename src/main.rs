mod cli;
mod config;
mod db;
mod engine;
mod error;
mod models;

use clap::Parser;
use cli::{Cli, Commands, PlotCommands};
use config::Config;
use db::Database;
use engine::{progress, recommend, risk};
use engine::{IndexSource, SyntheticIndexSource};
use error::{Result, TerraMindError};
use models::{
    AnalysisMethod, AnalysisSnapshot, LandPlot, ProgressOutcome, ReflectanceBands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => run_init(cli.data_dir.as_ref()),
        Commands::Check => run_check(cli.config, cli.data_dir.as_ref()),
        command => {
            let config = Config::load_or_default(cli.config);
            let db = Database::open(cli.data_dir.as_ref())?;
            match command {
                Commands::Plot { command } => run_plot(&db, &config, command),
                Commands::Analyze {
                    plot,
                    red,
                    nir,
                    blue,
                    seed,
                    json,
                } => run_analyze(&db, &config, plot, red, nir, blue, seed, json),
                Commands::Recommend {
                    plot,
                    analysis,
                    json,
                } => run_recommend(&db, plot, analysis, json),
                Commands::Progress { plot, json } => run_progress(&db, plot, json),
                Commands::History { plot, json } => run_history(&db, plot, json),
                Commands::Init | Commands::Check => unreachable!(),
            }
        }
    }
}

fn run_init(data_dir_override: Option<&std::path::PathBuf>) -> Result<()> {
    if Config::exists(None) {
        println!("Existing configuration found; answers below will replace it.");
    }
    let (_, path) = Config::setup_interactive()?;
    tracing::debug!("Config written to {}", path.display());

    // Create the database up front so first use is fast
    let db = Database::open(data_dir_override)?;
    println!("Database ready at {}", db.path().display());
    Ok(())
}

fn run_check(
    config_override: Option<std::path::PathBuf>,
    data_dir_override: Option<&std::path::PathBuf>,
) -> Result<()> {
    match Config::load(config_override) {
        Ok(config) => println!("Config: OK ({})", config.farm.name),
        Err(e) => println!("Config: MISSING ({})", e),
    }

    match Database::open(data_dir_override) {
        Ok(db) => {
            let plots = db.list_plots()?;
            println!("Database: OK ({} plots)", plots.len());
        }
        Err(e) => println!("Database: FAILED ({})", e),
    }

    Ok(())
}

fn run_plot(db: &Database, config: &Config, command: PlotCommands) -> Result<()> {
    match command {
        PlotCommands::Add {
            name,
            latitude,
            longitude,
            area,
            notes,
        } => {
            let latitude = latitude.or(config.farm.default_latitude).ok_or_else(|| {
                TerraMindError::InvalidData(
                    "latitude required (none given and no config default)".into(),
                )
            })?;
            let longitude = longitude.or(config.farm.default_longitude).ok_or_else(|| {
                TerraMindError::InvalidData(
                    "longitude required (none given and no config default)".into(),
                )
            })?;

            let mut plot = LandPlot::new(name, latitude, longitude)?;
            if let Some(area) = area {
                plot = plot.with_area(area);
            }
            if let Some(notes) = notes {
                plot = plot.with_notes(notes);
            }

            let id = db.create_plot(&plot)?;
            println!("Registered plot {} ({})", id, plot.name);
        }
        PlotCommands::List => {
            let plots = db.list_plots()?;
            if plots.is_empty() {
                println!("No plots registered. Add one with `terramind plot add`.");
                return Ok(());
            }
            for plot in plots {
                let area = plot
                    .area_hectares
                    .map(|a| format!("{} ha", a))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>4}  {:<24} {:>9.4}, {:>9.4}  {}",
                    plot.id.unwrap_or_default(),
                    plot.name,
                    plot.latitude,
                    plot.longitude,
                    area
                );
            }
        }
        PlotCommands::Remove { id } => {
            db.delete_plot(id)?;
            println!("Removed plot {}", id);
        }
    }
    Ok(())
}

fn run_analyze(
    db: &Database,
    config: &Config,
    plot_id: i64,
    red: Option<f64>,
    nir: Option<f64>,
    blue: Option<f64>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let plot = db
        .get_plot(plot_id)?
        .ok_or_else(|| TerraMindError::NotFound(format!("plot {}", plot_id)))?;

    let (readings, method) = match (red, nir, blue) {
        (Some(red), Some(nir), Some(blue)) => (
            engine::indices::compute_from_bands(ReflectanceBands { red, nir, blue }),
            AnalysisMethod::Bands,
        ),
        _ => {
            let mut source = match seed.or(config.analysis.seed) {
                Some(seed) => SyntheticIndexSource::with_seed(seed),
                None => SyntheticIndexSource::new(),
            };
            (
                source.estimate(plot.latitude, plot.longitude),
                AnalysisMethod::Coordinates,
            )
        }
    };

    let degradation_risk = risk::classify(readings.ndvi, readings.soil_quality);
    let mut snapshot = AnalysisSnapshot::new(plot_id, readings, degradation_risk, method);
    snapshot.id = Some(db.insert_snapshot(&snapshot)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Analysis for {} ({})", plot.name, method);
    println!("  NDVI:             {:.4}", snapshot.ndvi);
    println!("  EVI:              {:.4}", snapshot.evi);
    println!("  Soil quality:     {:.2}", snapshot.soil_quality);
    println!("  Water stress:     {:.2}", snapshot.water_stress);
    println!("  Degradation risk: {}", snapshot.degradation_risk);
    println!();
    println!("  Vegetation: {}", snapshot.vegetation_health());
    println!("  Soil:       {}", snapshot.soil_condition());
    println!("  Water:      {}", snapshot.water_status());
    Ok(())
}

fn run_recommend(db: &Database, plot_id: i64, analysis: Option<i64>, json: bool) -> Result<()> {
    let plot = db
        .get_plot(plot_id)?
        .ok_or_else(|| TerraMindError::NotFound(format!("plot {}", plot_id)))?;

    let snapshot = match analysis {
        Some(id) => {
            let snapshot = db
                .get_snapshot(id)?
                .ok_or_else(|| TerraMindError::NotFound(format!("analysis {}", id)))?;
            if snapshot.plot_id != plot_id {
                return Err(TerraMindError::InvalidData(format!(
                    "analysis {} belongs to plot {}, not plot {}",
                    id, snapshot.plot_id, plot_id
                )));
            }
            snapshot
        }
        None => db.latest_snapshot(plot_id)?.ok_or_else(|| {
            TerraMindError::NotFound(format!(
                "no analyses for plot {}; run `terramind analyze` first",
                plot_id
            ))
        })?,
    };

    let recommendations = recommend::score(&snapshot, recommend::REGISTRY);
    let analysis_id = snapshot.id.ok_or_else(|| {
        TerraMindError::InvalidData("snapshot loaded from storage has no id".into())
    })?;
    db.insert_recommendations(plot_id, analysis_id, &recommendations)?;

    let summary = recommend::summarize(&recommendations, snapshot.degradation_risk);

    if json {
        let payload = serde_json::json!({
            "recommendations": recommendations,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "Recommendations for {} (risk: {})",
        plot.name, snapshot.degradation_risk
    );
    if recommendations.is_empty() {
        println!("  No suitable options for the current readings.");
        return Ok(());
    }
    for rec in &recommendations {
        println!();
        println!(
            "  [{}] {} ({}, confidence {:.2})",
            rec.priority, rec.name, rec.kind, rec.confidence
        );
        println!("      {}", rec.reason);
        println!(
            "      Expected: NDVI +{:.2}, soil +{:.0} over {}",
            rec.expected_impact.ndvi_increase,
            rec.expected_impact.soil_improvement,
            rec.expected_impact.timeframe
        );
        println!("      {}", rec.implementation_notes);
    }
    println!();
    println!(
        "  {} options, {} urgent. Focus: {}",
        summary.total, summary.urgent_actions, summary.focus_area
    );
    Ok(())
}

fn run_progress(db: &Database, plot_id: i64, json: bool) -> Result<()> {
    let plot = db
        .get_plot(plot_id)?
        .ok_or_else(|| TerraMindError::NotFound(format!("plot {}", plot_id)))?;

    let history = db.snapshots_for_plot(plot_id)?;
    let outcome = progress::track(&history);

    let report = match outcome {
        ProgressOutcome::InsufficientData { data_points } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!(
                    "Insufficient data for progress tracking: {} analyses stored, need at least 2.",
                    data_points
                );
            }
            return Ok(());
        }
        ProgressOutcome::Report(report) => report,
    };

    let mut impact = report.impact.clone();
    impact.id = Some(db.insert_impact_log(&impact)?);

    if json {
        let payload = serde_json::json!({
            "impact": impact,
            "dataPoints": report.data_points,
            "timeSeries": report.time_series,
            "insights": report.insights,
            "recommendedActions": report.recommended_actions,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "Progress for {} over {} days ({} analyses)",
        plot.name, impact.period_days, report.data_points
    );
    println!("  Trend:            {}", impact.trend);
    println!("  Improvement:      {:.2}%", impact.improvement_pct);
    println!("  NDVI delta:       {:+.4}", impact.ndvi_delta);
    println!("  EVI delta:        {:+.4}", impact.evi_delta);
    println!("  Soil delta:       {:+.2}", impact.soil_quality_delta);

    if !report.insights.is_empty() {
        println!();
        for insight in &report.insights {
            println!("  * {}", insight);
        }
    }

    println!();
    println!("  Next steps:");
    for action in report.recommended_actions {
        println!("    - {}", action);
    }
    Ok(())
}

fn run_history(db: &Database, plot_id: i64, json: bool) -> Result<()> {
    let plot = db
        .get_plot(plot_id)?
        .ok_or_else(|| TerraMindError::NotFound(format!("plot {}", plot_id)))?;

    let history = db.snapshots_for_plot(plot_id)?;
    let impact_logs = db.impact_logs_for_plot(plot_id)?;
    let latest_recommendations = match history.last().and_then(|s| s.id) {
        Some(analysis_id) => db.recommendations_for_analysis(analysis_id)?,
        None => Vec::new(),
    };

    if json {
        let payload = serde_json::json!({
            "analyses": history,
            "impactLogs": impact_logs,
            "latestRecommendations": latest_recommendations,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("History for {} ({} analyses)", plot.name, history.len());
    for snapshot in &history {
        println!(
            "  {}  ndvi {:.4}  evi {:.4}  soil {:>6.2}  water {:>6.2}  {}",
            snapshot.analyzed_at.format("%Y-%m-%d"),
            snapshot.ndvi,
            snapshot.evi,
            snapshot.soil_quality,
            snapshot.water_stress,
            snapshot.degradation_risk
        );
    }

    if !impact_logs.is_empty() {
        println!();
        println!("  Impact logs:");
        for log in &impact_logs {
            println!(
                "    {}  {} days  {}  {:+.2}%",
                log.created_at.format("%Y-%m-%d"),
                log.period_days,
                log.trend,
                log.improvement_pct
            );
        }
    }

    if !latest_recommendations.is_empty() {
        println!();
        println!("  Stored recommendations for the latest analysis:");
        for rec in &latest_recommendations {
            println!(
                "    [{}] {} (confidence {:.2})",
                rec.priority, rec.name, rec.confidence
            );
        }
    }
    Ok(())
}
