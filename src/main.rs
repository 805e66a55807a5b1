use std::path::PathBuf;

use anyhow::{ensure, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod db;
mod error;
mod intake;
mod models;
mod projections;
mod report;
mod routes;
mod server;

use config::Config;

#[derive(Parser)]
#[command(name = "gaia-commons-petition")]
#[command(
    about = "Petition intake and projection service for the Gaia Commons Council campaign",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Seed the ballot measure slate if the store is empty
    Seed,
    /// Import signatures from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Run the HTTP API
    Serve,
    /// Print current campaign statistics
    Stats,
    /// Generate a markdown campaign report
    Report {
        #[arg(long, default_value_t = 12)]
        weeks: i32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Project schoolhouse impact metrics for a deployment scale
    Impact {
        #[arg(long)]
        schools: f64,
        #[arg(long, default_value_t = 938.0)]
        students_per_school: f64,
        #[arg(long, default_value_t = 7500.0)]
        greenhouse_sqft: f64,
    },
    /// Project endowment growth across the fifty-year horizon
    Endowment {
        #[arg(long, default_value_t = 5_000_000_000.0)]
        corpus: f64,
        #[arg(long, default_value_t = 0.045)]
        draw_rate: f64,
        #[arg(long, default_value_t = 0.07)]
        growth_rate: f64,
    },
    /// Size a greenhouse cluster for a district enrollment
    Cluster {
        #[arg(long)]
        enrollment: f64,
        #[arg(long, value_delimiter = ',')]
        yields: Vec<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            if db::seed_if_empty(&pool).await? {
                println!("Ballot measure slate seeded.");
            } else {
                println!("Store already seeded; nothing to do.");
            }
        }
        Commands::Import { csv } => {
            let pool = connect().await?;
            let summary = db::import_csv(&pool, &csv).await?;
            println!(
                "Imported {} signatures from {} ({} duplicates, {} invalid rows skipped).",
                summary.inserted,
                csv.display(),
                summary.duplicates,
                summary.invalid
            );
        }
        Commands::Serve => {
            let config = Config::from_env()?;
            let pool = connect_with(&config.database_url).await?;
            db::init_db(&pool).await?;
            if db::seed_if_empty(&pool).await? {
                println!("Ballot measure slate seeded.");
            }
            server::serve(config, pool).await?;
        }
        Commands::Stats => {
            let pool = connect().await?;
            let stats = intake::campaign_stats(&pool, Utc::now()).await?;

            println!(
                "Signatures: {} of {} ({:.1}% of goal)",
                stats.total_signatures, stats.signature_goal, stats.goal_percentage
            );
            println!("Unique voters: {}", stats.unique_voters);
            println!(
                "Days until filing deadline ({}): {}",
                stats.filing_deadline.date_naive(),
                stats.days_remaining
            );
            println!("Active ballot measures:");
            for proposal in &stats.active_proposals {
                println!(
                    "- {}: {} for / {} against (quorum {})",
                    proposal.title,
                    proposal.votes_for,
                    proposal.votes_against,
                    proposal.quorum_required
                );
            }
        }
        Commands::Report { weeks, out } => {
            let pool = connect().await?;
            let stats = intake::campaign_stats(&pool, Utc::now()).await?;
            let trends = db::fetch_weekly_counts(&pool, weeks).await?;
            let recent = db::fetch_recent_signatures(&pool, 10).await?;
            let report = report::build_report(&stats, &trends, &recent);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Impact {
            schools,
            students_per_school,
            greenhouse_sqft,
        } => {
            ensure!(schools > 0.0, "school count must be positive");
            ensure!(
                students_per_school > 0.0,
                "students per school must be positive"
            );
            ensure!(greenhouse_sqft > 0.0, "greenhouse sqft must be positive");

            let metrics = projections::impact_metrics(projections::ImpactInput {
                school_count: schools,
                avg_students_per_school: students_per_school,
                avg_greenhouse_sqft: greenhouse_sqft,
            });

            println!("Projected impact for {schools} schools:");
            println!("- {:.0} students reached", metrics.total_students);
            println!("- {:.0} sqft of greenhouse space", metrics.total_sqft);
            println!(
                "- {:.0} lbs of produce per year (${:.0} value)",
                metrics.annual_produce_lbs, metrics.annual_value
            );
            println!(
                "- {:.0} operating jobs, {} construction jobs",
                metrics.jobs_fte, metrics.construction_jobs
            );
            println!("- {} tons of CO2 offset per year", metrics.annual_co2_tons);
            println!(
                "- ${:.0} share of the statewide endowment",
                metrics.endowment_share
            );
        }
        Commands::Endowment {
            corpus,
            draw_rate,
            growth_rate,
        } => {
            ensure!(corpus > 0.0, "corpus must be positive");
            ensure!(
                (0.0..1.0).contains(&draw_rate),
                "draw rate must be a decimal in [0, 1)"
            );
            ensure!(
                (0.0..1.0).contains(&growth_rate),
                "growth rate must be a decimal in [0, 1)"
            );

            let series = projections::endowment_series(corpus, draw_rate, growth_rate);
            println!(
                "Endowment projection, {} through {}:",
                projections::SERIES_START_YEAR,
                projections::SERIES_END_YEAR
            );
            for point in series.iter().filter(|p| {
                (p.year - projections::SERIES_START_YEAR) % 10 == 0
                    || p.year == projections::SERIES_END_YEAR
            }) {
                println!(
                    "- {}: corpus {}, annual draw {}, cumulative draws {}",
                    point.year, point.corpus, point.annual_draw, point.cumulative_draws
                );
            }
        }
        Commands::Cluster { enrollment, yields } => {
            match projections::cluster_metrics(enrollment, &yields) {
                Some(metrics) => {
                    println!("Cluster sizing for {enrollment} students:");
                    println!(
                        "- {:.0} lbs of produce needed per year",
                        metrics.total_produce_needed_lbs
                    );
                    println!(
                        "- {} sqft across {} greenhouses (avg yield {:.1} lbs/sqft)",
                        metrics.sqft_needed, metrics.greenhouse_count, metrics.avg_yield_per_sqft
                    );
                    println!(
                        "- ${} to build, ${} per year to operate (${:.3} per meal)",
                        metrics.total_investment,
                        metrics.annual_operating_cost,
                        metrics.cost_per_meal
                    );
                }
                None => println!(
                    "Cluster sizing needs a positive enrollment and at least one produce yield."
                ),
            }
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;
    connect_with(&database_url).await
}

async fn connect_with(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}
