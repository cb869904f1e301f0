use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use detailpic::config::Settings;
use detailpic::db;
use detailpic::page::PageInput;
use detailpic::parser::Pipeline;
use detailpic::snapshot;

#[derive(Parser)]
#[command(name = "detailpic", about = "Listing attribute extraction and theme matching")]
struct Cli {
    /// SQLite store (overrides DETAILPIC_DB_PATH / detailpic.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one page snapshot and print attributes and theme as JSON
    Extract {
        /// Page snapshot JSON file
        file: PathBuf,
    },
    /// Process every snapshot in a directory and store the results
    Run {
        /// Directory of page snapshot JSON files
        dir: PathBuf,
        /// Max snapshots to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show stored listing statistics
    Stats,
    /// Stored listings overview table
    Overview {
        /// Filter by detection method (color+family, color, special-effect, name, color-category, none)
        #[arg(short, long)]
        method: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let db_path = cli.db.unwrap_or_else(|| settings.db_path.clone());

    let result = match cli.command {
        Commands::Extract { file } => {
            let pipeline = settings.pipeline()?;
            let page = snapshot::load_file(&file)?;
            let listing = pipeline.process_page(&page);
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(())
        }
        Commands::Run { dir, limit } => {
            let pipeline = settings.pipeline()?;
            let pages = snapshot::load_dir(&dir, limit)?;
            if pages.is_empty() {
                println!("No snapshots found in {}.", dir.display());
                return Ok(());
            }

            let conn = db::connect(&db_path)
                .with_context(|| format!("opening {}", db_path.display()))?;
            db::init_schema(&conn)?;

            let run_id = db::new_run_id(Utc::now());
            info!(%run_id, pages = pages.len(), "starting run");
            println!("Processing {} snapshots...", pages.len());
            let counts = process_pages(&conn, &pipeline, &pages, &run_id)?;
            counts.print();
            Ok(())
        }
        Commands::Overview { method, limit } => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, method.as_deref(), limit)?;

            if rows.is_empty() {
                println!("No listings stored. Run 'run <DIR>' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<36} | {:<16} | {:<14} | {:<12} | {:<7}",
                "#", "Product", "Theme", "Method", "Detected", "Primary"
            );
            println!("{}", "-".repeat(102));

            for (i, r) in rows.iter().enumerate() {
                let name = if r.product_name.is_empty() {
                    truncate(&r.source, 36)
                } else {
                    truncate(&r.product_name, 36)
                };
                println!(
                    "{:>3} | {:<36} | {:<16} | {:<14} | {:<12} | {:<7}",
                    i + 1,
                    name,
                    truncate(&r.theme_name, 16),
                    r.detection_method,
                    truncate(&r.detected, 12),
                    r.primary_color
                );
            }

            println!("\n{} listings", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Listings: {}", s.total);
            println!("Runs:     {}", s.runs);
            if !s.by_method.is_empty() {
                println!("\nBy detection method:");
                for (method, n) in &s.by_method {
                    println!("  {:<16} {}", method, n);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Default)]
struct ProcessCounts {
    listings: usize,
    attributes: usize,
    themed: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} listings ({} attributes, {} matched a theme).",
            self.listings, self.attributes, self.themed,
        );
    }
}

fn process_pages(
    conn: &rusqlite::Connection,
    pipeline: &Pipeline,
    pages: &[PageInput],
    run_id: &str,
) -> anyhow::Result<ProcessCounts> {
    use detailpic::theme::DetectionMethod;
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts::default();

    for chunk in pages.chunks(500) {
        let listings: Vec<_> = chunk.par_iter().map(|p| pipeline.process_page(p)).collect();
        let processed_at = Utc::now();

        let rows: Vec<_> = listings
            .iter()
            .map(|l| {
                counts.attributes += l.attributes.len();
                if l.theme.detection_method != DetectionMethod::None {
                    counts.themed += 1;
                }
                db::ListingRow::new(l, run_id, processed_at)
            })
            .collect();

        counts.listings += db::save_listings(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
