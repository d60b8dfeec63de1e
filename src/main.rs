mod config;
mod fetch;
mod parser;
mod records;
mod roads;
mod scraper;
mod sink;
mod text;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use url::Url;

use config::ScrapeConfig;
use fetch::Fetcher;
use sink::TrafficData;

#[derive(Parser)]
#[command(name = "tmda_scraper", about = "DNV traffic-volume (TMDA) scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape years/roads and save the workbook
    Scrape {
        /// Year to scrape (repeatable, e.g. -y 2010 -y 2011)
        #[arg(short = 'y', long = "year", required = true)]
        years: Vec<String>,
        /// Road id to scrape (repeatable; default: every road on the index)
        #[arg(short = 'r', long = "road")]
        roads: Vec<String>,
        /// Output workbook path
        #[arg(short, long, default_value = "tmda.xlsx")]
        output: PathBuf,
        /// Max concurrent detail-page fetches per road
        #[arg(long, default_value_t = 10)]
        concurrency: usize,
    },
    /// List the road links discovered on one year's index page
    Roads {
        #[arg(short = 'y', long = "year")]
        year: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            years,
            roads,
            output,
            concurrency,
        } => {
            let cfg = ScrapeConfig {
                years,
                roads: if roads.is_empty() { None } else { Some(roads) },
                concurrency,
                ..ScrapeConfig::default()
            };
            let stats = scrape_traffic_data(&cfg, &output).await?;
            stats.print();
            Ok(())
        }
        Commands::Roads { year } => {
            let cfg = ScrapeConfig::default();
            let fetcher = Fetcher::new(cfg.timeout_secs, cfg.max_retries)?;
            let links = roads::fetch_road_links(&fetcher, &cfg, &year).await?;
            if links.is_empty() {
                println!("No road links found for {}.", year);
                return Ok(());
            }
            for (id, url) in &links {
                println!("{:>6}  {}", id, url);
            }
            println!("\n{} roads", links.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

#[derive(Default)]
struct RunStats {
    years: usize,
    roads: usize,
    sections: usize,
    detail_records: usize,
    rows_seen: usize,
    rows_matched: usize,
}

impl RunStats {
    fn print(&self) {
        println!(
            "Scraped {} roads across {} years: {} sections, {} detail records.",
            self.roads, self.years, self.sections, self.detail_records
        );
        println!(
            "Rows seen: {}, accepted as sections: {}.",
            self.rows_seen, self.rows_matched
        );
    }
}

/// Scrape every configured year/road and save the workbook. A year whose
/// index cannot be fetched is skipped, as is any single road that fails;
/// a road that yields zero sections completes normally and contributes
/// no records.
async fn scrape_traffic_data(cfg: &ScrapeConfig, output: &Path) -> anyhow::Result<RunStats> {
    let fetcher = Fetcher::new(cfg.timeout_secs, cfg.max_retries)?;
    let mut data = TrafficData::new();
    let mut stats = RunStats::default();

    for year in &cfg.years {
        let links = match roads::fetch_road_links(&fetcher, cfg, year).await {
            Ok(links) => links,
            Err(e) => {
                warn!("skipping year {}: {}", year, e);
                continue;
            }
        };
        stats.years += 1;

        let selected: Vec<(String, Url)> = match &cfg.roads {
            Some(allow) => allow
                .iter()
                .filter_map(|id| match links.get(id) {
                    Some(url) => Some((id.clone(), url.clone())),
                    None => {
                        warn!("road {} not on the {} index; skipping", id, year);
                        None
                    }
                })
                .collect(),
            None => links
                .iter()
                .map(|(id, url)| (id.clone(), url.clone()))
                .collect(),
        };

        let pb = indicatif::ProgressBar::new(selected.len() as u64);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );

        for (road_id, road_url) in &selected {
            pb.set_message(format!("{}/{}", year, road_id));
            info!("scraping road {} for year {}", road_id, year);

            let scan = match scraper::scrape_road(&fetcher, road_id, road_url, cfg).await {
                Ok(scan) => scan,
                Err(e) => {
                    warn!("skipping road {} ({}): {}", road_id, year, e);
                    pb.inc(1);
                    continue;
                }
            };
            if scan.sections.is_empty() {
                warn!(
                    "road {} ({}): no section rows recognized out of {} rows",
                    road_id, year, scan.rows_seen
                );
            }

            let detail_records = parser::flatten::flatten_details(&scan.sections, &scan.details);

            stats.roads += 1;
            stats.sections += scan.sections.len();
            stats.detail_records += detail_records.len();
            stats.rows_seen += scan.rows_seen;
            stats.rows_matched += scan.rows_matched;

            for record in scan.sections {
                data.write_simple(record);
            }
            for record in detail_records {
                data.write_details(record);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    data.save(output)?;
    info!(
        "saved {} sections and {} detail records to {}",
        data.simple_count(),
        data.details_count(),
        output.display()
    );
    Ok(stats)
}
