//! Pelletmon CLI
//!
//! Command-line interface for pelletmon operations:
//! - Start and stop sessions
//! - Log measurements
//! - Show session statistics
//! - Import measurement logs from CSV

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pelletmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pellet production monitoring")]
#[command(long_about = "Pelletmon tracks pellet measurement sessions.\nStart a session, log measurements, and get quality scores and trends.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8086", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a measurement session
    Start {
        /// Operator id
        operator: String,
    },

    /// Stop (seal) a session
    Stop {
        /// Session id
        session: Uuid,
    },

    /// Log a measurement to a session
    Log {
        /// Session id
        session: Uuid,
        /// Average pellet size (mm)
        avg_size: f64,
        /// Smallest pellet in the sample (mm)
        #[arg(long)]
        min: Option<f64>,
        /// Largest pellet in the sample (mm)
        #[arg(long)]
        max: Option<f64>,
        /// Pellet count in the sample
        #[arg(short, long, default_value = "0")]
        count: u32,
        /// Timestamp (default: now). Supports ISO 8601
        #[arg(short, long)]
        time: Option<String>,
    },

    /// List sessions
    Sessions,

    /// Show statistics for a session
    Stats {
        /// Session id
        session: Uuid,
    },

    /// Import measurements from CSV into a session
    Import {
        /// Session id
        session: Uuid,
        /// Path to CSV file
        path: PathBuf,
        /// Timestamp format (strftime format)
        #[arg(long, default_value = "%Y-%m-%d %H:%M:%S")]
        timestamp_format: String,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show system status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Start { operator } => {
            let body = serde_json::json!({ "operator_id": operator });

            let response = client
                .post(format!("{}/api/v1/sessions", cli.api_url))
                .json(&body)
                .send()
                .await?;

            if response.status().is_success() {
                let session: serde_json::Value = response.json().await?;
                println!(
                    "Started session {} for {}",
                    session["id"].as_str().unwrap_or("-"),
                    operator
                );
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Stop { session } => {
            let response = client
                .post(format!("{}/api/v1/sessions/{}/stop", cli.api_url, session))
                .send()
                .await?;

            if response.status().is_success() {
                let result: serde_json::Value = response.json().await?;
                let summary = &result["summary"];
                println!("Session {} sealed", session);
                println!(
                    "  {} measurements, {} pellets, quality {}",
                    summary["measurement_count"].as_u64().unwrap_or(0),
                    summary["total_pellets"].as_u64().unwrap_or(0),
                    summary["quality_score"].as_u64().unwrap_or(0)
                );
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Log {
            session,
            avg_size,
            min,
            max,
            count,
            time,
        } => {
            // Parse timestamp
            let timestamp = match time.as_deref() {
                None | Some("now") => Utc::now(),
                Some(s) => match chrono::DateTime::parse_from_rfc3339(s) {
                    Ok(dt) => dt.with_timezone(&Utc),
                    Err(_) => {
                        eprintln!("Invalid timestamp format: {}", s);
                        std::process::exit(1);
                    }
                },
            };

            let body = serde_json::json!({
                "timestamp": timestamp.to_rfc3339(),
                "avg_size": avg_size,
                "min_size": min,
                "max_size": max,
                "pellet_count": count,
            });

            let response = client
                .post(format!(
                    "{}/api/v1/sessions/{}/measurements",
                    cli.api_url, session
                ))
                .json(&body)
                .send()
                .await?;

            if response.status().is_success() {
                let result: serde_json::Value = response.json().await?;
                println!(
                    "Logged {:.2}mm x{} ({} measurements in session)",
                    avg_size,
                    count,
                    result["measurement_count"].as_u64().unwrap_or(0)
                );
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Sessions => {
            let response = client
                .get(format!("{}/api/v1/sessions", cli.api_url))
                .send()
                .await?;

            if !response.status().is_success() {
                eprintln!("Failed to fetch sessions: {}", response.status());
                std::process::exit(1);
            }

            let data: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
                return Ok(());
            }

            let sessions = data["sessions"].as_array().cloned().unwrap_or_default();
            if sessions.is_empty() {
                println!("No sessions yet.");
                println!();
                println!("Start one with:");
                println!("  pelletmon-cli start operator-7");
            } else {
                println!(
                    "{:<38} {:<14} {:<10} {:>8} {:>8}",
                    "ID", "Operator", "Status", "Readings", "Pellets"
                );
                println!("{}", "-".repeat(82));

                for session in sessions {
                    println!(
                        "{:<38} {:<14} {:<10} {:>8} {:>8}",
                        session["id"].as_str().unwrap_or("-"),
                        session["operator_id"].as_str().unwrap_or("-"),
                        session["status"].as_str().unwrap_or("-"),
                        session["measurement_count"].as_u64().unwrap_or(0),
                        session["total_pellets"].as_u64().unwrap_or(0)
                    );
                }
            }
        }

        Commands::Stats { session } => {
            let response = client
                .get(format!("{}/api/v1/sessions/{}/stats", cli.api_url, session))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let stats: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("Session {} ({})", session, stats["status"].as_str().unwrap_or("-"));
            println!();
            println!(
                "Sizes: avg={:.2}mm min={:.2}mm max={:.2}mm",
                stats["sizes"]["avg"].as_f64().unwrap_or(0.0),
                stats["sizes"]["min"].as_f64().unwrap_or(0.0),
                stats["sizes"]["max"].as_f64().unwrap_or(0.0)
            );
            println!(
                "Quality: {} (compliance {:.0}, consistency {:.0}, targeting {:.0}, completeness {:.0})",
                stats["quality"]["score"].as_u64().unwrap_or(0),
                stats["quality"]["size_compliance"].as_f64().unwrap_or(0.0),
                stats["quality"]["consistency"].as_f64().unwrap_or(0.0),
                stats["quality"]["targeting"].as_f64().unwrap_or(0.0),
                stats["quality"]["completeness"].as_f64().unwrap_or(0.0)
            );
            println!(
                "Output: {} pellets over {} measurements",
                stats["total_pellets"].as_u64().unwrap_or(0),
                stats["measurement_count"].as_u64().unwrap_or(0)
            );
            println!(
                "Rates: {:.1} pellets/min, {:.2} measurements/min",
                stats["production_rate"].as_f64().unwrap_or(0.0),
                stats["measurement_frequency"].as_f64().unwrap_or(0.0)
            );
        }

        Commands::Import {
            session,
            path,
            timestamp_format,
            dry_run,
        } => {
            use pelletmon::ingest::CsvImporter;

            if !path.exists() {
                eprintln!("File not found: {:?}", path);
                std::process::exit(1);
            }

            let importer = CsvImporter::new().with_timestamp_format(&timestamp_format);
            let result = importer.import(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no measurements were imported)");
            } else if !result.measurements.is_empty() {
                println!();
                println!("Importing measurements...");

                let mut success = 0;
                let mut failed = 0;

                for measurement in result.measurements {
                    let body = serde_json::json!({
                        "timestamp": measurement.timestamp.to_rfc3339(),
                        "avg_size": measurement.avg_size,
                        "min_size": measurement.min_size,
                        "max_size": measurement.max_size,
                        "pellet_count": measurement.pellet_count,
                    });

                    match client
                        .post(format!(
                            "{}/api/v1/sessions/{}/measurements",
                            cli.api_url, session
                        ))
                        .json(&body)
                        .send()
                        .await
                    {
                        Ok(resp) if resp.status().is_success() => success += 1,
                        _ => failed += 1,
                    }
                }

                println!("  Imported: {}", success);
                if failed > 0 {
                    println!("  Failed: {}", failed);
                }
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Pelletmon v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    if let Some(sessions) = health["sessions"].as_u64() {
                        println!("Sessions: {}", sessions);
                    }
                    if let Some(connections) = health["ws_connections"].as_u64() {
                        println!("Dashboard connections: {}", connections);
                    }
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Pelletmon API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Pelletmon API server is running:");
                    eprintln!("  cargo run --bin pelletmon-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = pelletmon::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
