//! Command-line front end for player analyses.
//!
//! Every command prints pretty JSON on stdout.

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use insights_service::sweeper::spawn_sweeper;
use insights_service::{AnalysisStore, ArchiveFetcher, ChessComClient, Config, InsightsService};

const USAGE: &str = "usage: chess-insights <command>

commands:
  search <username>
  basic <username> [--max-games N]
  advanced <username> [--max-games N]
  show <analysis_id>
  export <analysis_id>
  status [analysis_id]
  sweep
  sweeper";

/// Parse --max-games N from CLI args
fn parse_max_games(args: &[String]) -> anyhow::Result<Option<usize>> {
    for i in 0..args.len() {
        if args[i] == "--max-games" {
            let value = args.get(i + 1).context("--max-games needs a value")?;
            let n = value
                .parse()
                .with_context(|| format!("invalid --max-games value {value:?}"))?;
            return Ok(Some(n));
        }
    }
    Ok(None)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn required<'a>(args: &'a [String], what: &str) -> anyhow::Result<&'a str> {
    match args.get(2) {
        Some(v) if !v.starts_with("--") => Ok(v),
        _ => bail!("missing {what}\n\n{USAGE}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        bail!("{USAGE}");
    };

    let store = AnalysisStore::open(&config.store_dir, config.store_ttl)
        .with_context(|| format!("failed to open store at {}", config.store_dir.display()))?;

    if command == "sweeper" {
        let handle = spawn_sweeper(store, config.sweep_interval);
        tokio::signal::ctrl_c().await?;
        info!("Shutting down sweeper");
        handle.abort();
        return Ok(());
    }

    let client = ChessComClient::new(&config).context("failed to build HTTP client")?;
    let service = InsightsService::new(client, ArchiveFetcher::from_config(&config), store);

    match command {
        "search" => {
            let username = required(&args, "username")?;
            print_json(&service.player_search(username).await?)?;
        }
        "basic" => {
            let username = required(&args, "username")?;
            let max_games = parse_max_games(&args)?.unwrap_or(config.basic_max_games);
            print_json(&service.basic_analysis(username, max_games).await?)?;
        }
        "advanced" => {
            let username = required(&args, "username")?;
            let max_games = parse_max_games(&args)?.unwrap_or(config.advanced_max_games);
            print_json(&service.advanced_analysis(username, max_games).await?)?;
        }
        "show" => {
            let id = required(&args, "analysis id")?;
            print_json(&service.load(id)?)?;
        }
        "export" => {
            let id = required(&args, "analysis id")?;
            print_json(&service.export(id)?)?;
        }
        "status" => {
            let id = args.get(2).map(String::as_str);
            print_json(&service.status(id))?;
        }
        "sweep" => {
            let deleted = service.store().sweep()?;
            print_json(&serde_json::json!({ "deleted": deleted }))?;
        }
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }

    Ok(())
}
