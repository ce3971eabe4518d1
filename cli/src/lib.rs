use crate::cli::{Cli, RootCommands};
use clap::Parser;
use log::{error, info, warn, Level};
use serde::Serialize;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use txpage_clients::fixture::FixtureSet;
use txpage_clients::rpc::ledger::LedgerClient;
use txpage_core::config::PagerConfig;
use txpage_core::errors::PagerError;
use txpage_core::network::Network;
use txpage_core::projection::DisplayRow;
use txpage_core::query::page_from_query;
use txpage_explorer::fetcher::{RpcSource, TransactionFetcher};
use txpage_explorer::state::LoadState;
use txpage_explorer::view::{Pagination, TransactionView};
use txpage_logger::{parse_level, PagerLogger};

pub mod cli;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Serialize)]
struct PageOutput<'a> {
    network: &'a Network,
    query: String,
    pagination: Pagination,
    rows: Vec<DisplayRow>,
}

pub async fn run_cli() -> Result<(), Error> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let level = cli
        .log_level
        .as_deref()
        .and_then(parse_level)
        .or_else(|| parse_level(&config.log_level))
        .unwrap_or(Level::Info);
    let _logger = PagerLogger::builder()
        .use_colors(true)
        .level(level)
        .init()
        .map_err(|e| Error::other(format!("{e:?}")))?;
    match cli.action {
        RootCommands::Page { page, query, json } => {
            let page = match (page, query) {
                (Some(page), _) => page,
                (None, Some(query)) => page_from_query(&query),
                (None, None) => 1,
            };
            let view = build_view(&config)?;
            let state = view.mount(page).await;
            check_state(&state)?;
            if json {
                let output = PageOutput {
                    network: view.network(),
                    query: view.page_query(),
                    pagination: view.pagination(),
                    rows: view.rows().unwrap_or_default(),
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output)
                        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?
                );
            } else {
                print_page(&view);
            }
            Ok(())
        }
        RootCommands::Browse { page } => browse(&config, page.unwrap_or(1)).await,
        RootCommands::Count => {
            let fetcher = build_fetcher(&config)?;
            let count = fetcher.sequence_count(&config.network).await?;
            println!("{count}");
            Ok(())
        }
        RootCommands::WriteConfig { output } => {
            config.save_as_yaml(&output)?;
            info!("Wrote config to {output}");
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<PagerConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => PagerConfig::try_from(&PathBuf::from(path))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            PagerConfig::try_from(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => PagerConfig::default(),
    }
    .with_env_overrides();
    if let Some(network) = &cli.network {
        config.network = Network::from(network.clone());
    }
    if let Some(host) = &cli.rpc_host {
        config.rpc_host = Some(host.clone());
    }
    if let Some(port) = cli.rpc_port {
        config.rpc_port = Some(port);
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if cli.offline {
        config.offline = true;
    }
    config.validate()?;
    Ok(config)
}

fn build_fetcher(config: &PagerConfig) -> Result<TransactionFetcher, Error> {
    if config.offline {
        let fixtures = match &config.fixture_path {
            Some(path) => FixtureSet::from_json_file(path)?,
            None => FixtureSet::seeded(config.fixture_count),
        };
        info!("Offline mode: serving {} fixture transactions", fixtures.len());
        Ok(TransactionFetcher::fixtures(
            fixtures,
            Duration::from_millis(config.fixture_delay_ms),
        ))
    } else {
        let client = LedgerClient::from_endpoint(&config.endpoint(), config.timeout_secs, &None)?;
        info!("Using ledger RPC at {}", client.url());
        Ok(TransactionFetcher::rpc(RpcSource::single(
            config.network.clone(),
            Arc::new(client),
        )))
    }
}

fn build_view(config: &PagerConfig) -> Result<TransactionView, Error> {
    TransactionView::new(
        build_fetcher(config)?,
        config.network.clone(),
        config.page_size,
        config.projection_options(),
    )
    .map_err(Error::from)
}

fn check_state(state: &LoadState) -> Result<(), Error> {
    match state {
        LoadState::Failed(e @ PagerError::InvalidRange { .. }) => {
            warn!("{e}");
            Ok(())
        }
        LoadState::Failed(e) => {
            error!("{e}");
            Err(e.clone().into())
        }
        _ => Ok(()),
    }
}

fn print_page(view: &TransactionView) {
    let pagination = view.pagination();
    match view.rows() {
        Some(rows) if rows.is_empty() => println!("No transactions"),
        Some(rows) => {
            println!(
                "{:<14} {:<24} {:<24} {:<24} {:<18} {:<8} {:>20} {:>10}",
                "Age", "Digest", "Sender", "Recipient", "Kind", "Status", "Amount", "Gas"
            );
            for row in rows {
                println!(
                    "{:<14} {:<24} {:<24} {:<24} {:<18} {:<8} {:>20} {:>10}",
                    row.age,
                    row.transaction.display,
                    row.sender.display,
                    row.recipient.display,
                    row.kind,
                    format!("{:?}", row.status),
                    row.amount,
                    row.gas
                );
            }
        }
        None => println!("Nothing loaded"),
    }
    println!(
        "Page {} of {} ({} transactions, {})",
        pagination.page,
        pagination.max_page,
        pagination.total_count,
        view.page_query()
    );
}

/// Reads `n`, `p`, a page number, `r` or `q` from stdin until `q` or EOF.
async fn browse(config: &PagerConfig, page: u64) -> Result<(), Error> {
    let view = build_view(config)?;
    check_state(&view.mount(page).await)?;
    print_page(&view);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let current = view.pagination().page;
        match line.trim() {
            "q" => break,
            "r" => {
                view.refresh().await;
            }
            "n" => view.set_page(current + 1).await,
            "p" => view.set_page(current.saturating_sub(1).max(1)).await,
            other => match other.parse::<u64>() {
                Ok(page) => view.set_page(page).await,
                Err(_) => {
                    println!("n: next, p: previous, <number>: go to page, r: refresh, q: quit");
                    continue;
                }
            },
        }
        check_state(&view.state())?;
        print_page(&view);
    }
    view.close();
    Ok(())
}
