use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, env = "TXPAGE_CONFIG", value_name = "Path to the config file")]
    pub config: Option<String>,

    #[arg(short, long, value_name = "mainnet, testnet, devnet, local or a custom name")]
    pub network: Option<String>,
    #[arg(long, value_name = "RPC Hostname")]
    pub rpc_host: Option<String>,
    #[arg(long, value_name = "RPC Port")]
    pub rpc_port: Option<u16>,
    #[arg(long, value_name = "Transactions per page")]
    pub page_size: Option<u64>,
    #[arg(long, help = "Serve fixture transactions instead of calling the ledger")]
    pub offline: bool,
    #[arg(long, value_name = "trace, debug, info, warn or error")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub action: RootCommands,
}

#[derive(Debug, Subcommand)]
pub enum RootCommands {
    #[command(about = "Prints one page of transactions, newest first", long_about = None)]
    Page {
        #[arg(short, long)]
        page: Option<u64>,
        #[arg(short, long, help = "Query string to read the page from, e.g. ?page=3")]
        query: Option<String>,
        #[arg(short, long)]
        json: bool,
    },
    #[command(about = "Pages through transactions interactively", long_about = None)]
    Browse {
        #[arg(short, long)]
        page: Option<u64>,
    },
    #[command(about = "Prints the ledger's transaction count", long_about = None)]
    Count,
    #[command(about = "Writes the effective config to a YAML file", long_about = None)]
    WriteConfig {
        #[arg(short, long)]
        output: String,
    },
}
