use std::io::Error;
use txpage_cli::run_cli;

#[tokio::main]
async fn main() -> Result<(), Error> {
    run_cli().await
}
