use clap::Parser;
use moonrelay_cli::Cli;
use std::process;

#[tokio::main]
async fn main() {
    // stdout carries the result JSON
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if let Err(err) = moonrelay_cli::run(cli).await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
