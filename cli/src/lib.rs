pub mod api;
pub mod commands;


use anyhow::Result;
use clap::{Parser, Subcommand};
use moonrelay_common::overlay::DisplaySize;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "moonrelay")]
#[clap(about = "Run a vision operation on an image through the relay")]
#[clap(version)]
pub struct Cli {
    #[clap(long, global = true, help = "Relay base URL [default: RELAY_URL setting]")]
    pub relay_url: Option<String>,

    #[clap(
        long,
        global = true,
        help = "Display size the overlay is drawn for, as WIDTHxHEIGHT [default: image size]"
    )]
    pub display: Option<DisplaySize>,

    #[clap(long, global = true, help = "Write the point/detect overlay to this SVG file")]
    pub svg: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Caption(commands::infer::CaptionArgs),
    Query(commands::infer::QueryArgs),
    Point(commands::infer::ObjectArgs),
    Detect(commands::infer::ObjectArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    commands::infer::run(cli).await
}
