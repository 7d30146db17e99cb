use anyhow::{Context, Result, anyhow};
use clap::Parser;
use moonrelay_common::Operation;
use moonrelay_common::overlay::DisplaySize;
use moonrelay_common::payload::{CaptionLength, DataUrl, Payload};
use moonrelay_common::session::{Applied, Session};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::relay::RelayClient;
use crate::{Cli, Commands};

#[derive(Parser)]
#[clap(about = "Describe the image")]
pub struct CaptionArgs {
    #[clap(help = "Image file")]
    pub image: PathBuf,

    #[clap(long, default_value = "normal", help = "Caption length (short|normal|long)")]
    pub length: CaptionLength,
}

#[derive(Parser)]
#[clap(about = "Ask a question about the image")]
pub struct QueryArgs {
    #[clap(help = "Image file")]
    pub image: PathBuf,

    #[clap(short, long, help = "Question to ask")]
    pub question: String,
}

#[derive(Parser)]
#[clap(about = "Locate an object (point) or its bounding boxes (detect)")]
pub struct ObjectArgs {
    #[clap(help = "Image file")]
    pub image: PathBuf,

    #[clap(short, long, help = "Object to look for, e.g. cat")]
    pub object: String,
}

impl Commands {
    pub fn operation(&self) -> Operation {
        match self {
            Commands::Caption(_) => Operation::Caption,
            Commands::Query(_) => Operation::Query,
            Commands::Point(_) => Operation::Point,
            Commands::Detect(_) => Operation::Detect,
        }
    }

    pub fn image_path(&self) -> &Path {
        match self {
            Commands::Caption(args) => &args.image,
            Commands::Query(args) => &args.image,
            Commands::Point(args) | Commands::Detect(args) => &args.image,
        }
    }

    pub fn payload(&self, image: DataUrl) -> Payload {
        match self {
            Commands::Caption(args) => Payload::caption(image, args.length),
            Commands::Query(args) => Payload::query(image, &args.question),
            Commands::Point(args) => Payload::point(image, &args.object),
            Commands::Detect(args) => Payload::detect(image, &args.object),
        }
    }
}

/// Natural pixel size of the image, read from its header.
pub fn natural_size(path: &Path) -> Result<DisplaySize> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("failed to read image size of {}", path.display()))?;
    Ok(DisplaySize::new(width as f64, height as f64)?)
}

/// Runs one operation and leaves the outcome in a session.
pub async fn execute(cli: &Cli) -> Result<Session> {
    let client = match &cli.relay_url {
        Some(url) => RelayClient::new_with_url(url.clone()),
        None => RelayClient::new()?,
    };

    let path = cli.command.image_path();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let size = match cli.display {
        Some(size) => size,
        None => natural_size(path)?,
    };

    let image = DataUrl::from_path_bytes(path, &bytes);
    let mut session = Session::new();
    session.select_image(image.clone());
    session.resize(size);

    let payload = cli.command.payload(image);
    let ticket = session
        .begin_run(payload.operation())
        .ok_or_else(|| anyhow!("no image selected"))?;
    info!(
        operation = %ticket.operation(),
        relay = client.base_url(),
        display = %size,
        "running"
    );

    let applied = match client.run(payload).await {
        Ok(value) => session.complete(ticket, value),
        Err(err) => {
            warn!(error = %err, "relay call failed");
            session.fail(ticket, &err.to_string())
        }
    };
    if applied == Applied::Stale {
        warn!(seq = ticket.seq(), "discarded stale response");
    }
    Ok(session)
}

pub async fn run(cli: Cli) -> Result<()> {
    let session = execute(&cli).await?;

    if let Some(raw) = session.raw() {
        println!("{}", serde_json::to_string_pretty(raw)?);
    }

    let marks = session.marks();
    if !marks.is_empty() {
        info!(count = marks.len(), size = %session.display(), "overlay");
    }
    if let Some(svg_path) = &cli.svg {
        let operation = cli.command.operation();
        if !operation.has_overlay() {
            warn!(%operation, "operation draws no overlay, skipping svg");
            return Ok(());
        }
        fs::write(svg_path, session.to_svg())
            .with_context(|| format!("failed to write {}", svg_path.display()))?;
        info!(path = %svg_path.display(), "overlay written");
    }
    Ok(())
}
