mod logging;
mod moondream;
mod web;

use crate::logging::*;

type Result<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up";
        "inference_url" => moondream::get_base_url(),
    );

    match web::run().await {
        Ok(_) => info!(log, "shutting down"),
        Err(err) => error!(log, "shutting down: {:?}", err),
    }
}
