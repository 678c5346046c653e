//! IRV Proof Tree Driver
//!
//! Verify a reported winner and expand its elimination tree.
//!
//! ```text
//! irv-vis <election.json> [--layered]
//! ```

use std::env;
use std::sync::Arc;

use irv_tree::{LayeredConfig, TreeTaskHandler};
use irv_vis::{Election, ProofSession};
use irv_worker::{BackgroundService, WorkerConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "irv_vis=info,irv_tree=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("irv-vis");
        eprintln!("usage: {} <election.json> [--layered]", program);
        std::process::exit(2);
    };
    let layered = args.iter().skip(2).any(|a| a == "--layered");

    let election = Election::load(path)?;
    let service = Arc::new(BackgroundService::new(
        WorkerConfig::default(),
        Arc::new(TreeTaskHandler),
    ));
    let session = ProofSession::new(election)?
        .with_service(service)
        .with_layered_config(LayeredConfig::default());

    session.select_winner()?;

    if layered {
        let report = session.animate()?.await??;
        eprintln!("expanded {} nodes over {} layers", report.expanded, report.per_layer.len());
    } else {
        session.expand_all().await?;
    }

    println!("{}", serde_json::to_string_pretty(&session.summary()?)?);
    session.shutdown().await;
    Ok(())
}
