use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod capture;
mod classify;
mod config;
mod decode;
mod direction;
mod event;
mod packet;
mod replay;
mod scheduler;
mod transport;

#[cfg(test)]
mod fixtures;

use capture::{CaptureReader, FrameSource};
use config::Args;
use direction::DirectionResolver;
use replay::Replayer;
use transport::OscSender;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let max_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .init();

    let settings = args.validate()?;

    info!("Starting PCAP OSC replay");
    info!("PCAP file: {}", settings.file.display());
    info!("Warping time by: {}", settings.scheduler.warp());
    match &settings.local_mac {
        Some(mac) => info!("Local MAC: {} (direction by source MAC)", mac),
        None => info!("No local MAC given, direction by private source address"),
    }

    let mut reader = CaptureReader::open(&settings.file)?;
    info!("Link layer: {:?}", reader.link_kind());

    let sender = OscSender::connect(&settings.osc_host, settings.osc_port)?;
    info!("OSC target: {}", sender.target());

    let replayer = Replayer::new(
        DirectionResolver::new(settings.local_mac),
        settings.scheduler,
        sender,
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let stats = replayer.run(&mut reader, shutdown).await;
    stats.log_summary();

    Ok(())
}
