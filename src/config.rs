use clap::Parser;
use pnet::util::MacAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::scheduler::PlaybackScheduler;

#[derive(Parser, Debug)]
#[command(name = "pcap-osc-replay")]
#[command(about = "Replay a PCAP file as OSC trigger events, keeping the captured timing")]
#[command(version = "1.0.0")]
pub struct Args {
    /// Path to the PCAP file to read from
    #[arg(short = 'r', long = "read")]
    pub file: PathBuf,

    /// MAC address to consider the source of local packets
    #[arg(short = 'm', long = "mac")]
    pub mac: Option<String>,

    /// Factor to warp time by (2.0 plays twice as slow)
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub warp: f64,

    /// OSC receiver host
    #[arg(long, default_value = "127.0.0.1")]
    pub osc_ip: String,

    /// OSC receiver port
    #[arg(long, default_value_t = 3334)]
    pub osc_port: u16,

    /// Log per-packet details
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PCAP file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("warp factor must be a positive number, got {0}")]
    InvalidWarp(f64),

    #[error("invalid MAC address: {0}")]
    InvalidMac(String),
}

/// Startup settings, checked once and fixed for the whole replay
#[derive(Debug)]
pub struct Settings {
    pub file: PathBuf,
    pub local_mac: Option<MacAddr>,
    pub scheduler: PlaybackScheduler,
    pub osc_host: String,
    pub osc_port: u16,
}

impl Args {
    pub fn validate(self) -> Result<Settings, ConfigError> {
        if !self.file.exists() {
            return Err(ConfigError::MissingInput(self.file));
        }

        let scheduler = PlaybackScheduler::new(self.warp)?;

        let local_mac = match self.mac.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(mac) => Some(
                mac.parse::<MacAddr>()
                    .map_err(|_| ConfigError::InvalidMac(mac.to_string()))?,
            ),
        };

        Ok(Settings {
            file: self.file,
            local_mac,
            scheduler,
            osc_host: self.osc_ip,
            osc_port: self.osc_port,
        })
    }
}
