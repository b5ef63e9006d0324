use anyhow::{Context, Result};
use pcap::{Capture, Error as PcapError, Offline};
use std::path::Path;
use tracing::debug;

use crate::decode::LinkKind;
use crate::packet::CapturedFrame;

/// Sequential source of captured frames.
///
/// `Ok(None)` marks the end of the stream. An `Err` covers one failed read;
/// callers may keep reading after it.
pub trait FrameSource {
    fn link_kind(&self) -> LinkKind;

    fn next_frame(&mut self) -> Result<Option<CapturedFrame>>;
}

pub struct CaptureReader {
    capture: Capture<Offline>,
    link: LinkKind,
    sequence: u64,
}

impl CaptureReader {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening PCAP file with libpcap: {}", path.display());

        let capture = Capture::from_file(path)
            .with_context(|| format!("Failed to open PCAP file: {}", path.display()))?;
        let datalink = capture.get_datalink();
        let link = LinkKind::from_dlt(datalink.0);

        debug!("PCAP file opened, datalink {} decoded as {:?}", datalink.0, link);

        Ok(Self {
            capture,
            link,
            sequence: 0,
        })
    }
}

impl FrameSource for CaptureReader {
    fn link_kind(&self) -> LinkKind {
        self.link
    }

    fn next_frame(&mut self) -> Result<Option<CapturedFrame>> {
        let packet = match self.capture.next_packet() {
            Ok(packet) => packet,
            Err(PcapError::NoMorePackets) => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Error reading packet #{}", self.sequence + 1));
            }
        };

        self.sequence += 1;

        let timestamp =
            packet.header.ts.tv_sec as f64 + packet.header.ts.tv_usec as f64 / 1_000_000.0;
        let frame = CapturedFrame::new(timestamp, packet.header.len, packet.data.to_vec());

        debug!(
            "Read packet {}: {} bytes captured of {}, timestamp={}",
            self.sequence,
            frame.data.len(),
            frame.length,
            frame.timestamp
        );

        Ok(Some(frame))
    }
}
