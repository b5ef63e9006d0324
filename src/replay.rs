use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::capture::FrameSource;
use crate::classify::classify;
use crate::decode::{decode, LinkKind};
use crate::direction::DirectionResolver;
use crate::event::{build, OutboundRecord};
use crate::packet::{CapturedFrame, DecodedPacket};
use crate::scheduler::{PlaybackScheduler, ScheduleState};
use crate::transport::EventSink;

/// Counters for one replay
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    pub frames_read: u64,
    pub packets_decoded: u64,
    pub decode_failures: u64,
    pub read_errors: u64,
    pub events_sent: u64,
    pub send_failures: u64,
    pub duration: Duration,
    pub interrupted: bool,
}

impl ReplayStats {
    pub fn log_summary(&self) {
        info!("======= REPLAY SUMMARY =======");
        let suffix = if self.interrupted { " (interrupted)" } else { "" };
        info!("Finished in {:.3?}{}", self.duration, suffix);
        info!("Frames read: {}", self.frames_read);
        info!("Packets decoded: {}", self.packets_decoded);
        info!("Decode failures: {}", self.decode_failures);
        info!("Read errors: {}", self.read_errors);
        info!("Events sent: {}", self.events_sent);
        info!("Send failures: {}", self.send_failures);
        info!("==============================");
    }
}

/// Drives one sequential replay: pace, decode, classify, emit.
pub struct Replayer<S> {
    resolver: DirectionResolver,
    scheduler: PlaybackScheduler,
    sink: S,
    state: ScheduleState,
    stats: ReplayStats,
    start_time: Instant,
}

impl<S: EventSink> Replayer<S> {
    pub fn new(resolver: DirectionResolver, scheduler: PlaybackScheduler, sink: S) -> Self {
        Self {
            resolver,
            scheduler,
            sink,
            state: ScheduleState::new(),
            stats: ReplayStats::default(),
            start_time: Instant::now(),
        }
    }

    /// Replay every frame of `source` until it ends or `shutdown` resolves.
    pub async fn run<F, Q>(mut self, source: &mut F, shutdown: Q) -> ReplayStats
    where
        F: FrameSource,
        Q: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let link = source.link_kind();
        self.start_time = Instant::now();

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    self.stats.read_errors += 1;
                    warn!("Failed to read packet: {:#}", e);
                    continue;
                }
            };
            self.stats.frames_read += 1;

            let gate = self.scheduler.gate(&self.state, frame.timestamp);
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Received shutdown signal, stopping replay");
                    self.stats.interrupted = true;
                    break;
                }
                _ = gate => {}
            }
            self.state.record(frame.timestamp, Instant::now());

            self.process_frame(&frame, link);
        }

        self.stats.duration = self.start_time.elapsed();
        self.stats
    }

    fn process_frame(&mut self, frame: &CapturedFrame, link: LinkKind) {
        let packet = match decode(&frame.data, frame.length, link) {
            Ok(packet) => packet,
            Err(e) => {
                self.stats.decode_failures += 1;
                warn!("Failed to decode packet #{}: {}", self.stats.frames_read, e);
                return;
            }
        };
        self.stats.packets_decoded += 1;

        let direction = self.resolver.resolve(&packet);
        let triggers = classify(&packet, direction);
        debug!(
            "Packet #{} link {:?} -> {:?}, triggers: {:?}",
            self.stats.frames_read, packet.source_mac, packet.destination_mac, triggers
        );

        for trigger in triggers {
            let record = build(&packet, direction, trigger);
            self.log_event(&packet, &record);

            match self.sink.send(&record) {
                Ok(()) => self.stats.events_sent += 1,
                Err(e) => {
                    self.stats.send_failures += 1;
                    warn!("Failed to send {}: {:#}", record.address(), e);
                }
            }
        }
    }

    fn log_event(&self, packet: &DecodedPacket, record: &OutboundRecord) {
        let elapsed = format!("{:.3?}", self.start_time.elapsed());
        let source = format!("{}:{}", packet.source, packet.source_port);
        let destination = format!("{}:{}", packet.destination, packet.destination_port);

        info!(
            "{:<12} {:<7} {:<21} {} {:<21} {:<8} {}",
            elapsed,
            record.transport,
            source,
            record.direction.arrow(),
            destination,
            record.application,
            record.address()
        );
    }
}
