use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::ConfigError;

/// Where the replay stands: the last capture timestamp played and when.
///
/// Owned by the replay loop. Both fields are unset until the first packet
/// has been let through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleState {
    last_capture: Option<f64>,
    last_emission: Option<Instant>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `capture_ts` as played at `now`
    pub fn record(&mut self, capture_ts: f64, now: Instant) {
        self.last_capture = Some(capture_ts);
        self.last_emission = Some(now);
    }
}

/// Paces packets so wall-clock gaps follow the capture's gaps times `warp`.
///
/// A warp of 2.0 plays back twice as slow, 0.5 twice as fast.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackScheduler {
    warp: f64,
}

impl PlaybackScheduler {
    pub fn new(warp: f64) -> Result<Self, ConfigError> {
        if !warp.is_finite() || warp <= 0.0 {
            return Err(ConfigError::InvalidWarp(warp));
        }
        Ok(Self { warp })
    }

    pub fn warp(&self) -> f64 {
        self.warp
    }

    /// How long to hold back the packet captured at `capture_ts`.
    ///
    /// Zero for the first packet, and zero when playback is already behind
    /// the captured gap. No catch-up beyond that.
    pub fn delay(&self, state: &ScheduleState, capture_ts: f64, now: Instant) -> Duration {
        let (Some(last_capture), Some(last_emission)) = (state.last_capture, state.last_emission)
        else {
            return Duration::ZERO;
        };

        let captured = (capture_ts - last_capture) * self.warp;
        if !(captured > 0.0) {
            // Out of order, equal or NaN timestamps
            return Duration::ZERO;
        }

        let captured = Duration::try_from_secs_f64(captured).unwrap_or(Duration::MAX);
        captured.saturating_sub(now.saturating_duration_since(last_emission))
    }

    /// Wait out the delay for the packet captured at `capture_ts`.
    ///
    /// The delay is fixed when `gate` is called; the returned future holds
    /// no borrow of `state`, which the caller updates once it completes.
    pub fn gate(&self, state: &ScheduleState, capture_ts: f64) -> impl Future<Output = ()> + use<> {
        let delay = self.delay(state, capture_ts, Instant::now());
        async move {
            if !delay.is_zero() {
                debug!("Holding packet for {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}
