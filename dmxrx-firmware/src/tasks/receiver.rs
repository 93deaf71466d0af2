//! DMX receiver task
//!
//! Owns the [`DmxReceiver`]. Bytes from the UART task are fed as they
//! arrive; a 100ms tick handles everything time-based:
//! - Signal-lost and signal-acquired detection
//! - Dimmer level and link status publication
//! - Throttled frame reports and fixture change logging

use core::convert::Infallible;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use dmxrx_core::config::ReceiverConfig;
use dmxrx_core::patch::{fixture_values, ChangeTracker};
use dmxrx_core::report::{FrameReport, ReportThrottle};
use dmxrx_core::{DmxReceiver, LinkEvent, SyncAction};
use dmxrx_hal::{Monotonic, TimedByte, TimedByteSource};

use crate::channels::{BYTE_QUEUE, DIMMER_LEVEL, DROPPED_BYTES, LINK_STATUS};
use crate::clock::EmbassyClock;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;

/// Non-blocking view of [`BYTE_QUEUE`]
struct QueueSource;

impl TimedByteSource for QueueSource {
    type Error = Infallible;

    fn try_read(&mut self) -> Result<Option<TimedByte>, Self::Error> {
        Ok(BYTE_QUEUE.try_receive().ok())
    }
}

/// Receiver task - frame assembly and link supervision
#[embassy_executor::task]
pub async fn receiver_task(config: &'static ReceiverConfig) {
    info!("Receiver task started");

    let clock = EmbassyClock;
    let mut receiver = DmxReceiver::new(&config.timing);
    receiver.init();

    let mut source = QueueSource;
    let mut throttle = ReportThrottle::new(config.timing.report_interval_ms);
    let mut tracker = ChangeTracker::new();
    let mut was_connected = false;
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        match select(BYTE_QUEUE.receive(), ticker.next()).await {
            Either::First(byte) => {
                match receiver.feed_timed(byte) {
                    SyncAction::RejectStartCode(code) => {
                        trace!("Ignoring frame with start code 0x{=u8:02x}", code)
                    }
                    SyncAction::Complete { .. } => trace!("Frame complete"),
                    _ => {}
                }

                // Catch up on whatever else is queued before yielding
                let summary = receiver.drain(&mut source).unwrap_or_default();
                if summary.frames > 0 {
                    trace!("Drained {} bytes, {} frames", summary.bytes, summary.frames);
                }
            }
            Either::Second(()) => {
                let now_ms = clock.now_ms();

                if let Some(LinkEvent::SignalLost) = receiver.poll_timeout(now_ms) {
                    warn!("DMX signal lost");
                }

                let connected = receiver.is_connected(now_ms);
                if connected != was_connected {
                    if connected {
                        info!("DMX signal acquired");
                    } else {
                        info!("DMX signal stale");
                    }
                    LINK_STATUS.signal(connected);
                    was_connected = connected;
                }

                DIMMER_LEVEL.signal(receiver.channel_level(config.dimmer.channel, now_ms));

                if connected && throttle.due(now_ms) {
                    report(&mut receiver, &mut tracker, config, now_ms);
                }
            }
        }
    }
}

/// Log the held frame and any fixture changes since the last report
fn report(
    receiver: &mut DmxReceiver,
    tracker: &mut ChangeTracker,
    config: &ReceiverConfig,
    now_ms: u64,
) {
    let dropped = DROPPED_BYTES.swap(0, Ordering::Relaxed);
    if dropped > 0 {
        warn!("{} bytes dropped since last report", dropped);
    }

    // Nothing new to say if no frame completed since the last report
    if !receiver.take_frame_completed() {
        return;
    }

    let Some(report) = FrameReport::capture(receiver.store(), now_ms) else {
        return;
    };

    info!(
        "Frame #{} start=0x{=u8:02x} age={}ms",
        report.frames_completed, report.start_code, report.age_ms
    );
    info!("  ch1-16: {}", report.head);
    if !report.active.is_empty() {
        info!(
            "  active: {}{}",
            report.active.as_slice(),
            if report.truncated { " ..." } else { "" }
        );
    }

    let store = receiver.store();
    for fixture in &config.fixtures {
        if !tracker.has_changed(store, fixture) {
            continue;
        }
        let changes = tracker.changes(store, fixture);
        info!(
            "  {}: {} ({} changed)",
            fixture.label.as_str(),
            fixture_values(store, fixture),
            changes.len()
        );
        for change in &changes {
            debug!(
                "    ch{} (@{}): {} -> {}",
                change.fixture_channel, change.address, change.old, change.new
            );
        }
    }
    tracker.update(store);
}
