//! Frame reports
//!
//! Periodic summaries of the held frame: the start code, the first few
//! channels, and whatever else is non-zero.

use heapless::Vec;

use crate::store::FrameStore;

/// Channels always included at the head of a report
pub const REPORT_HEAD_CHANNELS: usize = 16;

/// Maximum non-zero channels listed beyond the head
pub const MAX_ACTIVE_CHANNELS: usize = 32;

/// A non-zero channel outside the report head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveChannel {
    pub channel: u16,
    pub value: u8,
}

/// Snapshot of the held frame for logging
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    pub start_code: u8,
    pub frames_completed: u32,
    /// Channels 1..=16
    pub head: [u8; REPORT_HEAD_CHANNELS],
    /// Non-zero channels above 16, in channel order
    pub active: Vec<ActiveChannel, MAX_ACTIVE_CHANNELS>,
    /// More non-zero channels existed than `active` could hold
    pub truncated: bool,
    /// Time since the frame completed
    pub age_ms: u64,
}

impl FrameReport {
    /// Capture the store's frame, or `None` without a valid frame
    pub fn capture(store: &FrameStore, now_ms: u64) -> Option<Self> {
        let channels = store.channels()?;
        let start_code = store.start_code()?;

        let mut head = [0u8; REPORT_HEAD_CHANNELS];
        head.copy_from_slice(&channels[..REPORT_HEAD_CHANNELS]);

        let mut active = Vec::new();
        let mut truncated = false;
        for (i, &value) in channels.iter().enumerate().skip(REPORT_HEAD_CHANNELS) {
            if value == 0 {
                continue;
            }
            let entry = ActiveChannel {
                channel: i as u16 + 1,
                value,
            };
            if active.push(entry).is_err() {
                truncated = true;
                break;
            }
        }

        Some(Self {
            start_code,
            frames_completed: store.frames_completed(),
            head,
            active,
            truncated,
            age_ms: store.ms_since_last_frame(now_ms),
        })
    }
}

/// Rate limiter for reports
#[derive(Debug, Clone)]
pub struct ReportThrottle {
    interval_ms: u32,
    last_ms: Option<u64>,
}

impl ReportThrottle {
    /// Create a throttle that fires at most once per `interval_ms`
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Check whether a report is due, and if so start a new interval
    pub fn due(&mut self, now_ms: u64) -> bool {
        let due = match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms as u64,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_LEN;

    #[test]
    fn test_no_report_without_frame() {
        assert_eq!(FrameReport::capture(&FrameStore::default(), 0), None);
    }

    #[test]
    fn test_report_contents() {
        let mut frame = [0u8; FRAME_LEN];
        frame[1] = 255;
        frame[16] = 16;
        frame[17] = 0;
        frame[100] = 7;
        frame[512] = 1;
        let mut store = FrameStore::default();
        store.commit(&frame, 1_000);

        let report = FrameReport::capture(&store, 1_250).unwrap();
        assert_eq!(report.start_code, 0);
        assert_eq!(report.frames_completed, 1);
        assert_eq!(report.head[0], 255);
        assert_eq!(report.head[15], 16);
        assert_eq!(
            report.active.as_slice(),
            &[
                ActiveChannel { channel: 100, value: 7 },
                ActiveChannel { channel: 512, value: 1 },
            ]
        );
        assert!(!report.truncated);
        assert_eq!(report.age_ms, 250);
    }

    #[test]
    fn test_report_truncates_busy_frames() {
        let mut store = FrameStore::default();
        let mut frame = [9u8; FRAME_LEN];
        frame[0] = 0;
        store.commit(&frame, 0);

        let report = FrameReport::capture(&store, 0).unwrap();
        assert_eq!(report.active.len(), MAX_ACTIVE_CHANNELS);
        assert!(report.truncated);
        assert_eq!(report.active[0].channel, 17);
    }

    #[test]
    fn test_throttle() {
        let mut throttle = ReportThrottle::new(1000);
        assert!(throttle.due(0));
        assert!(!throttle.due(999));
        assert!(throttle.due(1000));
        assert!(!throttle.due(1500));
        assert!(throttle.due(2500));
    }
}
