use std::time::Duration;

use flamesight_protocol::FrameKey;

/// A tooltip waiting for its delay to pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTooltip {
    pub frame: FrameKey,
    /// Pointer position that scheduled it.
    pub x: f64,
    pub y: f64,
    /// Host clock time at which it fires.
    pub due: Duration,
}

/// Single-slot debounce: at most one tooltip is pending, and scheduling a
/// new one discards the previous.
///
/// Time is whatever monotonic clock the host feeds in; the slot never reads
/// a clock itself.
#[derive(Debug, Clone, Default)]
pub struct TooltipSlot {
    pending: Option<PendingTooltip>,
}

impl TooltipSlot {
    /// Store `tooltip`, returning the one it displaced.
    pub fn schedule(&mut self, tooltip: PendingTooltip) -> Option<PendingTooltip> {
        self.pending.replace(tooltip)
    }

    pub fn cancel(&mut self) -> Option<PendingTooltip> {
        self.pending.take()
    }

    /// Remove and return the pending tooltip if it is due at `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<PendingTooltip> {
        if self.pending.is_some_and(|p| p.due <= now) {
            self.pending.take()
        } else {
            None
        }
    }
}
