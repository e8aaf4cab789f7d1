//! Per-frame event coalescing
//!
//! Scroll, pointer and resize events fire many times between two painted
//! frames. The clock folds them into a single pending payload and tells the
//! caller when an animation frame has to be requested:
//! - first event of a cycle sets `scheduled` and returns `RequestFrame`
//! - later events in the same cycle merge into the payload (`Coalesced`)
//! - the frame callback clears `scheduled` *before* the work runs, so an
//!   event arriving during the work schedules the next cycle

/// A payload that can absorb a newer event of the same kind
pub trait Coalesce {
    /// Merge `newer` into `self`; the newer data wins wherever both carry a value
    fn coalesce(&mut self, newer: Self);
}

/// What the caller must do after signalling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// First event of this cycle: request one animation frame
    RequestFrame,
    /// A frame is already requested; the event was merged
    Coalesced,
    /// The clock was cancelled (view torn down); nothing will run
    Cancelled,
}

#[derive(Debug)]
pub struct FrameClock<T> {
    pending: Option<T>,
    scheduled: bool,
    cancelled: bool,
    events_seen: u64,
    frames_run: u64,
}

impl<T: Coalesce> Default for FrameClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Coalesce> FrameClock<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            scheduled: false,
            cancelled: false,
            events_seen: 0,
            frames_run: 0,
        }
    }

    /// Record a raw event
    pub fn signal(&mut self, event: T) -> Signal {
        if self.cancelled {
            return Signal::Cancelled;
        }
        self.events_seen += 1;

        match self.pending.as_mut() {
            Some(pending) => pending.coalesce(event),
            None => self.pending = Some(event),
        }

        if self.scheduled {
            Signal::Coalesced
        } else {
            self.scheduled = true;
            Signal::RequestFrame
        }
    }

    /// Frame callback entry point.
    ///
    /// Returns the merged payload of every event seen since the last frame,
    /// or `None` if nothing is pending. The scheduled flag is cleared first.
    pub fn take_frame(&mut self) -> Option<T> {
        self.scheduled = false;
        if self.cancelled {
            return None;
        }
        let input = self.pending.take()?;
        self.frames_run += 1;
        Some(input)
    }

    /// Release the clock; pending data is dropped and later signals are ignored
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.scheduled = false;
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Raw events accepted so far
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Frames that actually delivered a payload
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}
