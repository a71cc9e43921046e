//! Tick scheduler
//!
//! The host calls [`TickScheduler::pulse`] as often as it likes (a render
//! loop, a timer, a test). The scheduler turns those irregular pulses into a
//! steady logical tick, one per configured interval, and keeps the tick
//! counter and liveness glyph shown on the status line.
//!
//! A pulse yields at most one logical tick. When the host stalls for several
//! intervals the next pulse produces a single tick and the reference point
//! moves to "now", so a slow host never receives a burst of catch-up ticks.

use chrono::{DateTime, Duration, Utc};

use crate::ports::ClockPort;

/// Glyphs cycled once per logical tick.
pub const STATUS_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

/// A logical tick handed to the stack, windows and forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// One-based tick number, strictly increasing.
    pub number: u64,
}

impl Tick {
    pub fn is_first(&self) -> bool {
        self.number == 1
    }
}

pub struct TickScheduler {
    clock: Box<dyn ClockPort>,
    interval: Duration,
    last_tick_at: Option<DateTime<Utc>>,
    total_ticks: u64,
    glyph_index: usize,
}

impl TickScheduler {
    pub fn new(clock: Box<dyn ClockPort>, interval_ms: u64) -> Self {
        let millis = i64::try_from(interval_ms.max(1)).unwrap_or(i64::MAX);
        Self {
            clock,
            interval: Duration::milliseconds(millis),
            last_tick_at: None,
            total_ticks: 0,
            glyph_index: 0,
        }
    }

    /// Feed one host pulse. Returns the logical tick when one is due.
    ///
    /// The very first pulse only records the reference time.
    pub fn pulse(&mut self) -> Option<Tick> {
        let now = self.clock.now();
        let Some(last) = self.last_tick_at else {
            self.last_tick_at = Some(now);
            return None;
        };

        if now - last < self.interval {
            return None;
        }

        self.last_tick_at = Some(now);
        self.total_ticks += 1;
        self.glyph_index = (self.glyph_index + 1) % STATUS_GLYPHS.len();

        Some(Tick {
            number: self.total_ticks,
        })
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn status_glyph(&self) -> char {
        STATUS_GLYPHS[self.glyph_index]
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Forget all progress; the next pulse primes the clock again.
    pub fn reset(&mut self) {
        self.last_tick_at = None;
        self.total_ticks = 0;
        self.glyph_index = 0;
    }
}
