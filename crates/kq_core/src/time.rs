//! Fixed-rate frame clock.
//!
//! Gameplay advances in whole ticks of `fixed_dt`; every timer in the
//! simulation counts ticks, not seconds. Wall-clock time only feeds the
//! accumulator that decides how many ticks a rendered frame owes.

use std::time::{Duration, Instant};

pub const TICKS_PER_SECOND: u32 = 60;

pub struct FrameClock {
    pub fixed_dt: Duration,
    /// Upper bound on wall time fed into one frame, so a stall does not
    /// turn into hundreds of catch-up ticks.
    pub max_frame_time: Duration,
    accumulator: Duration,
    last_instant: Instant,
    pub tick_count: u64,
    pub frame_count: u64,
    pub ticks_this_frame: u32,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            fixed_dt: Duration::from_secs(1) / TICKS_PER_SECOND,
            max_frame_time: Duration::from_millis(250),
            accumulator: Duration::ZERO,
            last_instant: now,
            tick_count: 0,
            frame_count: 0,
            ticks_this_frame: 0,
        }
    }

    pub fn begin_frame(&mut self, now: Instant) {
        let mut real_dt = now.saturating_duration_since(self.last_instant);
        self.last_instant = now;

        if real_dt > self.max_frame_time {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                real_dt.as_secs_f64() * 1000.0,
                self.max_frame_time.as_millis()
            );
            real_dt = self.max_frame_time;
        }

        self.accumulator += real_dt;
        self.ticks_this_frame = 0;
        self.frame_count += 1;
    }

    /// Consume one tick from the accumulator if one is owed.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.tick_count += 1;
            self.ticks_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Wall time left until the next tick is owed.
    pub fn time_until_tick(&self) -> Duration {
        self.fixed_dt.saturating_sub(self.accumulator)
    }
}

/// A per-entity timer counted in simulation ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count down one tick. Returns true on the tick the timer runs out.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}
