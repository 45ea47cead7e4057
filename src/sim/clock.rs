//! Simulation clock and loop state machine
//!
//! The clock advances 1:1 with real time through loop segments of fixed
//! simulated length. It owns no timer: samples come from a [`ClockSource`]
//! (or straight from the host through [`LoopClock::advance`]), and every
//! sample becomes one tick.

use std::time::Instant;

/// Loop controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Clock at zero, nothing advancing
    #[default]
    Stopped,
    /// Samples advance the clock
    Running,
    /// Clock frozen mid-segment
    Paused,
}

/// Something that produces successive clock samples
pub trait ClockSource {
    /// Forget any previous sample; the next `sample` measures from now
    fn restart(&mut self);

    /// Seconds elapsed since the previous sample (or since `restart`)
    fn sample(&mut self) -> f32;
}

/// Real time from the monotonic system clock
#[derive(Debug, Default)]
pub struct WallClock {
    last: Option<Instant>,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClockSource for WallClock {
    fn restart(&mut self) {
        self.last = Some(Instant::now());
    }

    fn sample(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        elapsed
    }
}

/// Constant-interval samples, for headless runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    pub dt: f32,
}

impl FixedStep {
    pub fn new(dt: f32) -> Self {
        Self { dt }
    }

    pub fn hz(rate: f32) -> Self {
        Self { dt: 1.0 / rate }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::hz(crate::consts::FIXED_STEP_HZ)
    }
}

impl ClockSource for FixedStep {
    fn restart(&mut self) {}

    fn sample(&mut self) -> f32 {
        self.dt
    }
}

/// The looping simulation clock
#[derive(Debug, Clone)]
pub struct LoopClock {
    state: LoopState,
    now: f32,
    /// 1-based index of the current segment
    loop_index: u32,
    segment_secs: f32,
}

impl LoopClock {
    pub fn new(segment_secs: f32) -> Self {
        Self {
            state: LoopState::Stopped,
            now: 0.0,
            loop_index: 1,
            segment_secs,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Current clock reading (seconds)
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn loop_index(&self) -> u32 {
        self.loop_index
    }

    pub fn segment_secs(&self) -> f32 {
        self.segment_secs
    }

    /// Clock reading at which the current segment ends
    fn segment_end(&self) -> f32 {
        self.segment_secs * self.loop_index as f32
    }

    /// Begin (or resume) advancing. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        log::info!("Loop started at t={:.3} (segment {})", self.now, self.loop_index);
        self.state = LoopState::Running;
        true
    }

    /// Freeze the clock where it is. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.state = LoopState::Paused;
        log::info!(
            "Loop paused at t={:.3} ({:.3} into segment {})",
            self.now,
            self.now - self.segment_secs * (self.loop_index - 1) as f32,
            self.loop_index
        );
        true
    }

    /// Halt and reset to t=0, segment 1
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.now = 0.0;
        self.loop_index = 1;
        log::info!("Loop stopped");
    }

    /// Advance by `dt` seconds, calling `on_tick` with the clock reading of
    /// each sample.
    ///
    /// One sample normally yields one tick. A sample that runs past the end of
    /// the segment is split: one tick lands exactly on the segment end, the
    /// segment index rolls over, and the rest becomes a tick in the next
    /// segment. Does nothing unless running, or when the segment length is
    /// not positive. Returns the number of ticks.
    pub fn advance(&mut self, dt: f32, mut on_tick: impl FnMut(f32)) -> usize {
        if self.state != LoopState::Running || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        if !(self.segment_secs.is_finite() && self.segment_secs > 0.0) {
            log::warn!("Sample dropped: segment length {} is not positive", self.segment_secs);
            return 0;
        }

        let mut remaining = dt;
        let mut ticks = 0;
        while remaining > 0.0 {
            let end = self.segment_end();
            let step = remaining.min(end - self.now);

            if step <= 0.0 || self.now + step >= end {
                // Land on the boundary and roll into the next segment
                remaining -= step.max(0.0);
                self.now = end;
                self.loop_index += 1;
                log::info!("Loop segment {} begins at t={:.3}", self.loop_index, self.now);
            } else {
                remaining -= step;
                self.now += step;
            }

            on_tick(self.now);
            ticks += 1;
        }
        ticks
    }
}
