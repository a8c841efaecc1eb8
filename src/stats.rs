//! Frame-rate and per-phase timing.

use std::collections::VecDeque;
use std::fmt;

use instant::Instant;
use serde::Serialize;

/// How often to log FPS (simulated seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;
/// Frames kept for the rolling fps figures.
const FRAME_WINDOW: usize = 120;

/// Rolling frame-rate figures for the housekeeping snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Performance {
    pub fps: f32,
    pub fps_min: f32,
    pub fps_max: f32,
}

#[derive(Debug)]
pub struct FrameStats {
    frame_count: u64,
    recent: VecDeque<f64>,
    since_log: f64,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            recent: VecDeque::with_capacity(FRAME_WINDOW),
            since_log: 0.0,
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    /// Record one tick period. Non-positive periods are ignored.
    pub fn record_frame(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.frame_count += 1;
        if self.recent.len() == FRAME_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(dt);

        self.frames_since_log += 1;
        self.since_log += dt;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        if self.since_log >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            let fps = self.frames_since_log as f64 / self.since_log;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                self.frame_count,
            );
            self.since_log = 0.0;
            self.frame_time_sum = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Fps over the last [`FRAME_WINDOW`] frames; zeros before the first one.
    pub fn performance(&self) -> Performance {
        if self.recent.is_empty() {
            return Performance {
                fps: 0.0,
                fps_min: 0.0,
                fps_max: 0.0,
            };
        }
        let sum: f64 = self.recent.iter().sum();
        let slowest = self.recent.iter().copied().fold(0.0, f64::max);
        let fastest = self.recent.iter().copied().fold(f64::MAX, f64::min);
        Performance {
            fps: (self.recent.len() as f64 / sum) as f32,
            fps_min: (1.0 / slowest) as f32,
            fps_max: (1.0 / fastest) as f32,
        }
    }
}

/// The timed slices of a simulation tick, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhase {
    Camera,
    Contact,
    Movement,
    Behaviour,
    Sensing,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 5] = [
        Self::Camera,
        Self::Contact,
        Self::Movement,
        Self::Behaviour,
        Self::Sensing,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SystemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Camera => "camera",
            Self::Contact => "contact",
            Self::Movement => "movement",
            Self::Behaviour => "behaviour",
            Self::Sensing => "sensing",
        })
    }
}

/// Weight of the newest sample in [`PhaseTiming::mean_us`].
const SMOOTHING: f64 = 0.1;

/// Wall-clock cost of one phase, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTiming {
    pub last_us: f64,
    /// Exponential moving average, seeded by the first sample.
    pub mean_us: f64,
    pub samples: u64,
}

impl PhaseTiming {
    fn push(&mut self, us: f64) {
        self.mean_us = if self.samples == 0 {
            us
        } else {
            self.mean_us + SMOOTHING * (us - self.mean_us)
        };
        self.last_us = us;
        self.samples += 1;
    }
}

/// Per-phase wall-clock timings of the tick pipeline.
#[derive(Debug, Default)]
pub struct PhaseTimings {
    phases: [PhaseTiming; SystemPhase::ALL.len()],
}

impl PhaseTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` and charge its wall-clock time to `phase`.
    pub fn measure<R>(&mut self, phase: SystemPhase, work: impl FnOnce() -> R) -> R {
        let started = Instant::now();
        let out = work();
        self.phases[phase.slot()].push(started.elapsed().as_secs_f64() * 1e6);
        out
    }

    pub fn phase(&self, phase: SystemPhase) -> &PhaseTiming {
        &self.phases[phase.slot()]
    }

    /// Smoothed cost of a whole tick.
    pub fn tick_us(&self) -> f64 {
        self.phases.iter().map(|t| t.mean_us).sum()
    }
}

impl fmt::Display for PhaseTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {:.1}us (", self.tick_us())?;
        for (i, phase) in SystemPhase::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{phase} {:.1}", self.phase(*phase).mean_us)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn performance_tracks_window() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.performance().fps, 0.0);
        stats.record_frame(1.0 / 50.0);
        stats.record_frame(1.0 / 100.0);
        let perf = stats.performance();
        assert_relative_eq!(perf.fps_min, 50.0, max_relative = 1e-4);
        assert_relative_eq!(perf.fps_max, 100.0, max_relative = 1e-4);
        assert_relative_eq!(perf.fps, 2.0 / 0.03, max_relative = 1e-4);
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut stats = FrameStats::new();
        stats.record_frame(1.0);
        for _ in 0..FRAME_WINDOW {
            stats.record_frame(1.0 / 60.0);
        }
        assert_relative_eq!(stats.performance().fps_min, 60.0, max_relative = 1e-4);
        assert_eq!(stats.frame_count(), FRAME_WINDOW as u64 + 1);
    }

    #[test]
    fn ignores_non_positive_periods() {
        let mut stats = FrameStats::new();
        stats.record_frame(0.0);
        stats.record_frame(-1.0);
        assert_eq!(stats.frame_count(), 0);
    }

    #[test]
    fn first_sample_seeds_the_average() {
        let mut timing = PhaseTiming::default();
        timing.push(100.0);
        assert_relative_eq!(timing.mean_us, 100.0);
        timing.push(0.0);
        assert_relative_eq!(timing.mean_us, 90.0);
        assert_eq!(timing.last_us, 0.0);
        assert_eq!(timing.samples, 2);
    }

    #[test]
    fn measure_charges_only_its_phase() {
        let mut timings = PhaseTimings::new();
        let answer = timings.measure(SystemPhase::Sensing, || 6 * 7);
        assert_eq!(answer, 42);
        assert_eq!(timings.phase(SystemPhase::Sensing).samples, 1);
        assert_eq!(timings.phase(SystemPhase::Camera).samples, 0);
        assert!(timings.tick_us() >= 0.0);
        let line = timings.to_string();
        assert!(line.starts_with("tick "));
        assert!(line.contains("camera 0.0, contact 0.0"));
    }
}
