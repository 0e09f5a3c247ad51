//! Frame timing monitor and quality adjustment

use heapless::HistoryBuffer;
use peanut_hal::MemoryProbe;

use super::profile::{PerformanceMode, QualityProfile, SAMPLES};

/// Frames in the moving average
pub const FRAME_WINDOW: usize = 10;
pub const DEFAULT_TARGET_FPS: u32 = 10;
/// Free heap below this many bytes counts as pressure
pub const DEFAULT_MEMORY_RESERVE: usize = 10_000;
/// Sample ceiling while memory is tight
pub const PRESSURE_SAMPLES: usize = 20;

/// What `end_frame` did to the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameVerdict {
    /// Average exceeded 1.5x the budget
    Degraded,
    /// Average was under half the budget
    Improved,
    Steady,
}

/// Snapshot for status lines and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GovernorStats {
    pub mode: PerformanceMode,
    pub profile: QualityProfile,
    pub budget_ms: u32,
    pub average_ms: Option<u32>,
    pub frames: u32,
    pub degradations: u32,
    pub improvements: u32,
}

/// Adaptive quality controller
///
/// Call `start_frame` before drawing and `end_frame` after. The governor
/// only changes the profile returned by `profile()`; callers read it when
/// they set up the next frame.
#[derive(Debug, Clone)]
pub struct PerformanceGovernor {
    mode: PerformanceMode,
    profile: QualityProfile,
    window: HistoryBuffer<u32, FRAME_WINDOW>,
    budget_ms: u32,
    memory_reserve: usize,
    frames: u32,
    degradations: u32,
    improvements: u32,
}

impl Default for PerformanceGovernor {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS, DEFAULT_MEMORY_RESERVE, PerformanceMode::Eco)
    }
}

impl PerformanceGovernor {
    /// `target_fps` of zero is treated as one
    pub fn new(target_fps: u32, memory_reserve: usize, mode: PerformanceMode) -> Self {
        Self {
            mode,
            profile: mode.profile(),
            window: HistoryBuffer::new(),
            budget_ms: 1000 / target_fps.max(1),
            memory_reserve,
            frames: 0,
            degradations: 0,
            improvements: 0,
        }
    }

    pub fn profile(&self) -> QualityProfile {
        self.profile
    }

    pub fn mode(&self) -> PerformanceMode {
        self.mode
    }

    pub fn budget_ms(&self) -> u32 {
        self.budget_ms
    }

    /// Marks the start of a frame; hand the result back to `end_frame`
    pub fn start_frame(&self, now_ms: u32) -> u32 {
        now_ms
    }

    /// Record a finished frame and adjust quality
    pub fn end_frame(&mut self, start_ms: u32, now_ms: u32) -> FrameVerdict {
        self.window.write(now_ms.wrapping_sub(start_ms));
        self.frames = self.frames.wrapping_add(1);

        let len = self.window.len() as u64;
        let sum: u64 = self.window.as_slice().iter().map(|&t| u64::from(t)).sum();
        let budget = u64::from(self.budget_ms);

        // sum / len > 1.5 * budget, kept in integers
        if sum * 2 > budget * 3 * len {
            self.profile = self.profile.degraded();
            self.degradations = self.degradations.wrapping_add(1);
            FrameVerdict::Degraded
        } else if sum * 2 < budget * len {
            self.profile = self.profile.improved();
            self.improvements = self.improvements.wrapping_add(1);
            FrameVerdict::Improved
        } else {
            FrameVerdict::Steady
        }
    }

    /// Mean of the recorded frame times
    pub fn average_ms(&self) -> Option<u32> {
        let len = self.window.len();
        if len == 0 {
            return None;
        }
        let sum: u64 = self.window.as_slice().iter().map(|&t| u64::from(t)).sum();
        Some((sum / len as u64) as u32)
    }

    /// Ask the allocator to tidy up, then compare free heap to the reserve
    pub fn check_memory_pressure<P: MemoryProbe>(&self, probe: &mut P) -> bool {
        probe.collect();
        probe.free_bytes() < self.memory_reserve
    }

    /// Sample count for a plot `width` world units wide
    ///
    /// Scales the profile's base count by `width / 10` (limited to 0.5..2),
    /// then clamps to the sample bounds. Under memory pressure the result
    /// never exceeds `PRESSURE_SAMPLES`.
    pub fn effective_samples(&self, width: f32, pressure: bool) -> usize {
        let factor = if width.is_finite() {
            (width / 10.0).clamp(0.5, 2.0)
        } else {
            1.0
        };
        let scaled = (f32::from(self.profile.sample_count) * factor) as usize;
        let samples = scaled.clamp(usize::from(SAMPLES.min), usize::from(SAMPLES.max));
        if pressure {
            samples.min(PRESSURE_SAMPLES)
        } else {
            samples
        }
    }

    /// Load a preset, discarding adaptive adjustments and timing history
    pub fn set_mode(&mut self, mode: PerformanceMode) {
        self.mode = mode;
        self.profile = mode.profile();
        self.window.clear();
    }

    pub fn cycle_mode(&mut self) -> PerformanceMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    pub fn stats(&self) -> GovernorStats {
        GovernorStats {
            mode: self.mode,
            profile: self.profile,
            budget_ms: self.budget_ms,
            average_ms: self.average_ms(),
            frames: self.frames,
            degradations: self.degradations,
            improvements: self.improvements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governor::profile::{ITERATIONS, MESH};
    use proptest::prelude::*;

    struct FixedProbe {
        free: usize,
        collections: u32,
    }

    impl MemoryProbe for FixedProbe {
        fn collect(&mut self) {
            self.collections += 1;
        }

        fn free_bytes(&self) -> usize {
            self.free
        }
    }

    #[test]
    fn test_budget_from_fps() {
        assert_eq!(PerformanceGovernor::default().budget_ms(), 100);
        let g = PerformanceGovernor::new(0, 0, PerformanceMode::Fast);
        assert_eq!(g.budget_ms(), 1000);
    }

    #[test]
    fn test_slow_frame_degrades() {
        let mut g = PerformanceGovernor::default();
        let start = g.start_frame(1_000);
        assert_eq!(g.end_frame(start, 1_200), FrameVerdict::Degraded);
        let p = g.profile();
        assert_eq!(p.sample_count, 180);
        assert_eq!(p.mesh_resolution, 18);
        assert_eq!(p.iteration_limit, 45);
    }

    #[test]
    fn test_fast_frame_improves() {
        let mut g = PerformanceGovernor::default();
        let start = g.start_frame(500);
        assert_eq!(g.end_frame(start, 520), FrameVerdict::Improved);
        let p = g.profile();
        assert_eq!(p.sample_count, 210);
        assert_eq!(p.mesh_resolution, 21);
        assert_eq!(p.iteration_limit, 55);
    }

    #[test]
    fn test_on_budget_is_steady() {
        let mut g = PerformanceGovernor::default();
        assert_eq!(g.end_frame(0, 100), FrameVerdict::Steady);
        assert_eq!(g.end_frame(0, 150), FrameVerdict::Steady);
        assert_eq!(g.profile(), PerformanceMode::Eco.profile());
        assert_eq!(g.average_ms(), Some(125));
    }

    #[test]
    fn test_average_uses_window() {
        let mut g = PerformanceGovernor::default();
        for _ in 0..FRAME_WINDOW {
            g.end_frame(0, 400);
        }
        // Ten fast frames push the slow ones out of the window
        for _ in 0..FRAME_WINDOW {
            g.end_frame(0, 10);
        }
        assert_eq!(g.average_ms(), Some(10));
    }

    #[test]
    fn test_wrapping_timestamps() {
        let mut g = PerformanceGovernor::default();
        let start = u32::MAX - 10;
        assert_eq!(g.end_frame(start, 20), FrameVerdict::Improved);
        assert_eq!(g.average_ms(), Some(31));
    }

    #[test]
    fn test_sustained_overload_bottoms_out() {
        let mut g = PerformanceGovernor::new(10, 0, PerformanceMode::Quality);
        for _ in 0..100 {
            g.end_frame(0, 1_000);
        }
        let p = g.profile();
        assert_eq!(p.sample_count, SAMPLES.min);
        assert_eq!(p.mesh_resolution, MESH.min);
        assert_eq!(p.iteration_limit, ITERATIONS.min);
    }

    #[test]
    fn test_double_budget_then_fifth_budget() {
        let mut g = PerformanceGovernor::default();
        let budget = g.budget_ms();

        // Ten frames at twice the budget: one step down each, to the floor
        let mut last = g.profile().sample_count;
        for _ in 0..10 {
            assert_eq!(g.end_frame(0, budget * 2), FrameVerdict::Degraded);
            let samples = g.profile().sample_count;
            assert!(samples < last, "{} not below {}", samples, last);
            last = samples;
        }
        assert_eq!(last, SAMPLES.min);

        // Ten at a fifth: never lower, recovering once the slow frames age out
        for _ in 0..10 {
            g.end_frame(0, budget / 5);
            let samples = g.profile().sample_count;
            assert!(samples >= last);
            assert!(samples <= SAMPLES.max);
            last = samples;
        }
        assert!(last > SAMPLES.min);
    }

    #[test]
    fn test_fast_frames_stop_at_maximum() {
        let mut g = PerformanceGovernor::new(10, 0, PerformanceMode::Quality);
        let mut last = g.profile().sample_count;
        for _ in 0..15 {
            assert_eq!(g.end_frame(0, g.budget_ms() / 5), FrameVerdict::Improved);
            let samples = g.profile().sample_count;
            assert!(samples <= SAMPLES.max);
            assert!(samples > last || samples == SAMPLES.max);
            last = samples;
        }
        assert_eq!(last, SAMPLES.max);
    }

    #[test]
    fn test_memory_pressure() {
        let g = PerformanceGovernor::default();
        let mut probe = FixedProbe {
            free: 9_999,
            collections: 0,
        };
        assert!(g.check_memory_pressure(&mut probe));
        assert_eq!(probe.collections, 1);
        probe.free = 10_000;
        assert!(!g.check_memory_pressure(&mut probe));
    }

    #[test]
    fn test_effective_samples() {
        let g = PerformanceGovernor::default();
        assert_eq!(g.effective_samples(20.0, false), 400);
        assert_eq!(g.effective_samples(1.0, false), 100);
        assert_eq!(g.effective_samples(1_000.0, false), 400);
        assert_eq!(g.effective_samples(20.0, true), PRESSURE_SAMPLES);
        assert_eq!(g.effective_samples(f32::NAN, false), 200);

        let mut quality = PerformanceGovernor::new(10, 0, PerformanceMode::Quality);
        assert_eq!(quality.effective_samples(40.0, false), 500);
        quality.set_mode(PerformanceMode::Fast);
        assert_eq!(quality.effective_samples(10.0, false), 100);
    }

    #[test]
    fn test_cycle_mode_resets_profile() {
        let mut g = PerformanceGovernor::default();
        g.end_frame(0, 500);
        assert_ne!(g.profile(), PerformanceMode::Eco.profile());
        assert_eq!(g.cycle_mode(), PerformanceMode::Fast);
        assert_eq!(g.profile(), PerformanceMode::Fast.profile());
        assert_eq!(g.average_ms(), None);
        let stats = g.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.degradations, 1);
    }

    proptest! {
        #[test]
        fn test_profile_stays_in_bounds(times in proptest::collection::vec(0u32..2_000, 1..64)) {
            let mut g = PerformanceGovernor::default();
            for t in times {
                g.end_frame(0, t);
                let p = g.profile();
                prop_assert!((SAMPLES.min..=SAMPLES.max).contains(&p.sample_count));
                prop_assert!((MESH.min..=MESH.max).contains(&p.mesh_resolution));
                prop_assert!((ITERATIONS.min..=ITERATIONS.max).contains(&p.iteration_limit));
            }
        }

        #[test]
        fn test_effective_samples_in_bounds(width in -100.0f32..1_000.0, pressure: bool) {
            let g = PerformanceGovernor::default();
            let n = g.effective_samples(width, pressure);
            prop_assert!((10..=500).contains(&n));
            if pressure {
                prop_assert!(n <= PRESSURE_SAMPLES);
            }
        }
    }
}
