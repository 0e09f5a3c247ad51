//! Quality profile and presets

/// Limits and step sizes for one quality knob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QualityBounds {
    pub min: u16,
    pub max: u16,
    /// Subtracted when degrading
    pub down: u16,
    /// Added when improving
    pub up: u16,
}

impl QualityBounds {
    pub fn clamp(&self, value: u16) -> u16 {
        value.clamp(self.min, self.max)
    }

    fn lower(&self, value: u16) -> u16 {
        self.clamp(value.saturating_sub(self.down))
    }

    fn raise(&self, value: u16) -> u16 {
        self.clamp(value.saturating_add(self.up))
    }
}

/// Curve samples per plot
pub const SAMPLES: QualityBounds = QualityBounds {
    min: 10,
    max: 500,
    down: 20,
    up: 10,
};

/// Surface grid edge
pub const MESH: QualityBounds = QualityBounds {
    min: 10,
    max: 40,
    down: 2,
    up: 1,
};

/// Fractal iteration cap
pub const ITERATIONS: QualityBounds = QualityBounds {
    min: 10,
    max: 150,
    down: 5,
    up: 5,
};

/// Current render quality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityProfile {
    pub sample_count: u16,
    pub mesh_resolution: u16,
    pub iteration_limit: u16,
}

impl QualityProfile {
    /// Every field forced into its bounds
    pub fn clamped(self) -> Self {
        Self {
            sample_count: SAMPLES.clamp(self.sample_count),
            mesh_resolution: MESH.clamp(self.mesh_resolution),
            iteration_limit: ITERATIONS.clamp(self.iteration_limit),
        }
    }

    /// One step toward the minimums
    pub fn degraded(self) -> Self {
        Self {
            sample_count: SAMPLES.lower(self.sample_count),
            mesh_resolution: MESH.lower(self.mesh_resolution),
            iteration_limit: ITERATIONS.lower(self.iteration_limit),
        }
    }

    /// One step toward the maximums
    pub fn improved(self) -> Self {
        Self {
            sample_count: SAMPLES.raise(self.sample_count),
            mesh_resolution: MESH.raise(self.mesh_resolution),
            iteration_limit: ITERATIONS.raise(self.iteration_limit),
        }
    }
}

/// Starting points for the quality profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerformanceMode {
    /// Balanced
    #[default]
    Eco,
    /// Speed first
    Fast,
    /// Detail first
    Quality,
}

impl PerformanceMode {
    pub fn profile(self) -> QualityProfile {
        match self {
            PerformanceMode::Eco => QualityProfile {
                sample_count: 200,
                mesh_resolution: 20,
                iteration_limit: 50,
            },
            PerformanceMode::Fast => QualityProfile {
                sample_count: 100,
                mesh_resolution: 15,
                iteration_limit: 30,
            },
            PerformanceMode::Quality => QualityProfile {
                sample_count: 400,
                mesh_resolution: 30,
                iteration_limit: 100,
            },
        }
    }

    /// Eco → Fast → Quality → Eco
    pub fn next(self) -> Self {
        match self {
            PerformanceMode::Eco => PerformanceMode::Fast,
            PerformanceMode::Fast => PerformanceMode::Quality,
            PerformanceMode::Quality => PerformanceMode::Eco,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PerformanceMode::Eco => "eco",
            PerformanceMode::Fast => "fast",
            PerformanceMode::Quality => "quality",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eco" => Some(PerformanceMode::Eco),
            "fast" => Some(PerformanceMode::Fast),
            "quality" => Some(PerformanceMode::Quality),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let eco = PerformanceMode::Eco.profile();
        assert_eq!(
            (eco.sample_count, eco.mesh_resolution, eco.iteration_limit),
            (200, 20, 50)
        );
        let fast = PerformanceMode::Fast.profile();
        assert_eq!(
            (fast.sample_count, fast.mesh_resolution, fast.iteration_limit),
            (100, 15, 30)
        );
        let quality = PerformanceMode::Quality.profile();
        assert_eq!(
            (quality.sample_count, quality.mesh_resolution, quality.iteration_limit),
            (400, 30, 100)
        );
    }

    #[test]
    fn test_steps() {
        let p = PerformanceMode::Eco.profile();
        assert_eq!(
            p.degraded(),
            QualityProfile {
                sample_count: 180,
                mesh_resolution: 18,
                iteration_limit: 45
            }
        );
        assert_eq!(
            p.improved(),
            QualityProfile {
                sample_count: 210,
                mesh_resolution: 21,
                iteration_limit: 55
            }
        );
    }

    #[test]
    fn test_steps_stop_at_limits() {
        let low = QualityProfile {
            sample_count: 15,
            mesh_resolution: 11,
            iteration_limit: 12,
        };
        assert_eq!(
            low.degraded(),
            QualityProfile {
                sample_count: 10,
                mesh_resolution: 10,
                iteration_limit: 10
            }
        );
        let high = QualityProfile {
            sample_count: 495,
            mesh_resolution: 40,
            iteration_limit: 148,
        };
        assert_eq!(
            high.improved(),
            QualityProfile {
                sample_count: 500,
                mesh_resolution: 40,
                iteration_limit: 150
            }
        );
    }

    #[test]
    fn test_mode_names() {
        for mode in [
            PerformanceMode::Eco,
            PerformanceMode::Fast,
            PerformanceMode::Quality,
        ] {
            assert_eq!(PerformanceMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(PerformanceMode::from_name("turbo"), None);
        assert_eq!(PerformanceMode::Quality.next(), PerformanceMode::Eco);
    }
}
