use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Deferred = 0,
    PoseSample = 1,
    Steer = 2,
    Threat = 3,
    Kinematics = 4,
    Teleport = 5,
    Collision = 6,
    BuildFrame = 7,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 8] = [
        Self::Deferred,
        Self::PoseSample,
        Self::Steer,
        Self::Threat,
        Self::Kinematics,
        Self::Teleport,
        Self::Collision,
        Self::BuildFrame,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Deferred => "Deferred",
            Self::PoseSample => "Pose",
            Self::Steer => "Steer",
            Self::Threat => "Threat",
            Self::Kinematics => "Kinematics",
            Self::Teleport => "Teleport",
            Self::Collision => "Collision",
            Self::BuildFrame => "Build Frame",
        }
    }
}

/// Per-system timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 8],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 8],
            start: Instant::now(),
        }
    }

    /// Call before a system runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a system finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line breakdown for the periodic log.
    pub fn summary(&self) -> String {
        let mut out = format!("tick {:.0}us |", self.total_us());
        for phase in SystemPhase::ALL {
            out.push_str(&format!(
                " {}: {:.0}",
                phase.label(),
                self.durations_us[phase as usize]
            ));
        }
        out
    }
}

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}
