/// Whole-game phase. Only one creature can be caught at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Caught,
}

/// Minimum points for any catch.
const MIN_POINTS: i64 = 10;
/// Points for an instant catch; one point less per 100 ms of play.
const MAX_POINTS: i64 = 100;

/// Process-wide game state. Reinitialised in place on every respawn.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: Phase,
    pub score: u32,
    pub catches: u32,
    /// When the current round started (ms).
    pub started_ms: f64,
    /// Required continuous contact before a catch (ms).
    pub catch_time_required_ms: f64,
    /// Creature whose respawn is scheduled, if any.
    pub pending_respawn: Option<hecs::Entity>,
}

impl GameSession {
    pub fn new(now_ms: f64, catch_time_required_ms: f64) -> Self {
        Self {
            phase: Phase::Playing,
            score: 0,
            catches: 0,
            started_ms: now_ms,
            catch_time_required_ms,
            pending_respawn: None,
        }
    }

    /// Seconds since the round started.
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_ms) / 1000.0).max(0.0)
    }

    /// Points a catch at `now_ms` would be worth: `max(10, 100 - floor(secs * 10))`.
    pub fn points_at(&self, now_ms: f64) -> u32 {
        let penalty = (self.elapsed_secs(now_ms) * 10.0).floor() as i64;
        (MAX_POINTS - penalty).max(MIN_POINTS) as u32
    }

    /// Book a catch. Returns the points awarded.
    pub fn award(&mut self, now_ms: f64) -> u32 {
        let points = self.points_at(now_ms);
        self.score += points;
        self.catches += 1;
        self.phase = Phase::Caught;
        points
    }

    /// Start a fresh round after a respawn. Score carries over.
    pub fn restart(&mut self, now_ms: f64) {
        self.phase = Phase::Playing;
        self.started_ms = now_ms;
        self.pending_respawn = None;
    }
}
