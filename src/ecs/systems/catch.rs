use crate::ecs::components::{CreatureId, Heading, Position, Size, Speed, Status, Touching};
use crate::scheduler::{Scheduler, TaskKind};
use crate::session::{GameSession, Phase};
use crate::viewport::Viewport;

/// Delay between a catch and the creature coming back (ms).
pub const RESPAWN_DELAY_MS: f64 = 2000.0;
/// Speed a respawned creature starts at, before its first escape resets it.
pub const RESPAWN_SPEED: f32 = 1.5;

/// Per-creature catch progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatchState {
    /// No hand inside the catch radius.
    Idle,
    /// A hand has stayed inside the catch radius since `since_ms`.
    Contacting { since_ms: f64 },
    /// Caught at `at_ms`. Transient: `capture` moves on to `Respawning` in the same tick.
    Caught { at_ms: f64 },
    /// Out of play until `due_ms`.
    Respawning { due_ms: f64 },
}

/// Outcome of feeding one tick of contact into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Holding,
    Captured,
}

/// Emitted once per catch.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchEvent {
    pub entity: hecs::Entity,
    pub creature: String,
    pub points: u32,
    pub score: u32,
    pub elapsed_secs: f64,
}

/// A hand is inside the catch radius this tick.
pub fn observe_contact(state: &mut CatchState, session: &GameSession, now_ms: f64) -> Contact {
    match *state {
        CatchState::Idle => {
            *state = CatchState::Contacting { since_ms: now_ms };
            Contact::Holding
        }
        CatchState::Contacting { since_ms } => {
            // Someone else is already caught: keep holding, no second catch.
            if session.phase == Phase::Caught {
                return Contact::Holding;
            }
            if now_ms - since_ms >= session.catch_time_required_ms {
                *state = CatchState::Caught { at_ms: now_ms };
                Contact::Captured
            } else {
                Contact::Holding
            }
        }
        CatchState::Caught { .. } | CatchState::Respawning { .. } => Contact::Holding,
    }
}

/// The hand left the catch radius. Contact resets hard, no decay.
pub fn release(state: &mut CatchState) {
    if matches!(state, CatchState::Contacting { .. }) {
        *state = CatchState::Idle;
    }
}

/// Score the catch, take the creature out of play and schedule its respawn.
#[allow(clippy::too_many_arguments)]
pub fn capture(
    entity: hecs::Entity,
    id: &CreatureId,
    state: &mut CatchState,
    status: &mut Status,
    touching: &mut Touching,
    session: &mut GameSession,
    scheduler: &mut Scheduler,
    now_ms: f64,
) -> CatchEvent {
    let elapsed_secs = session.elapsed_secs(now_ms);
    let points = session.award(now_ms);

    status.visible = false;
    touching.0 = None;

    let due_ms = now_ms + RESPAWN_DELAY_MS;
    if let Some(prev) = session.pending_respawn {
        if prev != entity {
            log::warn!("Respawn for {prev:?} still pending while {} was caught", id.0);
        }
    }
    scheduler.schedule(entity, TaskKind::Respawn, due_ms);
    session.pending_respawn = Some(entity);
    *state = CatchState::Respawning { due_ms };

    log::info!(
        "Caught {} after {:.1}s: +{} (score {})",
        id.0,
        elapsed_secs,
        points,
        session.score
    );

    CatchEvent {
        entity,
        creature: id.0.clone(),
        points,
        score: session.score,
        elapsed_secs,
    }
}

/// Put a caught creature back at a random spot and start a new round.
pub fn respawn(
    world: &mut hecs::World,
    entity: hecs::Entity,
    session: &mut GameSession,
    scheduler: &mut Scheduler,
    viewport: &Viewport,
    now_ms: f64,
    rng: &mut fastrand::Rng,
) {
    match world.query_one_mut::<(
        &CreatureId,
        &mut Position,
        &mut Heading,
        &mut Speed,
        &Size,
        &mut Status,
        &mut CatchState,
    )>(entity)
    {
        Ok((id, pos, heading, speed, size, status, state)) => {
            pos.0 = viewport.random_anchor(rng, size.0);
            heading.0 = rng.f32() * std::f32::consts::TAU;
            speed.current = RESPAWN_SPEED;
            status.visible = true;
            status.concealed = false;
            *state = CatchState::Idle;
            scheduler.cancel(entity, TaskKind::Reveal);
            log::info!("Respawned {} at ({:.0}, {:.0})", id.0, pos.0.x, pos.0.y);
        }
        Err(_) => log::warn!("Respawn fired for missing creature {entity:?}"),
    }
    session.restart(now_ms);
}
