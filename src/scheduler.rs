/// What a deferred task does when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Bring a caught creature back into play.
    Respawn,
    /// Show a creature hidden by an edge teleport.
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred {
    pub entity: hecs::Entity,
    pub kind: TaskKind,
    pub due_ms: f64,
}

/// Delayed callbacks, keyed by (creature, kind) and run on the frame tick.
///
/// Scheduling the same key twice replaces the earlier task, so a creature
/// never has two respawns or two reveals pending.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an earlier task with the same key was replaced.
    pub fn schedule(&mut self, entity: hecs::Entity, kind: TaskKind, due_ms: f64) -> bool {
        let replaced = self.cancel(entity, kind);
        if replaced {
            log::debug!("Replacing pending {kind:?} for {entity:?}");
        }
        self.tasks.push(Deferred {
            entity,
            kind,
            due_ms,
        });
        replaced
    }

    pub fn cancel(&mut self, entity: hecs::Entity, kind: TaskKind) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| !(t.entity == entity && t.kind == kind));
        self.tasks.len() != before
    }

    pub fn is_pending(&self, entity: hecs::Entity, kind: TaskKind) -> bool {
        self.tasks
            .iter()
            .any(|t| t.entity == entity && t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Move every task due at `now_ms` into `out`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64, out: &mut Vec<Deferred>) {
        out.clear();
        self.tasks.retain(|t| {
            if t.due_ms <= now_ms {
                out.push(*t);
                false
            } else {
                true
            }
        });
        out.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> (hecs::Entity, hecs::Entity) {
        let mut world = hecs::World::new();
        (world.spawn(()), world.spawn(()))
    }

    #[test]
    fn same_key_replaces() {
        let (a, _) = entities();
        let mut s = Scheduler::new();
        assert!(!s.schedule(a, TaskKind::Respawn, 100.0));
        assert!(s.schedule(a, TaskKind::Respawn, 300.0));
        assert!(!s.schedule(a, TaskKind::Reveal, 200.0));
        assert_eq!(s.len(), 2);

        let mut out = Vec::new();
        s.drain_due(250.0, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, TaskKind::Reveal);
        assert!(s.is_pending(a, TaskKind::Respawn));
    }

    #[test]
    fn drains_in_due_order() {
        let (a, b) = entities();
        let mut s = Scheduler::new();
        s.schedule(a, TaskKind::Reveal, 50.0);
        s.schedule(b, TaskKind::Respawn, 10.0);
        let mut out = Vec::new();
        s.drain_due(60.0, &mut out);
        assert_eq!(out.iter().map(|t| t.entity).collect::<Vec<_>>(), vec![b, a]);
        assert!(s.is_empty());
    }

    #[test]
    fn cancel_removes_only_that_key() {
        let (a, b) = entities();
        let mut s = Scheduler::new();
        s.schedule(a, TaskKind::Respawn, 10.0);
        s.schedule(b, TaskKind::Respawn, 10.0);
        assert!(s.cancel(a, TaskKind::Respawn));
        assert!(!s.cancel(a, TaskKind::Respawn));
        assert!(s.is_pending(b, TaskKind::Respawn));
    }
}
