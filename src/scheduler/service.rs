//! The scheduler: daemon and fuse registries plus the per-turn tick
//!
//! Each tick runs in two phases, always in the same order:
//! 1. Daemons, highest priority first, ties in registration order
//! 2. Fuses, same ordering; spent fuses are removed after the loop

use std::cmp::Reverse;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::config::SchedulerConfig;
use crate::core::error::{Result, SchedulerError};
use crate::core::events::SemanticEvent;
use crate::core::types::{Priority, Turn};
use crate::scheduler::context::{SchedulerContext, WorldModel};
use crate::scheduler::daemon::{Daemon, DaemonInfo, DaemonState};
use crate::scheduler::fuse::{Fuse, FuseInfo, FuseState};
use crate::scheduler::random::SeededRandom;
use crate::scheduler::report::{
    invoke_guarded, CallbackFault, CallbackPhase, FaultReporter, TracingReporter,
};

/// Everything one tick produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResult {
    pub events: Vec<SemanticEvent>,
    pub daemons_run: Vec<String>,
    pub fuses_triggered: Vec<String>,
}

pub(crate) struct DaemonSlot<W> {
    pub(crate) daemon: Daemon<W>,
    pub(crate) state: DaemonState,
    pub(crate) seq: u64,
}

pub(crate) struct FuseSlot<W> {
    pub(crate) fuse: Fuse<W>,
    pub(crate) state: FuseState,
    pub(crate) seq: u64,
}

/// Owns all daemons and fuses for one game session
pub struct Scheduler<W> {
    pub(crate) daemons: AHashMap<String, DaemonSlot<W>>,
    pub(crate) fuses: AHashMap<String, FuseSlot<W>>,
    pub(crate) random: SeededRandom,
    pub(crate) current_turn: Turn,
    next_seq: u64,
    reporter: Box<dyn FaultReporter>,
    isolate_panics: bool,
}

impl<W> Scheduler<W> {
    pub fn new(seed: u64) -> Self {
        Self::with_config(&SchedulerConfig::seeded(seed))
    }

    pub fn with_config(config: &SchedulerConfig) -> Self {
        let random = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Self {
            daemons: AHashMap::new(),
            fuses: AHashMap::new(),
            random,
            current_turn: 0,
            next_seq: 0,
            reporter: Box::new(TracingReporter),
            isolate_panics: config.isolate_panics,
        }
    }

    /// Replace the fault reporter (defaults to `TracingReporter`)
    pub fn with_reporter(mut self, reporter: impl FaultReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    // === DAEMONS ===

    /// Register a daemon. Fails if the id is already taken.
    pub fn register_daemon(&mut self, daemon: Daemon<W>) -> Result<()> {
        if self.daemons.contains_key(&daemon.id) {
            return Err(SchedulerError::DuplicateDaemon(daemon.id));
        }
        let seq = self.take_seq();
        let id = daemon.id.clone();
        let state = DaemonState::new(id.clone());
        self.daemons.insert(id, DaemonSlot { daemon, state, seq });
        Ok(())
    }

    /// Remove a daemon. Returns whether it was registered.
    pub fn remove_daemon(&mut self, id: &str) -> bool {
        match self.daemons.remove(id) {
            Some(mut slot) => {
                slot.daemon.notify_removed();
                true
            }
            None => false,
        }
    }

    pub fn pause_daemon(&mut self, id: &str) {
        if let Some(slot) = self.daemons.get_mut(id) {
            slot.state.is_paused = true;
        }
    }

    pub fn resume_daemon(&mut self, id: &str) {
        if let Some(slot) = self.daemons.get_mut(id) {
            slot.state.is_paused = false;
        }
    }

    pub fn has_daemon(&self, id: &str) -> bool {
        self.daemons.contains_key(id)
    }

    pub fn daemon_count(&self) -> usize {
        self.daemons.len()
    }

    // === FUSES ===

    /// Set (or restart) a fuse. An existing fuse with the same id is
    /// replaced and keeps its place in registration order.
    pub fn set_fuse(&mut self, mut fuse: Fuse<W>) {
        fuse.original_turns = fuse.original_turns.or(Some(fuse.turns));
        let state = FuseState {
            id: fuse.id.clone(),
            turns_remaining: fuse.turns,
            is_paused: false,
            entity_id: fuse.entity_id.clone(),
        };
        let seq = match self.fuses.get(&fuse.id) {
            Some(existing) => existing.seq,
            None => self.take_seq(),
        };
        self.fuses.insert(fuse.id.clone(), FuseSlot { fuse, state, seq });
    }

    /// Cancel a fuse, firing its `on_cancel` callback.
    ///
    /// The fuse is removed even if the callback fails; in that case no
    /// events are returned.
    pub fn cancel_fuse(&mut self, id: &str) -> Vec<SemanticEvent> {
        let Some(mut slot) = self.fuses.remove(id) else {
            return Vec::new();
        };
        let Some(on_cancel) = slot.fuse.on_cancel.as_mut() else {
            return Vec::new();
        };

        let turn = self.current_turn;
        let mut ctx = SchedulerContext::new(
            None,
            turn,
            &mut self.random,
            String::new(),
            String::new(),
        );
        match invoke_guarded(self.isolate_panics, || on_cancel(&mut ctx)) {
            Ok(events) => events,
            Err(cause) => {
                self.reporter.report(&CallbackFault {
                    phase: CallbackPhase::FuseCancel,
                    id: id.to_string(),
                    turn,
                    cause,
                });
                Vec::new()
            }
        }
    }

    pub fn fuse_remaining(&self, id: &str) -> Option<u32> {
        self.fuses.get(id).map(|slot| slot.state.turns_remaining)
    }

    /// Add `delta` turns to a fuse's countdown, never going below zero
    pub fn adjust_fuse(&mut self, id: &str, delta: i64) {
        if let Some(slot) = self.fuses.get_mut(id) {
            let adjusted = i64::from(slot.state.turns_remaining).saturating_add(delta);
            slot.state.turns_remaining = adjusted.clamp(0, i64::from(u32::MAX)) as u32;
        }
    }

    pub fn pause_fuse(&mut self, id: &str) {
        if let Some(slot) = self.fuses.get_mut(id) {
            slot.state.is_paused = true;
        }
    }

    pub fn resume_fuse(&mut self, id: &str) {
        if let Some(slot) = self.fuses.get_mut(id) {
            slot.state.is_paused = false;
        }
    }

    pub fn has_fuse(&self, id: &str) -> bool {
        self.fuses.contains_key(id)
    }

    pub fn fuse_count(&self) -> usize {
        self.fuses.len()
    }

    /// Cancel every fuse bound to `entity_id`, concatenating their
    /// cancellation events. Other fuses are untouched.
    pub fn cleanup_entity(&mut self, entity_id: &str) -> Vec<SemanticEvent> {
        let mut bound: Vec<(u64, String)> = self
            .fuses
            .values()
            .filter(|slot| slot.state.entity_id.as_deref() == Some(entity_id))
            .map(|slot| (slot.seq, slot.state.id.clone()))
            .collect();
        bound.sort();

        let mut events = Vec::new();
        for (_, id) in bound {
            events.extend(self.cancel_fuse(&id));
        }
        events
    }

    // === INTROSPECTION ===

    pub fn active_daemons(&self) -> Vec<DaemonInfo> {
        let mut slots: Vec<&DaemonSlot<W>> = self.daemons.values().collect();
        slots.sort_by_key(|slot| (Reverse(slot.daemon.priority), slot.seq));
        slots
            .into_iter()
            .map(|slot| DaemonInfo {
                id: slot.daemon.id.clone(),
                name: slot.daemon.name.clone(),
                is_paused: slot.state.is_paused,
                run_count: slot.state.run_count,
                priority: slot.daemon.priority,
            })
            .collect()
    }

    pub fn active_fuses(&self) -> Vec<FuseInfo> {
        let mut slots: Vec<&FuseSlot<W>> = self.fuses.values().collect();
        slots.sort_by_key(|slot| (Reverse(slot.fuse.priority), slot.seq));
        slots
            .into_iter()
            .map(|slot| FuseInfo {
                id: slot.fuse.id.clone(),
                name: slot.fuse.name.clone(),
                turns_remaining: slot.state.turns_remaining,
                is_paused: slot.state.is_paused,
                entity_id: slot.state.entity_id.clone(),
                priority: slot.fuse.priority,
                repeat: slot.fuse.repeat,
            })
            .collect()
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    pub fn random(&self) -> &SeededRandom {
        &self.random
    }

    pub fn random_mut(&mut self) -> &mut SeededRandom {
        &mut self.random
    }

    fn daemon_order(&self) -> Vec<String> {
        sorted_ids(
            self.daemons
                .iter()
                .map(|(id, slot)| (id, slot.daemon.priority, slot.seq)),
        )
    }

    fn fuse_order(&self) -> Vec<String> {
        sorted_ids(
            self.fuses
                .iter()
                .map(|(id, slot)| (id, slot.fuse.priority, slot.seq)),
        )
    }
}

impl<W: WorldModel> Scheduler<W> {
    /// Advance all daemons and fuses by one turn
    pub fn tick(&mut self, world: &mut W, turn: Turn, player_id: &str) -> TickResult {
        self.current_turn = turn;

        let player_location = world.location_of(player_id).unwrap_or_default();
        let daemon_order = self.daemon_order();
        let fuse_order = self.fuse_order();

        let Self {
            daemons,
            fuses,
            random,
            reporter,
            isolate_panics,
            ..
        } = self;
        let isolate_panics = *isolate_panics;

        let mut ctx = SchedulerContext::new(
            Some(world),
            turn,
            random,
            player_location,
            player_id.to_string(),
        );
        let mut result = TickResult::default();

        // 1. Daemons
        for id in daemon_order {
            let Some(slot) = daemons.get_mut(&id) else {
                continue;
            };
            if slot.state.is_paused {
                tracing::trace!(daemon = %id, "Skipping paused daemon");
                continue;
            }
            if !slot.daemon.condition_holds(&ctx) {
                continue;
            }

            let events = match invoke_guarded(isolate_panics, || (slot.daemon.run)(&mut ctx)) {
                Ok(events) => events,
                Err(cause) => {
                    reporter.report(&CallbackFault {
                        phase: CallbackPhase::DaemonRun,
                        id: id.clone(),
                        turn,
                        cause,
                    });
                    continue;
                }
            };
            if events.is_empty() {
                continue;
            }

            result.events.extend(events);
            slot.state.run_count += 1;
            let run_once = slot.daemon.run_once;
            if run_once {
                if let Some(mut removed) = daemons.remove(&id) {
                    removed.daemon.notify_removed();
                }
            }
            result.daemons_run.push(id);
        }

        // 2. Fuses
        let mut spent = Vec::new();
        for id in fuse_order {
            let Some(slot) = fuses.get_mut(&id) else {
                continue;
            };
            if slot.state.is_paused {
                tracing::trace!(fuse = %id, "Skipping paused fuse");
                continue;
            }
            if !slot.fuse.should_tick(&ctx) {
                continue;
            }

            slot.state.turns_remaining = slot.state.turns_remaining.saturating_sub(1);
            if slot.state.turns_remaining > 0 {
                continue;
            }

            match invoke_guarded(isolate_panics, || (slot.fuse.trigger)(&mut ctx)) {
                Ok(events) => {
                    result.events.extend(events);
                    result.fuses_triggered.push(id.clone());
                    match (slot.fuse.repeat, slot.fuse.reset_turns()) {
                        (true, Some(turns)) => slot.state.turns_remaining = turns,
                        _ => spent.push(id),
                    }
                }
                Err(cause) => {
                    reporter.report(&CallbackFault {
                        phase: CallbackPhase::FuseTrigger,
                        id: id.clone(),
                        turn,
                        cause,
                    });
                    spent.push(id);
                }
            }
        }

        // 3. Spent fuses leave both registries together
        for id in &spent {
            fuses.remove(id);
        }

        tracing::debug!(
            turn,
            daemons_run = result.daemons_run.len(),
            fuses_triggered = result.fuses_triggered.len(),
            events = result.events.len(),
            "Scheduler tick complete"
        );

        result
    }
}

impl<W> Default for Scheduler<W> {
    fn default() -> Self {
        Self::with_config(&SchedulerConfig::default())
    }
}

/// Ids ordered by descending priority, ties broken by registration order
fn sorted_ids<'a>(entries: impl Iterator<Item = (&'a String, Priority, u64)>) -> Vec<String> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by_key(|&(_, priority, seq)| (Reverse(priority), seq));
    entries.into_iter().map(|(id, _, _)| id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CallbackError;
    use crate::scheduler::report::CollectingReporter;
    use crate::world::GameWorld;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Scheduler<GameWorld>, GameWorld) {
        let mut world = GameWorld::new();
        world.place("player", "room-1");
        (Scheduler::new(12345), world)
    }

    fn message(id: &str) -> Vec<SemanticEvent> {
        vec![SemanticEvent::message(id)]
    }

    #[test]
    fn test_register_and_remove_daemon() {
        let (mut scheduler, _) = setup();
        scheduler
            .register_daemon(Daemon::new("test-daemon", "Test Daemon", |_| Ok(vec![])))
            .unwrap();
        assert!(scheduler.has_daemon("test-daemon"));

        assert!(scheduler.remove_daemon("test-daemon"));
        assert!(!scheduler.has_daemon("test-daemon"));
        assert!(!scheduler.remove_daemon("test-daemon"));
    }

    #[test]
    fn test_duplicate_daemon_rejected() {
        let (mut scheduler, _) = setup();
        scheduler
            .register_daemon(Daemon::new("dup", "First", |_| Ok(message("first"))))
            .unwrap();
        let err = scheduler
            .register_daemon(Daemon::new("dup", "Second", |_| Ok(message("second"))))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateDaemon(id) if id == "dup"));
        assert_eq!(scheduler.active_daemons()[0].name, "First");
    }

    #[test]
    fn test_daemon_and_fuse_ids_are_separate() {
        let (mut scheduler, mut world) = setup();
        scheduler
            .register_daemon(Daemon::new("shared", "Daemon", |_| Ok(message("daemon"))))
            .unwrap();
        scheduler.set_fuse(Fuse::new("shared", "Fuse", 1, |_| Ok(message("fuse"))));

        let result = scheduler.tick(&mut world, 1, "player");
        assert_eq!(result.daemons_run, vec!["shared"]);
        assert_eq!(result.fuses_triggered, vec!["shared"]);
        assert!(scheduler.has_daemon("shared"));
        assert!(!scheduler.has_fuse("shared"));
    }

    #[test]
    fn test_pause_and_resume_daemon() {
        let (mut scheduler, mut world) = setup();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        scheduler
            .register_daemon(Daemon::new("d", "D", move |_| {
                *counter.borrow_mut() += 1;
                Ok(vec![])
            }))
            .unwrap();

        scheduler.tick(&mut world, 1, "player");
        assert_eq!(*calls.borrow(), 1);

        scheduler.pause_daemon("d");
        scheduler.pause_daemon("d");
        scheduler.tick(&mut world, 2, "player");
        assert_eq!(*calls.borrow(), 1);

        scheduler.resume_daemon("d");
        scheduler.resume_daemon("missing");
        scheduler.tick(&mut world, 3, "player");
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_condition_gates_run() {
        let (mut scheduler, mut world) = setup();
        scheduler
            .register_daemon(
                Daemon::new("cond", "Conditional", |_| Ok(message("ran")))
                    .with_condition(|ctx| ctx.turn >= 2),
            )
            .unwrap();

        assert!(scheduler.tick(&mut world, 1, "player").daemons_run.is_empty());
        assert_eq!(scheduler.tick(&mut world, 2, "player").daemons_run, vec!["cond"]);
    }

    #[test]
    fn test_context_carries_player_location() {
        let (mut scheduler, mut world) = setup();
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = seen.clone();
        scheduler
            .register_daemon(Daemon::new("loc", "Loc", move |ctx| {
                *sink.borrow_mut() = format!("{}@{}", ctx.player_id, ctx.player_location);
                Ok(vec![])
            }))
            .unwrap();

        scheduler.tick(&mut world, 1, "player");
        assert_eq!(*seen.borrow(), "player@room-1");

        scheduler.tick(&mut world, 2, "nobody");
        assert_eq!(*seen.borrow(), "nobody@");
    }

    #[test]
    fn test_run_count_only_increments_on_events() {
        let (mut scheduler, mut world) = setup();
        scheduler
            .register_daemon(Daemon::new("odd", "Odd turns", |ctx| {
                if ctx.turn % 2 == 1 {
                    Ok(message("odd"))
                } else {
                    Ok(vec![])
                }
            }))
            .unwrap();

        for turn in 1..=4 {
            scheduler.tick(&mut world, turn, "player");
        }
        assert_eq!(scheduler.active_daemons()[0].run_count, 2);
    }

    #[test]
    fn test_failing_daemon_does_not_stop_others() {
        let reporter = CollectingReporter::new();
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> =
            Scheduler::new(1).with_reporter(reporter.clone());

        scheduler
            .register_daemon(
                Daemon::new("bad", "Bad", |_| Err(CallbackError::from("boom"))).with_priority(10),
            )
            .unwrap();
        scheduler
            .register_daemon(
                Daemon::new("panicky", "Panicky", |_| panic!("script bug")).with_priority(5),
            )
            .unwrap();
        scheduler
            .register_daemon(Daemon::new("good", "Good", |_| Ok(message("fine"))))
            .unwrap();

        let result = scheduler.tick(&mut world, 1, "player");
        assert_eq!(result.daemons_run, vec!["good"]);
        assert_eq!(result.events.len(), 1);

        let faults = reporter.faults();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].id, "bad");
        assert_eq!(faults[0].phase, CallbackPhase::DaemonRun);
        assert_eq!(faults[1].id, "panicky");
        assert!(scheduler.has_daemon("bad"));
    }

    #[test]
    fn test_fuse_with_zero_turns_fires_next_tick() {
        let (mut scheduler, mut world) = setup();
        scheduler.set_fuse(Fuse::new("now", "Now", 0, |_| Ok(message("bang"))));
        let result = scheduler.tick(&mut world, 1, "player");
        assert_eq!(result.fuses_triggered, vec!["now"]);
        assert!(!scheduler.has_fuse("now"));
    }

    #[test]
    fn test_set_fuse_restarts_countdown() {
        let (mut scheduler, mut world) = setup();
        scheduler.set_fuse(Fuse::new("f", "F", 3, |_| Ok(vec![])));
        scheduler.tick(&mut world, 1, "player");
        scheduler.tick(&mut world, 2, "player");
        assert_eq!(scheduler.fuse_remaining("f"), Some(1));

        scheduler.set_fuse(Fuse::new("f", "F", 3, |_| Ok(vec![])));
        assert_eq!(scheduler.fuse_remaining("f"), Some(3));
        assert_eq!(scheduler.fuse_count(), 1);
    }

    #[test]
    fn test_replaced_fuse_keeps_registration_slot() {
        let (mut scheduler, _) = setup();
        scheduler.set_fuse(Fuse::new("a", "A", 5, |_| Ok(vec![])));
        scheduler.set_fuse(Fuse::new("b", "B", 5, |_| Ok(vec![])));
        scheduler.set_fuse(Fuse::new("a", "A again", 2, |_| Ok(vec![])));

        let ids: Vec<String> = scheduler.active_fuses().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_tick_condition_holds_countdown() {
        let (mut scheduler, mut world) = setup();
        scheduler.set_fuse(
            Fuse::<GameWorld>::new("lit", "Lit", 2, |_| Ok(message("out")))
                .with_tick_condition(|ctx| ctx.world().map_or(false, |w| w.flag("lamp_on"))),
        );

        scheduler.tick(&mut world, 1, "player");
        assert_eq!(scheduler.fuse_remaining("lit"), Some(2));

        world.set_flag("lamp_on", true);
        scheduler.tick(&mut world, 2, "player");
        assert_eq!(scheduler.fuse_remaining("lit"), Some(1));
    }

    #[test]
    fn test_failing_trigger_removes_repeating_fuse() {
        let reporter = CollectingReporter::new();
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> =
            Scheduler::new(1).with_reporter(reporter.clone());
        scheduler.set_fuse(
            Fuse::new("broken", "Broken", 1, |_| Err("no".into())).repeating(),
        );

        let result = scheduler.tick(&mut world, 1, "player");
        assert!(result.fuses_triggered.is_empty());
        assert!(!scheduler.has_fuse("broken"));
        assert_eq!(reporter.faults()[0].phase, CallbackPhase::FuseTrigger);
    }

    #[test]
    fn test_repeat_with_zero_original_turns_is_removed() {
        let (mut scheduler, mut world) = setup();
        scheduler.set_fuse(
            Fuse::new("z", "Zero", 1, |_| Ok(vec![]))
                .repeating()
                .with_original_turns(0),
        );
        scheduler.tick(&mut world, 1, "player");
        assert!(!scheduler.has_fuse("z"));
    }

    #[test]
    fn test_cancel_missing_fuse_is_empty() {
        let (mut scheduler, _) = setup();
        assert!(scheduler.cancel_fuse("nope").is_empty());
    }

    #[test]
    fn test_cancel_fault_still_removes() {
        let reporter = CollectingReporter::new();
        let mut scheduler: Scheduler<GameWorld> =
            Scheduler::new(1).with_reporter(reporter.clone());
        scheduler.set_fuse(
            Fuse::new("f", "F", 5, |_| Ok(vec![])).with_on_cancel(|_| Err("cancel failed".into())),
        );

        assert!(scheduler.cancel_fuse("f").is_empty());
        assert!(!scheduler.has_fuse("f"));
        assert_eq!(reporter.faults()[0].phase, CallbackPhase::FuseCancel);
    }

    #[test]
    fn test_cancel_context_has_no_world() {
        let (mut scheduler, mut world) = setup();
        scheduler.tick(&mut world, 7, "player");
        scheduler.set_fuse(Fuse::new("f", "F", 5, |_| Ok(vec![])).with_on_cancel(|ctx| {
            assert!(!ctx.has_world());
            Ok(vec![SemanticEvent::new("cancelled").with_data(serde_json::json!({ "turn": ctx.turn }))])
        }));

        let events = scheduler.cancel_fuse("f");
        assert_eq!(events[0].data["turn"], 7);
    }

    #[test]
    fn test_adjust_fuse_clamps() {
        let (mut scheduler, _) = setup();
        scheduler.set_fuse(Fuse::new("f", "F", 5, |_| Ok(vec![])));
        scheduler.adjust_fuse("f", 3);
        assert_eq!(scheduler.fuse_remaining("f"), Some(8));
        scheduler.adjust_fuse("f", -1000);
        assert_eq!(scheduler.fuse_remaining("f"), Some(0));
        scheduler.adjust_fuse("missing", 5);
        assert_eq!(scheduler.fuse_remaining("missing"), None);
    }

    #[test]
    fn test_remove_daemon_fires_hook() {
        let (mut scheduler, _) = setup();
        let removed = Rc::new(RefCell::new(false));
        let flag = removed.clone();
        scheduler
            .register_daemon(
                Daemon::new("d", "D", |_| Ok(vec![])).with_on_removed(move || *flag.borrow_mut() = true),
            )
            .unwrap();
        scheduler.remove_daemon("d");
        assert!(*removed.borrow());
    }

    #[test]
    fn test_random_shared_with_callbacks() {
        let (mut scheduler, mut world) = setup();
        scheduler
            .register_daemon(Daemon::new("dice", "Dice", |ctx| {
                let roll = ctx.random.int(1, 6);
                Ok(vec![SemanticEvent::new("roll").with_data(serde_json::json!(roll))])
            }))
            .unwrap();

        let before = scheduler.random().seed();
        scheduler.tick(&mut world, 1, "player");
        assert_ne!(scheduler.random().seed(), before);
    }
}
