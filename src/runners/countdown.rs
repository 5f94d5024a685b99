//! Countdown daemon - a fuse-like timer that lives in the daemon registry
//!
//! Unlike a `Fuse`, a finished countdown is not removed. It stays
//! registered and simply never runs again.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SchedulerError};
use crate::core::types::Priority;
use crate::runners::Runner;
use crate::scheduler::daemon::{Action, Condition};
use crate::scheduler::{CallbackResult, SchedulerContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountdownState {
    turns_remaining: u32,
}

pub struct CountdownDaemon<W> {
    id: String,
    name: String,
    priority: Priority,
    turns_remaining: u32,
    tick_condition: Option<Condition<W>>,
    on_countdown_complete: Action<W>,
}

impl<W> CountdownDaemon<W> {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        turns: u32,
        on_countdown_complete: impl FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            turns_remaining: turns,
            tick_condition: None,
            on_countdown_complete: Box::new(on_countdown_complete),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tick_condition(
        mut self,
        condition: impl Fn(&SchedulerContext<'_, W>) -> bool + 'static,
    ) -> Self {
        self.tick_condition = Some(Box::new(condition));
        self
    }

    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    pub fn is_complete(&self) -> bool {
        self.turns_remaining == 0
    }
}

impl<W> Runner<W> for CountdownDaemon<W> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn should_run(&self, _ctx: &SchedulerContext<'_, W>) -> bool {
        self.turns_remaining > 0
    }

    fn execute(&mut self, ctx: &mut SchedulerContext<'_, W>) -> CallbackResult {
        if let Some(condition) = self.tick_condition.as_ref() {
            if !condition(&*ctx) {
                return Ok(Vec::new());
            }
        }

        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        if self.turns_remaining > 0 {
            return Ok(Vec::new());
        }
        (self.on_countdown_complete)(ctx)
    }

    fn runner_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(CountdownState {
            turns_remaining: self.turns_remaining,
        })
        .ok()
    }

    fn restore_runner_state(&mut self, state: &serde_json::Value) -> Result<()> {
        let state: CountdownState =
            serde_json::from_value(state.clone()).map_err(|e| SchedulerError::RunnerState {
                id: self.id.clone(),
                reason: e.to_string(),
            })?;
        self.turns_remaining = state.turns_remaining;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::SemanticEvent;
    use crate::scheduler::Scheduler;
    use crate::world::GameWorld;

    fn candles(turns: u32) -> CountdownDaemon<GameWorld> {
        CountdownDaemon::new("candles", "Candles", turns, |_| {
            Ok(vec![SemanticEvent::message("candles-out")])
        })
    }

    #[test]
    fn test_completes_once_and_stays_registered() {
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        let handle = scheduler.register_runner(candles(2)).unwrap();

        assert!(scheduler.tick(&mut world, 1, "player").events.is_empty());
        assert_eq!(handle.borrow().turns_remaining(), 1);

        let result = scheduler.tick(&mut world, 2, "player");
        assert_eq!(result.events[0].message_id(), Some("candles-out"));
        assert!(handle.borrow().is_complete());

        for turn in 3..6 {
            assert!(scheduler.tick(&mut world, turn, "player").events.is_empty());
        }
        assert!(scheduler.has_daemon("candles"));
        assert_eq!(scheduler.active_daemons()[0].run_count, 1);
    }

    #[test]
    fn test_tick_condition_pauses_countdown() {
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        let handle = scheduler
            .register_runner(candles(3).with_tick_condition(|ctx| {
                ctx.world().map_or(false, |w| w.flag("candles_lit"))
            }))
            .unwrap();

        scheduler.tick(&mut world, 1, "player");
        assert_eq!(handle.borrow().turns_remaining(), 3);

        world.set_flag("candles_lit", true);
        scheduler.tick(&mut world, 2, "player");
        assert_eq!(handle.borrow().turns_remaining(), 2);
    }

    #[test]
    fn test_malformed_state_rejected() {
        let mut countdown = candles(4);
        let err = countdown
            .restore_runner_state(&serde_json::json!({ "turns": "soon" }))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::RunnerState { id, .. } if id == "candles"));
        assert_eq!(countdown.turns_remaining(), 4);
    }

    #[test]
    fn test_zero_turn_countdown_never_runs() {
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        scheduler.register_runner(candles(0)).unwrap();
        assert!(scheduler.tick(&mut world, 1, "player").events.is_empty());
    }
}
