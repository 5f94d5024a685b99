//! Watchdog - fires once a condition has held for N consecutive turns
//!
//! Any turn where the condition fails resets the streak. After firing the
//! watchdog stays registered but never runs again.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SchedulerError};
use crate::core::types::Priority;
use crate::runners::Runner;
use crate::scheduler::daemon::{Action, Condition};
use crate::scheduler::{CallbackResult, SchedulerContext};

type MilestoneFn<W> = Box<dyn FnMut(u32, &mut SchedulerContext<'_, W>) -> CallbackResult>;
type ResetFn<W> = Box<dyn FnMut(&mut SchedulerContext<'_, W>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchdogState {
    turn_count: u32,
    triggered: bool,
}

pub struct WatchdogDaemon<W> {
    id: String,
    name: String,
    priority: Priority,
    turns_required: u32,
    turn_count: u32,
    triggered: bool,
    condition_holds: Condition<W>,
    on_threshold_reached: Action<W>,
    on_milestone: Option<MilestoneFn<W>>,
    on_reset: Option<ResetFn<W>>,
}

impl<W> WatchdogDaemon<W> {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        turns_required: u32,
        condition_holds: impl Fn(&SchedulerContext<'_, W>) -> bool + 'static,
        on_threshold_reached: impl FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            turns_required,
            turn_count: 0,
            triggered: false,
            condition_holds: Box::new(condition_holds),
            on_threshold_reached: Box::new(on_threshold_reached),
            on_milestone: None,
            on_reset: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Called on every turn the condition holds, with the streak length
    pub fn with_milestone(
        mut self,
        on_milestone: impl FnMut(u32, &mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    ) -> Self {
        self.on_milestone = Some(Box::new(on_milestone));
        self
    }

    /// Called when a non-empty streak is broken
    pub fn with_reset(mut self, on_reset: impl FnMut(&mut SchedulerContext<'_, W>) + 'static) -> Self {
        self.on_reset = Some(Box::new(on_reset));
        self
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

impl<W> Runner<W> for WatchdogDaemon<W> {
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
        !self.triggered
    }

    fn execute(&mut self, ctx: &mut SchedulerContext<'_, W>) -> CallbackResult {
        if !(self.condition_holds)(&*ctx) {
            if self.turn_count > 0 {
                self.turn_count = 0;
                if let Some(on_reset) = self.on_reset.as_mut() {
                    on_reset(ctx);
                }
            }
            return Ok(Vec::new());
        }

        self.turn_count += 1;
        let mut events = Vec::new();
        if let Some(on_milestone) = self.on_milestone.as_mut() {
            events.extend(on_milestone(self.turn_count, &mut *ctx)?);
        }

        if self.turn_count >= self.turns_required {
            self.triggered = true;
            events.extend((self.on_threshold_reached)(ctx)?);
        }

        Ok(events)
    }

    fn runner_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(WatchdogState {
            turn_count: self.turn_count,
            triggered: self.triggered,
        })
        .ok()
    }

    fn restore_runner_state(&mut self, state: &serde_json::Value) -> Result<()> {
        let state: WatchdogState =
            serde_json::from_value(state.clone()).map_err(|e| SchedulerError::RunnerState {
                id: self.id.clone(),
                reason: e.to_string(),
            })?;
        self.turn_count = state.turn_count;
        self.triggered = state.triggered;
        Ok(())
    }
}
