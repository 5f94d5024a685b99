//! Ambience daemon - flavor messages with a cooldown between emissions
//!
//! Runs every turn so it can count turns since its last emission; the
//! cooldown and the optional `should_emit` gate decide whether it speaks.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SchedulerError};
use crate::core::types::Priority;
use crate::runners::Runner;
use crate::scheduler::daemon::Action;
use crate::scheduler::{CallbackResult, SchedulerContext};

type EmitGate<W> = Box<dyn FnMut(&mut SchedulerContext<'_, W>) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmbienceState {
    turns_since_last_emission: u32,
}

pub struct AmbienceDaemon<W> {
    id: String,
    name: String,
    priority: Priority,
    cooldown_turns: u32,
    turns_since_last_emission: u32,
    should_emit: Option<EmitGate<W>>,
    emit: Action<W>,
}

impl<W> AmbienceDaemon<W> {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cooldown_turns: u32,
        emit: impl FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            cooldown_turns,
            turns_since_last_emission: 0,
            should_emit: None,
            emit: Box::new(emit),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Extra gate checked once the cooldown has elapsed. Gets mutable access
    /// to the context so it can roll dice.
    pub fn with_should_emit(
        mut self,
        should_emit: impl FnMut(&mut SchedulerContext<'_, W>) -> bool + 'static,
    ) -> Self {
        self.should_emit = Some(Box::new(should_emit));
        self
    }

    pub fn turns_since_last_emission(&self) -> u32 {
        self.turns_since_last_emission
    }
}

impl<W> Runner<W> for AmbienceDaemon<W> {
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
        true
    }

    fn execute(&mut self, ctx: &mut SchedulerContext<'_, W>) -> CallbackResult {
        self.turns_since_last_emission += 1;
        if self.turns_since_last_emission < self.cooldown_turns {
            return Ok(Vec::new());
        }
        if let Some(should_emit) = self.should_emit.as_mut() {
            if !should_emit(&mut *ctx) {
                return Ok(Vec::new());
            }
        }

        self.turns_since_last_emission = 0;
        (self.emit)(ctx)
    }

    fn runner_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(AmbienceState {
            turns_since_last_emission: self.turns_since_last_emission,
        })
        .ok()
    }

    fn restore_runner_state(&mut self, state: &serde_json::Value) -> Result<()> {
        let state: AmbienceState =
            serde_json::from_value(state.clone()).map_err(|e| SchedulerError::RunnerState {
                id: self.id.clone(),
                reason: e.to_string(),
            })?;
        self.turns_since_last_emission = state.turns_since_last_emission;
        Ok(())
    }
}
