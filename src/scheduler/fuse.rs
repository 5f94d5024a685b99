//! Fuse definitions and runtime state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Priority};
use crate::scheduler::context::SchedulerContext;
use crate::scheduler::daemon::{Action, CallbackResult, Condition};

/// A countdown that fires `trigger` when it reaches zero
pub struct Fuse<W> {
    pub id: String,
    pub name: String,
    /// Initial countdown
    pub turns: u32,
    /// Countdown restored after each repeat; `None` means `turns`
    pub original_turns: Option<u32>,
    pub repeat: bool,
    pub priority: Priority,
    /// Entity this fuse lives and dies with
    pub entity_id: Option<EntityId>,
    pub(crate) trigger: Action<W>,
    pub(crate) on_cancel: Option<Action<W>>,
    pub(crate) tick_condition: Option<Condition<W>>,
}

impl<W> Fuse<W> {
    pub fn new<F>(id: impl Into<String>, name: impl Into<String>, turns: u32, trigger: F) -> Self
    where
        F: FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            turns,
            original_turns: None,
            repeat: false,
            priority: 0,
            entity_id: None,
            trigger: Box::new(trigger),
            on_cancel: None,
            tick_condition: None,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn with_original_turns(mut self, turns: u32) -> Self {
        self.original_turns = Some(turns);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn bound_to(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_on_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    /// Only count down on turns where `condition` holds
    pub fn with_tick_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&SchedulerContext<'_, W>) -> bool + 'static,
    {
        self.tick_condition = Some(Box::new(condition));
        self
    }

    pub(crate) fn should_tick(&self, ctx: &SchedulerContext<'_, W>) -> bool {
        self.tick_condition.as_ref().map_or(true, |cond| cond(ctx))
    }

    /// Countdown to restore on repeat. Zero counts as unset.
    pub(crate) fn reset_turns(&self) -> Option<u32> {
        self.original_turns.filter(|turns| *turns > 0)
    }
}

impl<W> fmt::Debug for Fuse<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fuse")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("turns", &self.turns)
            .field("original_turns", &self.original_turns)
            .field("repeat", &self.repeat)
            .field("priority", &self.priority)
            .field("entity_id", &self.entity_id)
            .finish()
    }
}

/// Mutable per-fuse state, persisted in save files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuseState {
    pub id: String,
    pub turns_remaining: u32,
    pub is_paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
}

/// Read-only snapshot for debugging and UI display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuseInfo {
    pub id: String,
    pub name: String,
    pub turns_remaining: u32,
    pub is_paused: bool,
    pub entity_id: Option<EntityId>,
    pub priority: Priority,
    pub repeat: bool,
}
