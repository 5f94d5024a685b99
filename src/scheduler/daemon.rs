//! Daemon definitions and runtime state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{CallbackError, Result};
use crate::core::events::SemanticEvent;
use crate::core::types::Priority;
use crate::scheduler::context::SchedulerContext;

/// What a run, trigger or cancel callback hands back
pub type CallbackResult = std::result::Result<Vec<SemanticEvent>, CallbackError>;

/// Predicate evaluated against the tick context
pub type Condition<W> = Box<dyn Fn(&SchedulerContext<'_, W>) -> bool>;

/// Event-producing callback
pub type Action<W> = Box<dyn FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult>;

/// Save/restore of a runner's own fields, carried alongside the generic
/// daemon state in save files.
pub struct RunnerStateHooks {
    pub(crate) save: Box<dyn Fn() -> Option<serde_json::Value>>,
    pub(crate) restore: Box<dyn FnMut(&serde_json::Value) -> Result<()>>,
}

impl RunnerStateHooks {
    pub fn new(
        save: impl Fn() -> Option<serde_json::Value> + 'static,
        restore: impl FnMut(&serde_json::Value) -> Result<()> + 'static,
    ) -> Self {
        Self {
            save: Box::new(save),
            restore: Box::new(restore),
        }
    }
}

/// A recurring background task evaluated once per tick
pub struct Daemon<W> {
    pub id: String,
    pub name: String,
    pub priority: Priority,
    /// Deregister after the first run that produces events
    pub run_once: bool,
    pub(crate) condition: Option<Condition<W>>,
    pub(crate) run: Action<W>,
    pub(crate) runner_hooks: Option<RunnerStateHooks>,
    pub(crate) on_removed: Option<Box<dyn FnMut()>>,
}

impl<W> Daemon<W> {
    pub fn new<F>(id: impl Into<String>, name: impl Into<String>, run: F) -> Self
    where
        F: FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            run_once: false,
            condition: None,
            run: Box::new(run),
            runner_hooks: None,
            on_removed: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&SchedulerContext<'_, W>) -> bool + 'static,
    {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn run_once(mut self) -> Self {
        self.run_once = true;
        self
    }

    pub fn with_runner_hooks(mut self, hooks: RunnerStateHooks) -> Self {
        self.runner_hooks = Some(hooks);
        self
    }

    pub fn with_on_removed(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_removed = Some(Box::new(hook));
        self
    }

    pub(crate) fn condition_holds(&self, ctx: &SchedulerContext<'_, W>) -> bool {
        self.condition.as_ref().map_or(true, |cond| cond(ctx))
    }

    pub(crate) fn notify_removed(&mut self) {
        if let Some(hook) = self.on_removed.as_mut() {
            hook();
        }
    }
}

impl<W> fmt::Debug for Daemon<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Daemon")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("run_once", &self.run_once)
            .field("has_condition", &self.condition.is_some())
            .field("has_runner_state", &self.runner_hooks.is_some())
            .finish()
    }
}

/// Mutable per-daemon state, persisted in save files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonState {
    pub id: String,
    pub is_paused: bool,
    pub run_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_state: Option<serde_json::Value>,
}

impl DaemonState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_paused: false,
            run_count: 0,
            runner_state: None,
        }
    }
}

/// Read-only snapshot for debugging and UI display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonInfo {
    pub id: String,
    pub name: String,
    pub is_paused: bool,
    pub run_count: u64,
    pub priority: Priority,
}
