//! The scheduler as a turn plugin

use std::any::Any;

use crate::core::config::SchedulerConfig;
use crate::core::error::Result;
use crate::core::events::SemanticEvent;
use crate::core::types::Priority;
use crate::plugin::{TurnContext, TurnPlugin, SCHEDULER_PLUGIN_PRIORITY};
use crate::scheduler::{Scheduler, SchedulerState, TickResult, WorldModel};

pub const SCHEDULER_PLUGIN_ID: &str = "scheduler";

pub struct SchedulerPlugin<W> {
    scheduler: Scheduler<W>,
    priority: Priority,
    last_tick: TickResult,
}

impl<W> SchedulerPlugin<W> {
    pub fn new(scheduler: Scheduler<W>) -> Self {
        Self {
            scheduler,
            priority: SCHEDULER_PLUGIN_PRIORITY,
            last_tick: TickResult::default(),
        }
    }

    /// Build a fresh scheduler from config. The config's priority is used
    /// for the plugin.
    pub fn with_config(config: &SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::with_config(config),
            priority: config.plugin_priority,
            last_tick: TickResult::default(),
        })
    }

    pub fn scheduler(&self) -> &Scheduler<W> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<W> {
        &mut self.scheduler
    }

    /// Result of the most recent tick
    pub fn last_tick(&self) -> &TickResult {
        &self.last_tick
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn set_state(&mut self, state: &SchedulerState) {
        self.scheduler.set_state(state);
    }
}

impl<W: WorldModel + 'static> TurnPlugin<W> for SchedulerPlugin<W> {
    fn id(&self) -> &str {
        SCHEDULER_PLUGIN_ID
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn on_after_action(&mut self, ctx: &mut TurnContext<'_, W>) -> Vec<SemanticEvent> {
        self.last_tick = self.scheduler.tick(&mut *ctx.world, ctx.turn, ctx.player_id);
        self.last_tick.events.clone()
    }

    fn state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self.scheduler.state()).ok()
    }

    fn restore_state(&mut self, state: &serde_json::Value) -> Result<()> {
        let state: SchedulerState = serde_json::from_value(state.clone())?;
        self.scheduler.set_state(&state);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
