//! Location-gated daemon - runs its payload while the player is in one of a set of rooms

use crate::core::types::{EntityId, Priority};
use crate::runners::Runner;
use crate::scheduler::daemon::Action;
use crate::scheduler::{CallbackResult, SchedulerContext};

pub struct LocationDaemon<W> {
    id: String,
    name: String,
    priority: Priority,
    room_ids: Vec<EntityId>,
    payload: Action<W>,
}

impl<W> LocationDaemon<W> {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        room_ids: impl IntoIterator<Item = impl Into<EntityId>>,
        payload: impl FnMut(&mut SchedulerContext<'_, W>) -> CallbackResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            room_ids: room_ids.into_iter().map(Into::into).collect(),
            payload: Box::new(payload),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn room_ids(&self) -> &[EntityId] {
        &self.room_ids
    }
}

impl<W> Runner<W> for LocationDaemon<W> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn should_run(&self, ctx: &SchedulerContext<'_, W>) -> bool {
        self.room_ids.iter().any(|room| *room == ctx.player_location)
    }

    fn execute(&mut self, ctx: &mut SchedulerContext<'_, W>) -> CallbackResult {
        (self.payload)(ctx)
    }
}
