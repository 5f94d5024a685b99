//! Per-tick context handed to every callback

use crate::core::types::{EntityId, Turn};
use crate::scheduler::random::SeededRandom;

/// The scheduler's single call into the host world store.
///
/// Everything else a callback does with the world goes through the concrete
/// world type, which the scheduler is generic over.
pub trait WorldModel {
    /// Location (room) currently containing `entity_id`, if it has one
    fn location_of(&self, entity_id: &str) -> Option<EntityId>;
}

/// Bundle passed into conditions, daemon runs, fuse triggers and cancellations.
///
/// `world` is absent when a fuse is cancelled outside a tick.
pub struct SchedulerContext<'a, W> {
    world: Option<&'a mut W>,
    pub turn: Turn,
    pub random: &'a mut SeededRandom,
    pub player_location: EntityId,
    pub player_id: EntityId,
}

impl<'a, W> SchedulerContext<'a, W> {
    pub fn new(
        world: Option<&'a mut W>,
        turn: Turn,
        random: &'a mut SeededRandom,
        player_location: EntityId,
        player_id: EntityId,
    ) -> Self {
        Self {
            world,
            turn,
            random,
            player_location,
            player_id,
        }
    }

    pub fn world(&self) -> Option<&W> {
        self.world.as_deref()
    }

    pub fn world_mut(&mut self) -> Option<&mut W> {
        self.world.as_deref_mut()
    }

    pub fn has_world(&self) -> bool {
        self.world.is_some()
    }
}
