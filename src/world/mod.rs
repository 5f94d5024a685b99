//! Reference world store - entity locations and story flags
//!
//! Hosts usually bring their own world model; this one is enough for the
//! simulation binary, scenarios and tests.

use ahash::AHashMap;

use crate::core::types::{EntityId, Turn};
use crate::scheduler::WorldModel;

/// The game world: where every entity is, plus boolean story flags
#[derive(Debug, Clone, Default)]
pub struct GameWorld {
    pub current_turn: Turn,
    locations: AHashMap<EntityId, EntityId>,
    flags: AHashMap<String, bool>,
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an entity in a location, moving it if already placed
    pub fn place(&mut self, entity_id: impl Into<EntityId>, location: impl Into<EntityId>) {
        self.locations.insert(entity_id.into(), location.into());
    }

    /// Remove an entity. Returns its last location.
    pub fn remove_entity(&mut self, entity_id: &str) -> Option<EntityId> {
        self.locations.remove(entity_id)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.locations.contains_key(entity_id)
    }

    /// Entities currently in `location`
    pub fn contents(&self, location: &str) -> Vec<EntityId> {
        let mut contents: Vec<EntityId> = self
            .locations
            .iter()
            .filter(|(_, loc)| loc.as_str() == location)
            .map(|(id, _)| id.clone())
            .collect();
        contents.sort();
        contents
    }

    /// Unset flags read as `false`
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    pub fn tick(&mut self) {
        self.current_turn += 1;
    }
}

impl WorldModel for GameWorld {
    fn location_of(&self, entity_id: &str) -> Option<EntityId> {
        self.locations.get(entity_id).cloned()
    }
}
