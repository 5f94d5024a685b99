//! Turn pipeline plugins
//!
//! After the player's action resolves, every registered plugin gets an
//! `on_after_action` call, highest priority first. Ties run in registration
//! order. The scheduler sits below the NPC plugin so timers see the world
//! after NPCs have moved.

pub mod scheduler_plugin;

use std::any::Any;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::core::error::{Result, SchedulerError};
use crate::core::events::SemanticEvent;
use crate::core::types::{Priority, Turn};

pub use scheduler_plugin::SchedulerPlugin;

/// Priority of the NPC turn plugin
pub const NPC_PLUGIN_PRIORITY: Priority = 100;

/// Default priority of the scheduler plugin
pub const SCHEDULER_PLUGIN_PRIORITY: Priority = 50;

/// What a plugin sees after the player's action
pub struct TurnContext<'a, W> {
    pub world: &'a mut W,
    pub turn: Turn,
    pub player_id: &'a str,
}

impl<'a, W> TurnContext<'a, W> {
    pub fn new(world: &'a mut W, turn: Turn, player_id: &'a str) -> Self {
        Self {
            world,
            turn,
            player_id,
        }
    }
}

/// A turn-phase actor
pub trait TurnPlugin<W> {
    fn id(&self) -> &str;

    fn priority(&self) -> Priority;

    fn on_after_action(&mut self, ctx: &mut TurnContext<'_, W>) -> Vec<SemanticEvent>;

    /// Serializable plugin state for save games
    fn state(&self) -> Option<serde_json::Value> {
        None
    }

    fn restore_state(&mut self, _state: &serde_json::Value) -> Result<()> {
        Ok(())
    }

    /// For downcasting in tooling and tests
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Ordered set of plugins driven once per turn
pub struct PluginRegistry<W> {
    plugins: Vec<Box<dyn TurnPlugin<W>>>,
}

impl<W> PluginRegistry<W> {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Add a plugin. Fails if another plugin already uses its id.
    pub fn register(&mut self, plugin: impl TurnPlugin<W> + 'static) -> Result<()> {
        if self.contains(plugin.id()) {
            return Err(SchedulerError::DuplicatePlugin(plugin.id().to_string()));
        }
        self.plugins.push(Box::new(plugin));
        // Stable sort keeps registration order among equal priorities
        self.plugins.sort_by_key(|p| Reverse(p.priority()));
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Look up a plugin by id and concrete type
    pub fn get<P: 'static>(&self, id: &str) -> Option<&P> {
        self.plugins
            .iter()
            .find(|p| p.id() == id)
            .and_then(|p| p.as_any().downcast_ref::<P>())
    }

    pub fn get_mut<P: 'static>(&mut self, id: &str) -> Option<&mut P> {
        self.plugins
            .iter_mut()
            .find(|p| p.id() == id)
            .and_then(|p| p.as_any_mut().downcast_mut::<P>())
    }

    /// Plugin ids in execution order
    pub fn order(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id()).collect()
    }

    /// Run every plugin for this turn and collect their events in order
    pub fn run_after_action(&mut self, ctx: &mut TurnContext<'_, W>) -> Vec<SemanticEvent> {
        let mut events = Vec::new();
        for plugin in self.plugins.iter_mut() {
            events.extend(plugin.on_after_action(ctx));
        }
        events
    }

    /// Saved state of every plugin that has some, keyed by plugin id
    pub fn states(&self) -> BTreeMap<String, serde_json::Value> {
        self.plugins
            .iter()
            .filter_map(|p| p.state().map(|state| (p.id().to_string(), state)))
            .collect()
    }

    /// Restore plugin states. Entries without a matching plugin are skipped.
    pub fn set_states(&mut self, states: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        for (id, state) in states {
            match self.plugins.iter_mut().find(|p| p.id() == id) {
                Some(plugin) => plugin.restore_state(state)?,
                None => tracing::debug!(plugin = %id, "No plugin for saved state, skipping"),
            }
        }
        Ok(())
    }
}

impl<W> Default for PluginRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}
