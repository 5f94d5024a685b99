//! Scripted scenarios loaded from TOML
//!
//! A scenario names a seed, the player, a route of rooms the player walks
//! (one room per turn, cycled) and a set of timers. Every timer emits
//! `message` events so a run can be read as a transcript.
//!
//! ```toml
//! seed = 42
//! player = "player"
//! route = ["kitchen", "cellar", "cellar", "cellar"]
//!
//! [[fuse]]
//! id = "lantern"
//! turns = 5
//! message = "lantern-dies"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::SchedulerConfig;
use crate::core::error::{Result, SchedulerError};
use crate::core::events::SemanticEvent;
use crate::core::types::{EntityId, Priority, Turn};
use crate::plugin::scheduler_plugin::SCHEDULER_PLUGIN_ID;
use crate::plugin::{PluginRegistry, SchedulerPlugin, TurnContext, TurnPlugin};
use crate::runners::{AmbienceDaemon, CountdownDaemon, WatchdogDaemon};
use crate::scheduler::{
    CallbackResult, Daemon, Fuse, Scheduler, SchedulerContext, SchedulerState, WorldModel,
};
use crate::world::GameWorld;

fn default_player() -> String {
    "player".to_string()
}

fn default_chance() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FuseSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub turns: u32,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Entity the fuse is bound to
    #[serde(default)]
    pub entity: Option<EntityId>,
    /// Only count down while this world flag is set
    #[serde(default)]
    pub flag: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaemonSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Rooms the daemon runs in. Empty means everywhere.
    #[serde(default)]
    pub rooms: Vec<EntityId>,
    #[serde(default)]
    pub run_once: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchdogSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub turns: u32,
    /// The condition holds while the player stands in one of these rooms
    pub rooms: Vec<EntityId>,
    #[serde(default)]
    pub milestone_message: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmbienceSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub cooldown: u32,
    #[serde(default = "default_chance")]
    pub chance: f64,
    #[serde(default)]
    pub rooms: Vec<EntityId>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountdownSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub turns: u32,
    #[serde(default)]
    pub flag: Option<String>,
    pub message: String,
}

/// Sets a world flag at the start of a turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlagSpec {
    pub turn: Turn,
    pub name: String,
    #[serde(default = "default_true")]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default)]
    pub route: Vec<EntityId>,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
    #[serde(default, rename = "flag")]
    pub flags: Vec<FlagSpec>,
    #[serde(default, rename = "fuse")]
    pub fuses: Vec<FuseSpec>,
    #[serde(default, rename = "daemon")]
    pub daemons: Vec<DaemonSpec>,
    #[serde(default, rename = "watchdog")]
    pub watchdogs: Vec<WatchdogSpec>,
    #[serde(default, rename = "ambience")]
    pub ambiences: Vec<AmbienceSpec>,
    #[serde(default, rename = "countdown")]
    pub countdowns: Vec<CountdownSpec>,
}

fn message_action(
    message: &str,
) -> impl FnMut(&mut SchedulerContext<'_, GameWorld>) -> CallbackResult + 'static {
    let message = message.to_string();
    move |_| Ok(vec![SemanticEvent::message(message.clone())])
}

fn in_rooms(rooms: &[EntityId], location: &str) -> bool {
    rooms.is_empty() || rooms.iter().any(|room| room == location)
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(config) = &self.scheduler {
            config.validate()?;
        }
        if let Some(ambience) = self.ambiences.iter().find(|a| a.messages.is_empty()) {
            return Err(SchedulerError::InvalidConfig(format!(
                "ambience \"{}\" has no messages",
                ambience.id
            )));
        }
        if let Some(ambience) = self
            .ambiences
            .iter()
            .find(|a| !(0.0..=1.0).contains(&a.chance))
        {
            return Err(SchedulerError::InvalidConfig(format!(
                "ambience \"{}\" chance {} is outside 0..=1",
                ambience.id, ambience.chance
            )));
        }
        Ok(())
    }

    /// Scheduler config for this scenario. A top-level `seed` wins over the
    /// `[scheduler]` table.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        let mut config = self.scheduler.clone().unwrap_or_default();
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }

    /// The room the player stands in on `turn` (turns start at 1)
    pub fn room_at(&self, turn: Turn) -> Option<&EntityId> {
        if self.route.is_empty() || turn == 0 {
            return None;
        }
        let index = ((turn - 1) % self.route.len() as u64) as usize;
        self.route.get(index)
    }

    /// Register every timer in the scenario
    pub fn install(&self, scheduler: &mut Scheduler<GameWorld>) -> Result<()> {
        for entry in &self.fuses {
            let mut fuse = Fuse::<GameWorld>::new(
                entry.id.clone(),
                entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                entry.turns,
                message_action(&entry.message),
            )
            .with_priority(entry.priority);
            if entry.repeat {
                fuse = fuse.repeating();
            }
            if let Some(entity) = &entry.entity {
                fuse = fuse.bound_to(entity.clone());
            }
            if let Some(flag) = entry.flag.clone() {
                fuse = fuse.with_tick_condition(move |ctx| {
                    ctx.world().map_or(false, |w| w.flag(&flag))
                });
            }
            scheduler.set_fuse(fuse);
        }

        for entry in &self.daemons {
            let rooms = entry.rooms.clone();
            let mut daemon = Daemon::<GameWorld>::new(
                entry.id.clone(),
                entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                message_action(&entry.message),
            )
            .with_priority(entry.priority)
            .with_condition(move |ctx| in_rooms(&rooms, &ctx.player_location));
            if entry.run_once {
                daemon = daemon.run_once();
            }
            scheduler.register_daemon(daemon)?;
        }

        for entry in &self.watchdogs {
            let rooms = entry.rooms.clone();
            let mut watchdog = WatchdogDaemon::<GameWorld>::new(
                entry.id.clone(),
                entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                entry.turns,
                move |ctx| rooms.iter().any(|room| *room == ctx.player_location),
                message_action(&entry.message),
            )
            .with_priority(entry.priority);
            if let Some(message) = entry.milestone_message.clone() {
                watchdog = watchdog.with_milestone(move |count, _| {
                    Ok(vec![SemanticEvent::message(message.clone())
                        .with_data(serde_json::json!({ "messageId": message, "count": count }))])
                });
            }
            scheduler.register_runner(watchdog)?;
        }

        for entry in &self.ambiences {
            let rooms = entry.rooms.clone();
            let chance = entry.chance;
            let messages = entry.messages.clone();
            let ambience = AmbienceDaemon::<GameWorld>::new(
                entry.id.clone(),
                entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                entry.cooldown,
                move |ctx| {
                    Ok(ctx
                        .random
                        .pick(&messages)
                        .map(|message| vec![SemanticEvent::message(message.clone())])
                        .unwrap_or_default())
                },
            )
            .with_priority(entry.priority)
            .with_should_emit(move |ctx| {
                in_rooms(&rooms, &ctx.player_location) && ctx.random.chance(chance)
            });
            scheduler.register_runner(ambience)?;
        }

        for entry in &self.countdowns {
            let mut countdown = CountdownDaemon::<GameWorld>::new(
                entry.id.clone(),
                entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                entry.turns,
                message_action(&entry.message),
            )
            .with_priority(entry.priority);
            if let Some(flag) = entry.flag.clone() {
                countdown = countdown.with_tick_condition(move |ctx| {
                    ctx.world().map_or(false, |w| w.flag(&flag))
                });
            }
            scheduler.register_runner(countdown)?;
        }

        tracing::info!(
            daemons = scheduler.daemon_count(),
            fuses = scheduler.fuse_count(),
            "Scenario installed"
        );
        Ok(())
    }

    /// Run the scenario from turn 1 for `turns` turns
    pub fn run(&self, turns: Turn) -> Result<Vec<TurnReport>> {
        let mut session = Session::new(self)?;
        Ok((0..turns).map(|_| session.step()).collect())
    }
}

/// What happened on one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub turn: Turn,
    pub location: Option<EntityId>,
    pub events: Vec<SemanticEvent>,
    pub daemons_run: Vec<String>,
    pub fuses_triggered: Vec<String>,
}

/// Saved session: the turn reached plus every plugin's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: Turn,
    pub plugins: BTreeMap<String, serde_json::Value>,
}

/// A scenario being played turn by turn
pub struct Session<'s> {
    scenario: &'s Scenario,
    world: GameWorld,
    registry: PluginRegistry<GameWorld>,
    turn: Turn,
}

impl<'s> Session<'s> {
    pub fn new(scenario: &'s Scenario) -> Result<Self> {
        let mut plugin: SchedulerPlugin<GameWorld> =
            SchedulerPlugin::with_config(&scenario.scheduler_config())?;
        scenario.install(plugin.scheduler_mut())?;
        let mut registry: PluginRegistry<GameWorld> = PluginRegistry::new();
        registry.register(plugin)?;

        Ok(Self {
            scenario,
            world: GameWorld::new(),
            registry,
            turn: 0,
        })
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Add another turn-phase plugin, such as an NPC driver
    pub fn register_plugin(&mut self, plugin: impl TurnPlugin<GameWorld> + 'static) -> Result<()> {
        self.registry.register(plugin)
    }

    /// Play one turn: move the player, apply scripted flags, then run the
    /// plugin pipeline
    pub fn step(&mut self) -> TurnReport {
        self.turn += 1;
        self.world.tick();
        self.apply_world_for(self.turn);

        let scenario = self.scenario;
        let player = scenario.player.as_str();
        let mut ctx = TurnContext::new(&mut self.world, self.turn, player);
        let events = self.registry.run_after_action(&mut ctx);

        let (daemons_run, fuses_triggered) = self
            .registry
            .get::<SchedulerPlugin<GameWorld>>(SCHEDULER_PLUGIN_ID)
            .map(|plugin| {
                let tick = plugin.last_tick();
                (tick.daemons_run.clone(), tick.fuses_triggered.clone())
            })
            .unwrap_or_default();

        TurnReport {
            turn: self.turn,
            location: self.world.location_of(player),
            events,
            daemons_run,
            fuses_triggered,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn,
            plugins: self.registry.states(),
        }
    }

    /// Load a snapshot into this session. Timers that had already finished
    /// when the snapshot was taken are dropped, and the world is rebuilt
    /// from the route and flag script up to the saved turn.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Some(saved) = snapshot.plugins.get(SCHEDULER_PLUGIN_ID) {
            let saved: SchedulerState = serde_json::from_value(saved.clone())?;
            if let Some(scheduler) = self.scheduler_mut() {
                drop_finished(scheduler, &saved);
            }
        }
        self.registry.set_states(&snapshot.plugins)?;

        self.world = GameWorld::new();
        for turn in 1..=snapshot.turn {
            self.world.tick();
            self.apply_world_for(turn);
        }
        self.turn = snapshot.turn;
        Ok(())
    }

    fn apply_world_for(&mut self, turn: Turn) {
        if let Some(room) = self.scenario.room_at(turn) {
            self.world.place(self.scenario.player.clone(), room.clone());
        }
        for flag in self.scenario.flags.iter().filter(|f| f.turn == turn) {
            self.world.set_flag(flag.name.clone(), flag.value);
        }
    }

    /// The scheduler driven by this session
    pub fn scheduler(&self) -> Option<&Scheduler<GameWorld>> {
        self.registry
            .get::<SchedulerPlugin<GameWorld>>(SCHEDULER_PLUGIN_ID)
            .map(|plugin| plugin.scheduler())
    }

    pub fn scheduler_mut(&mut self) -> Option<&mut Scheduler<GameWorld>> {
        self.registry
            .get_mut::<SchedulerPlugin<GameWorld>>(SCHEDULER_PLUGIN_ID)
            .map(|plugin| plugin.scheduler_mut())
    }
}

/// Remove installed daemons and fuses that are missing from a save
fn drop_finished(scheduler: &mut Scheduler<GameWorld>, saved: &SchedulerState) {
    let finished_daemons: Vec<String> = scheduler
        .active_daemons()
        .into_iter()
        .map(|daemon| daemon.id)
        .filter(|id| !saved.daemons.iter().any(|d| d.id == *id))
        .collect();
    for id in finished_daemons {
        tracing::debug!(daemon = %id, "Daemon finished before save, removing");
        scheduler.remove_daemon(&id);
    }

    let finished_fuses: Vec<String> = scheduler
        .active_fuses()
        .into_iter()
        .map(|fuse| fuse.id)
        .filter(|id| !saved.fuses.iter().any(|f| f.id == *id))
        .collect();
    for id in finished_fuses {
        tracing::debug!(fuse = %id, "Fuse finished before save, removing");
        // Scenario fuses carry no cancel callback, so nothing is emitted
        scheduler.cancel_fuse(&id);
    }
}
