//! Save/restore of scheduler state
//!
//! Only counters and flags are persisted. Callbacks cannot be serialized, so
//! a restore expects the same daemons and fuses to have been registered
//! already; saved entries for unknown ids are skipped.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Turn;
use crate::scheduler::daemon::DaemonState;
use crate::scheduler::fuse::FuseState;
use crate::scheduler::service::Scheduler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerState {
    pub turn: Turn,
    pub daemons: Vec<DaemonState>,
    pub fuses: Vec<FuseState>,
    pub random_seed: u64,
}

impl SchedulerState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<W> Scheduler<W> {
    /// Snapshot of every daemon and fuse state plus the random seed
    pub fn state(&self) -> SchedulerState {
        let mut daemon_slots: Vec<_> = self.daemons.values().collect();
        daemon_slots.sort_by_key(|slot| slot.seq);
        let daemons = daemon_slots
            .into_iter()
            .map(|slot| {
                let mut state = slot.state.clone();
                state.runner_state = slot.daemon.runner_hooks.as_ref().and_then(|hooks| (hooks.save)());
                state
            })
            .collect();

        let mut fuse_slots: Vec<_> = self.fuses.values().collect();
        fuse_slots.sort_by_key(|slot| slot.seq);
        let fuses = fuse_slots.into_iter().map(|slot| slot.state.clone()).collect();

        SchedulerState {
            turn: self.current_turn,
            daemons,
            fuses,
            random_seed: self.random.seed(),
        }
    }

    /// Overwrite runtime state of registered daemons and fuses from a save
    pub fn set_state(&mut self, state: &SchedulerState) {
        self.current_turn = state.turn;
        self.random.set_seed(state.random_seed);

        for saved in &state.daemons {
            let Some(slot) = self.daemons.get_mut(&saved.id) else {
                tracing::debug!(daemon = %saved.id, "Saved daemon not registered, skipping");
                continue;
            };
            slot.state.is_paused = saved.is_paused;
            slot.state.run_count = saved.run_count;

            if let (Some(hooks), Some(runner_state)) =
                (slot.daemon.runner_hooks.as_mut(), saved.runner_state.as_ref())
            {
                if let Err(err) = (hooks.restore)(runner_state) {
                    tracing::warn!(daemon = %saved.id, "Failed to restore runner state: {}", err);
                }
            }
        }

        for saved in &state.fuses {
            match self.fuses.get_mut(&saved.id) {
                Some(slot) => slot.state = saved.clone(),
                None => {
                    tracing::debug!(fuse = %saved.id, "Saved fuse not registered, skipping");
                }
            }
        }
    }
}
