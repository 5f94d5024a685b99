//! Typed daemon behaviors
//!
//! A `Runner` is a daemon with its own fields and a little state machine.
//! `runner_daemon` adapts any runner into a plain `Daemon`: `should_run`
//! becomes the condition, `execute` the run callback, and the runner's own
//! state rides along in the daemon's save entry.

pub mod ambience;
pub mod countdown;
pub mod location;
pub mod watchdog;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::Result;
use crate::core::types::Priority;
use crate::scheduler::{CallbackResult, Daemon, RunnerStateHooks, Scheduler, SchedulerContext};

pub use ambience::AmbienceDaemon;
pub use countdown::CountdownDaemon;
pub use location::LocationDaemon;
pub use watchdog::WatchdogDaemon;

/// Shared handle to a registered runner, for inspection by the host
pub type RunnerHandle<R> = Rc<RefCell<R>>;

pub trait Runner<W> {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        0
    }

    fn should_run(&self, ctx: &SchedulerContext<'_, W>) -> bool;

    fn execute(&mut self, ctx: &mut SchedulerContext<'_, W>) -> CallbackResult;

    fn on_registered(&mut self) {}

    fn on_removed(&mut self) {}

    /// The runner's own serializable fields, if it has any
    fn runner_state(&self) -> Option<serde_json::Value> {
        None
    }

    fn restore_runner_state(&mut self, _state: &serde_json::Value) -> Result<()> {
        Ok(())
    }
}

/// Wrap a runner as a `Daemon`, returning the daemon and a handle to the runner
pub fn runner_daemon<W, R>(runner: R) -> (Daemon<W>, RunnerHandle<R>)
where
    W: 'static,
    R: Runner<W> + 'static,
{
    let handle = Rc::new(RefCell::new(runner));
    let (id, name, priority) = {
        let runner = handle.borrow();
        (runner.id().to_string(), runner.name().to_string(), runner.priority())
    };

    let exec = Rc::clone(&handle);
    let cond = Rc::clone(&handle);
    let save = Rc::clone(&handle);
    let restore = Rc::clone(&handle);
    let removed = Rc::clone(&handle);

    let daemon = Daemon::<W>::new(id, name, move |ctx| exec.borrow_mut().execute(ctx))
        .with_priority(priority)
        .with_condition(move |ctx| cond.borrow().should_run(ctx))
        .with_runner_hooks(RunnerStateHooks::new(
            move || save.borrow().runner_state(),
            move |state| restore.borrow_mut().restore_runner_state(state),
        ))
        .with_on_removed(move || removed.borrow_mut().on_removed());

    (daemon, handle)
}

impl<W: 'static> Scheduler<W> {
    /// Register a runner as a daemon and fire its `on_registered` hook
    pub fn register_runner<R>(&mut self, runner: R) -> Result<RunnerHandle<R>>
    where
        R: Runner<W> + 'static,
    {
        let (daemon, handle) = runner_daemon(runner);
        self.register_daemon(daemon)?;
        handle.borrow_mut().on_registered();
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::SemanticEvent;
    use crate::world::GameWorld;

    /// Emits on every even turn and counts lifecycle hooks
    struct EvenTurns {
        registered: u32,
        removed: u32,
        emitted: u32,
    }

    impl Runner<GameWorld> for EvenTurns {
        fn id(&self) -> &str {
            "even"
        }

        fn name(&self) -> &str {
            "Even turns"
        }

        fn priority(&self) -> Priority {
            3
        }

        fn should_run(&self, ctx: &SchedulerContext<'_, GameWorld>) -> bool {
            ctx.turn % 2 == 0
        }

        fn execute(&mut self, _ctx: &mut SchedulerContext<'_, GameWorld>) -> CallbackResult {
            self.emitted += 1;
            Ok(vec![SemanticEvent::new("even")])
        }

        fn on_registered(&mut self) {
            self.registered += 1;
        }

        fn on_removed(&mut self) {
            self.removed += 1;
        }

        fn runner_state(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({ "emitted": self.emitted }))
        }

        fn restore_runner_state(&mut self, state: &serde_json::Value) -> Result<()> {
            self.emitted = state["emitted"].as_u64().unwrap_or(0) as u32;
            Ok(())
        }
    }

    fn even() -> EvenTurns {
        EvenTurns {
            registered: 0,
            removed: 0,
            emitted: 0,
        }
    }

    #[test]
    fn test_bridge_maps_condition_and_run() {
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        let handle = scheduler.register_runner(even()).unwrap();

        assert_eq!(handle.borrow().registered, 1);
        assert_eq!(scheduler.active_daemons()[0].priority, 3);

        assert!(scheduler.tick(&mut world, 1, "player").daemons_run.is_empty());
        assert_eq!(scheduler.tick(&mut world, 2, "player").daemons_run, vec!["even"]);
        assert_eq!(handle.borrow().emitted, 1);
    }

    #[test]
    fn test_duplicate_runner_not_registered_twice() {
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        scheduler.register_runner(even()).unwrap();
        assert!(scheduler.register_runner(even()).is_err());
    }

    #[test]
    fn test_remove_calls_on_removed() {
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        let handle = scheduler.register_runner(even()).unwrap();
        scheduler.remove_daemon("even");
        assert_eq!(handle.borrow().removed, 1);
    }

    #[test]
    fn test_runner_state_in_save() {
        let mut world = GameWorld::new();
        let mut scheduler: Scheduler<GameWorld> = Scheduler::new(1);
        scheduler.register_runner(even()).unwrap();
        scheduler.tick(&mut world, 2, "player");
        scheduler.tick(&mut world, 4, "player");

        let state = scheduler.state();
        assert_eq!(state.daemons[0].runner_state, Some(serde_json::json!({ "emitted": 2 })));

        let mut restored: Scheduler<GameWorld> = Scheduler::new(1);
        let handle = restored.register_runner(even()).unwrap();
        restored.set_state(&state);
        assert_eq!(handle.borrow().emitted, 2);
        assert_eq!(restored.active_daemons()[0].run_count, 2);
    }
}
