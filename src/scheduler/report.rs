//! Fault isolation and reporting for daemon and fuse callbacks
//!
//! A failing callback never stops the tick. Faults are handed to the
//! scheduler's `FaultReporter` and the callback counts as producing nothing.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use serde::Serialize;

use crate::core::error::CallbackError;
use crate::core::events::SemanticEvent;
use crate::core::types::Turn;
use crate::scheduler::daemon::CallbackResult;

/// Which callback faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CallbackPhase {
    DaemonRun,
    FuseTrigger,
    FuseCancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCause {
    Error(CallbackError),
    Panic(String),
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCause::Error(err) => write!(f, "{}", err),
            FaultCause::Panic(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFault {
    pub phase: CallbackPhase,
    pub id: String,
    pub turn: Turn,
    pub cause: FaultCause,
}

/// Receives callback faults caught by the scheduler
pub trait FaultReporter {
    fn report(&self, fault: &CallbackFault);
}

/// Default reporter: logs each fault at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report(&self, fault: &CallbackFault) {
        tracing::error!(
            phase = ?fault.phase,
            id = %fault.id,
            turn = fault.turn,
            "Callback failed: {}",
            fault.cause
        );
    }
}

/// Keeps every fault in memory. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    faults: Rc<RefCell<Vec<CallbackFault>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> Vec<CallbackFault> {
        self.faults.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.faults.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.borrow().is_empty()
    }
}

impl FaultReporter for CollectingReporter {
    fn report(&self, fault: &CallbackFault) {
        tracing::warn!(id = %fault.id, "Callback failed: {}", fault.cause);
        self.faults.borrow_mut().push(fault.clone());
    }
}

/// Run a callback, turning an `Err` (and optionally a panic) into a `FaultCause`
pub(crate) fn invoke_guarded<F>(
    isolate_panics: bool,
    call: F,
) -> std::result::Result<Vec<SemanticEvent>, FaultCause>
where
    F: FnOnce() -> CallbackResult,
{
    if !isolate_panics {
        return call().map_err(FaultCause::Error);
    }

    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(FaultCause::Error),
        Err(payload) => Err(FaultCause::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let result = invoke_guarded(true, || Ok(vec![SemanticEvent::new("tick")]));
        assert_eq!(result.unwrap().len(), 1);
    }

    #[test]
    fn test_error_becomes_fault() {
        let result = invoke_guarded(true, || Err("broken".into()));
        assert_eq!(result.unwrap_err(), FaultCause::Error(CallbackError("broken".into())));
    }

    #[test]
    fn test_panic_becomes_fault() {
        let result = invoke_guarded(true, || panic!("troll ate the script"));
        match result {
            Err(FaultCause::Panic(msg)) => assert!(msg.contains("troll ate the script")),
            other => panic!("expected panic fault, got {:?}", other),
        }
    }

    #[test]
    fn test_collecting_reporter_shares_log() {
        let reporter = CollectingReporter::new();
        let handle = reporter.clone();
        reporter.report(&CallbackFault {
            phase: CallbackPhase::FuseTrigger,
            id: "bomb".into(),
            turn: 3,
            cause: FaultCause::Error("dud".into()),
        });
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.faults()[0].id, "bomb");
    }
}
