// SPDX-License-Identifier: MIT

//! One-shot asynchronous initialization gate
//!
//! Backing-store adapters need setup (create a directory, a container, a
//! collection) before their first write. [`LazyInit`] runs that setup
//! exactly once no matter how many writers race to it, and caches the
//! outcome for the rest of the instance's lifetime. A failed setup
//! permanently poisons the gate: every later caller observes the cached
//! error without the action running again.

use crate::store::StoreError;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type InitResult = Result<(), Arc<StoreError>>;

enum GateState {
    Idle,
    /// Setup is running; waiters are completed in arrival order
    Initializing(Vec<oneshot::Sender<InitResult>>),
    Done(InitResult),
}

/// One-shot async setup gate shared by all writers of one adapter.
///
/// Cloning shares the gate; each adapter owns exactly one.
#[derive(Clone)]
pub struct LazyInit {
    state: Arc<Mutex<GateState>>,
}

impl Default for LazyInit {
    fn default() -> Self {
        Self::new()
    }
}

impl LazyInit {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState::Idle)),
        }
    }

    /// Run `action` if this gate has never run it, otherwise wait for or
    /// return the cached outcome.
    ///
    /// The action executes at most once per gate, on its own task so that a
    /// cancelled caller cannot strand the other waiters. Waiters are
    /// completed in registration order, the triggering caller first.
    pub async fn after_init<F, Fut>(&self, action: F) -> Result<(), StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        let (rx, run) = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match &mut *state {
                GateState::Done(Ok(())) => return Ok(()),
                GateState::Done(Err(err)) => return Err(StoreError::Init(err.clone())),
                GateState::Initializing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    (rx, false)
                }
                GateState::Idle => {
                    let (tx, rx) = oneshot::channel();
                    *state = GateState::Initializing(vec![tx]);
                    (rx, true)
                }
            }
        };

        if run {
            let gate = self.clone();
            let setup = action();
            tokio::spawn(async move {
                let result = setup.await.map_err(Arc::new);
                gate.complete(result);
            });
        }

        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(StoreError::Init(err)),
            Err(_) => Err(StoreError::InitInterrupted),
        }
    }

    fn complete(&self, result: InitResult) {
        if let Err(err) = &result {
            tracing::error!(error = %err, "store initialization failed");
        }
        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, GateState::Done(result.clone())) {
                GateState::Initializing(waiters) => waiters,
                _ => Vec::new(),
            }
        };
        for waiter in waiters {
            // a waiter may have gone away; its slot is simply skipped
            let _ = waiter.send(result.clone());
        }
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
