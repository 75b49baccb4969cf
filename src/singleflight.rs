//! Duplicate-call suppression.
//!
//! [`SingleFlight`] collapses concurrent calls that share a key into a single
//! execution of the underlying work, fanning the one result out to every
//! caller. It exists to protect a [`Group`](crate::Group)'s data source from a
//! thundering herd of identical misses on a hot key.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

enum CallState<T> {
    Pending,
    Done(Result<T>),
}

struct Call<T> {
    state: Mutex<CallState<T>>,
    done: Condvar,
}

impl<T> Call<T> {
    fn new() -> Self {
        Call {
            state: Mutex::new(CallState::Pending),
            done: Condvar::new(),
        }
    }
}

/// Collapses concurrent `do_call(key, ..)` invocations sharing a `key` into a
/// single execution of the supplied closure.
///
/// `T` is the type the closure produces; cloning it must be cheap, since every
/// waiter receives its own clone of the one result (`T: Clone`, and this
/// crate's own closures return [`crate::ByteView`], which clones in O(1)).
pub(crate) struct SingleFlight<T> {
    pending: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub(crate) fn new() -> Self {
        SingleFlight {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` on behalf of `key`, or waits for an in-flight call for the
    /// same key to finish and returns its result.
    ///
    /// At most one `f` executes per `(self, key)` at any instant (P3). The
    /// `pending` entry for `key` is always removed before `do_call` returns
    /// to any caller — leader or waiter — so the next call starts fresh.
    pub(crate) fn do_call<F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut pending = self.pending.lock();
        if let Some(call) = pending.get(key) {
            let call = Arc::clone(call);
            drop(pending);
            return Self::wait_for(&call);
        }

        let call = Arc::new(Call::new());
        pending.insert(key.to_string(), Arc::clone(&call));
        drop(pending);

        // Sole remover of `pending[key]`: on a normal return it runs here
        // with the call already `Done`, and on an unwind it marks the call
        // `Done(Err(LoaderPanicked))` first. Exactly one removal happens
        // either way — a second, separate removal could delete a later
        // leader's entry for the same key once this one has already cleared
        // it, letting two `f` executions run concurrently.
        let _guard = LeaderGuard {
            group: self,
            key,
            call: &call,
        };

        let result = f();

        {
            let mut state = call.state.lock();
            *state = CallState::Done(result.clone());
        }
        call.done.notify_all();

        result
    }

    fn wait_for(call: &Arc<Call<T>>) -> Result<T> {
        let mut state = call.state.lock();
        loop {
            match &*state {
                CallState::Pending => call.done.wait(&mut state),
                CallState::Done(result) => return result.clone(),
            }
        }
    }
}

struct LeaderGuard<'a, T> {
    group: &'a SingleFlight<T>,
    key: &'a str,
    call: &'a Arc<Call<T>>,
}

impl<T> Drop for LeaderGuard<'_, T> {
    fn drop(&mut self) {
        {
            let mut state = self.call.state.lock();
            if matches!(*state, CallState::Pending) {
                *state = CallState::Done(Err(Error::LoaderPanicked {
                    key: self.key.to_string(),
                }));
            }
        }
        self.call.done.notify_all();
        self.group.pending.lock().remove(self.key);
    }
}
