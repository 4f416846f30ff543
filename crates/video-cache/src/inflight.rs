//! Per-key deduplication of in-flight work

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

type Pending<T> = Shared<BoxFuture<'static, T>>;

struct Entry<T: Clone> {
    shared: Pending<T>,
    waiters: usize,
}

/// Collapses concurrent computations for the same key into one.
///
/// The first caller for a key starts the future; later callers for the same
/// key await that same future and receive a clone of its output. Any waiter
/// can drive it to completion, so the work survives the first caller being
/// dropped. The key is released once the output is ready, or when the last
/// waiter goes away before that.
pub struct InFlight<T: Clone> {
    pending: Mutex<HashMap<String, Entry<T>>>,
}

impl<T> InFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Run `make()` for `key`, or join the run already in progress
    pub async fn run<F, Fut>(&self, key: &str, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut pending = self.lock();
            match pending.get_mut(key) {
                Some(entry) => {
                    entry.waiters += 1;
                    entry.shared.clone()
                }
                None => {
                    let fut = make().boxed().shared();
                    pending.insert(
                        key.to_string(),
                        Entry {
                            shared: fut.clone(),
                            waiters: 1,
                        },
                    );
                    fut
                }
            }
        };

        let waiter = Waiter {
            inflight: self,
            key,
            shared,
        };
        waiter.shared.clone().await
    }

    /// Number of keys with work in progress
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> Default for InFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// One caller's registration on a key, released on completion or cancellation
struct Waiter<'a, T: Clone> {
    inflight: &'a InFlight<T>,
    key: &'a str,
    shared: Pending<T>,
}

impl<T: Clone> Drop for Waiter<'_, T> {
    fn drop(&mut self) {
        let mut pending = self.inflight.pending.lock().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = pending.get_mut(self.key) else {
            return;
        };
        // A newer run may already own the key
        if !entry.shared.ptr_eq(&self.shared) {
            return;
        }

        entry.waiters = entry.waiters.saturating_sub(1);
        if entry.waiters == 0 || self.shared.peek().is_some() {
            pending.remove(self.key);
        }
    }
}
