//! Synchronization utilities for robust mutex handling
//!
//! Queue and queue-set state is only ever mutated by single, self-contained
//! collection calls, so a panic on another thread cannot leave it half
//! updated. These helpers therefore recover the guard from a poisoned lock
//! (logging the event) instead of turning poisoning into an error for every
//! caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if the lock has been poisoned
///
/// # Arguments
/// * `mutex` - The mutex to lock
/// * `context` - Human-readable name of the protected state, used in the log line
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use sharedq::core::sync::lock_or_recover;
///
/// let mutex = Mutex::new(42);
/// let guard = lock_or_recover(&mutex, "answer");
/// assert_eq!(*guard, 42);
/// ```
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poison_err: PoisonError<MutexGuard<'a, T>>| {
        log::warn!(
            "Recovered poisoned lock on {} (a panic occurred while it was held)",
            context
        );
        poison_err.into_inner()
    })
}
