//! Queue lifecycle notifications
//!
//! Observers learn about queues entering and leaving a set ("added",
//! "removed", and "removed because expired") through per-subscriber
//! channels filtered by [`api::EventFilter`].

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod manager;
pub(crate) mod traits;

// Public API module - the only public interface for the notification system
pub mod api;

#[cfg(test)]
mod tests;
