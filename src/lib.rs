//! Scope-addressed fan-out queue sets
//!
//! A [`queue::QueueSet`] owns a collection of [`queue::SharedQueue`]s under
//! one scope. Producers route items to every queue, to a scope prefix, to one
//! queue by id, or to all queues but some; consumers drain their own queue.
//! Queues nobody reads from are evicted by a background reaper, and observers
//! can follow queues entering and leaving the set through [`notifications`].

pub mod app;
pub mod core;
pub mod notifications;
pub mod queue;
