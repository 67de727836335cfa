//! Statistics module
//!
//! Maintains the singleton aggregate documents in the stats collection.
//! These are read models derived from lifecycle events.

mod service;

pub use service::{StatsService, DEFAULT_STATS_COLLECTION, POSTS_STATS_DOC, USERS_STATS_DOC};
