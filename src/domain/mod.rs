//! Domain module
//!
//! Lifecycle events and the document snapshots they carry.

pub mod events;
pub mod snapshot;

pub use events::{EventKind, RawTrigger, TriggerEvent};
pub use snapshot::{DocumentSnapshot, PostDocument, SnapshotField, UserDocument, PLACEHOLDER};
