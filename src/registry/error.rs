//! Dispatch Errors
//!
//! Failures that happen before a handler runs. Once a handler is invoked
//! the outcome is always reported through `HandlerOutcome`.

use crate::domain::EventKind;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Document path does not have the `collection/document` shape
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Template is not `collection/{param}`
    #[error("Invalid path template: {0}")]
    InvalidTemplate(String),

    /// No handler is bound to this collection and event kind
    #[error("No handler bound for {kind} on '{collection}'")]
    NoBinding { collection: String, kind: EventKind },

    /// A handler is already bound to this collection and event kind
    #[error("Duplicate binding for {kind} on '{collection}'")]
    DuplicateBinding { collection: String, kind: EventKind },
}
