//! Registry module
//!
//! Explicit mapping from (collection, event kind) to handlers, built once at
//! process start and handed to the delivery adapter.

mod error;
mod path;
mod bindings;

pub use error::DispatchError;
pub use path::{DocumentPath, PathTemplate};
pub use bindings::{BindingInfo, HandlerRegistry};
