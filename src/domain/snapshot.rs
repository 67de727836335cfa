//! Document Snapshots
//!
//! Schema-less views over document contents. Fields are read
//! optimistically: reading never raises an error, and an absent field is
//! kept distinct from one explicitly set to null.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rendered in log records for fields the document does not carry
pub const PLACEHOLDER: &str = "undefined";

/// Contents of a document at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSnapshot {
    fields: Map<String, Value>,
}

impl DocumentSnapshot {
    /// Wrap a JSON value. Non-object payloads yield an empty snapshot.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn field(&self, name: &str) -> SnapshotField {
        SnapshotField(self.fields.get(name).cloned())
    }
}

impl From<Value> for DocumentSnapshot {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// One field read from a snapshot, possibly absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotField(Option<Value>);

impl SnapshotField {
    /// Stored value; `None` when the field is absent
    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

/// Strings verbatim, `null` for null, JSON text for other values and the
/// placeholder for absent fields
impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str(PLACEHOLDER),
            Some(Value::String(s)) => f.write_str(s),
            Some(other) => write!(f, "{}", other),
        }
    }
}

/// Fields of a `posts/{postId}` document that the handlers use
#[derive(Debug, Clone, PartialEq)]
pub struct PostDocument {
    pub username: SnapshotField,
    pub content: SnapshotField,
}

impl PostDocument {
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        Self {
            username: snapshot.field("username"),
            content: snapshot.field("content"),
        }
    }
}

/// Fields of a `users/{userId}` document that the handlers use
#[derive(Debug, Clone, PartialEq)]
pub struct UserDocument {
    pub email: SnapshotField,
    pub username: SnapshotField,
}

impl UserDocument {
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        Self {
            email: snapshot.field("email"),
            username: snapshot.field("username"),
        }
    }
}
