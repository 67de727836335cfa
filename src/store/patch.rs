//! Merge Patches
//!
//! Field-level changes applied by merge-upsert. Values are either set
//! verbatim, incremented in place, or filled with the store's clock.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::{Document, StoreError};

/// Value written to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Replace the field
    Set(Value),
    /// Add to the current integer value; absent or non-integer fields start from zero
    Increment(i64),
    /// Resolved by the store at write time
    ServerTimestamp,
}

/// Set of field changes for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePatch {
    fields: BTreeMap<String, FieldValue>,
}

impl MergePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), FieldValue::Set(value.into()));
        self
    }

    pub fn increment(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.fields.insert(field.into(), FieldValue::Increment(delta));
        self
    }

    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldValue::ServerTimestamp);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Apply a patch to a document in place.
///
/// Fields not named by the patch are left untouched. `now` is the store's
/// clock reading for this write.
pub fn apply_merge(
    target: &mut Document,
    patch: &MergePatch,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    for (name, value) in patch.fields() {
        if name.is_empty() {
            return Err(StoreError::InvalidPatch("empty field name".to_string()));
        }

        let resolved = match value {
            FieldValue::Set(v) => v.clone(),
            FieldValue::Increment(delta) => {
                let current = target.get(name).and_then(Value::as_i64).unwrap_or(0);
                let next = current.checked_add(*delta).ok_or_else(|| {
                    StoreError::InvalidPatch(format!("increment of '{}' overflows", name))
                })?;
                Value::from(next)
            }
            FieldValue::ServerTimestamp => {
                Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        };

        target.insert(name.to_string(), resolved);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_into_empty_document() {
        let mut target = Document::new();
        let patch = MergePatch::new()
            .increment("totalPosts", 1)
            .server_timestamp("lastPostAt")
            .set("lastPostBy", "alice");

        let now = Utc::now();
        apply_merge(&mut target, &patch, now).unwrap();

        assert_eq!(target["totalPosts"], json!(1));
        assert_eq!(target["lastPostBy"], json!("alice"));
        assert_eq!(
            target["lastPostAt"],
            json!(now.to_rfc3339_opts(SecondsFormat::Millis, true))
        );
    }

    #[test]
    fn test_merge_leaves_other_fields() {
        let mut target = doc(json!({
            "totalPosts": 4,
            "lastPostBy": "bob",
            "lastDeletedBy": "carol"
        }));
        let patch = MergePatch::new().increment("totalPosts", -1).set("lastDeletedBy", "dave");

        apply_merge(&mut target, &patch, Utc::now()).unwrap();

        assert_eq!(target["totalPosts"], json!(3));
        assert_eq!(target["lastPostBy"], json!("bob"));
        assert_eq!(target["lastDeletedBy"], json!("dave"));
    }

    #[test]
    fn test_increment_non_numeric_starts_from_zero() {
        let mut target = doc(json!({"totalPosts": "many"}));
        apply_merge(&mut target, &MergePatch::new().increment("totalPosts", -1), Utc::now())
            .unwrap();
        assert_eq!(target["totalPosts"], json!(-1));
    }

    #[test]
    fn test_increment_overflow_rejected() {
        let mut target = doc(json!({"totalPosts": i64::MAX}));
        let result = apply_merge(&mut target, &MergePatch::new().increment("totalPosts", 1), Utc::now());

        assert!(matches!(result, Err(StoreError::InvalidPatch(_))));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let mut target = Document::new();
        let result = apply_merge(&mut target, &MergePatch::new().set("", 1), Utc::now());
        assert!(matches!(result, Err(StoreError::InvalidPatch(_))));
    }
}
