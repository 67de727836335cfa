//! Handler Registry
//!
//! Resolves delivered events to their bound handler and runs it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DocumentSnapshot, EventKind, RawTrigger, TriggerEvent};
use crate::handlers::{
    HandlerOutcome, PostCreatedHandler, PostDeletedHandler, PostUpdatedHandler, TriggerHandler,
    UserCreatedHandler,
};
use crate::stats::StatsService;

use super::{DispatchError, DocumentPath, PathTemplate};

struct Binding {
    template: PathTemplate,
    handler: Arc<dyn TriggerHandler>,
}

/// Description of one registered binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub template: String,
    pub kind: EventKind,
    pub handler: &'static str,
}

/// Mapping from (collection, event kind) to a handler
#[derive(Default)]
pub struct HandlerRegistry {
    bindings: HashMap<(String, EventKind), Binding>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four standard bindings on `posts/{postId}` and `users/{userId}`
    pub fn standard(stats: StatsService) -> Self {
        let posts = PathTemplate::new("posts", "postId");
        let users = PathTemplate::new("users", "userId");

        let mut registry = Self::new();
        registry.insert(
            posts.clone(),
            EventKind::Created,
            Arc::new(PostCreatedHandler::new(stats.clone())),
        );
        registry.insert(
            posts.clone(),
            EventKind::Updated,
            Arc::new(PostUpdatedHandler::new()),
        );
        registry.insert(
            posts,
            EventKind::Deleted,
            Arc::new(PostDeletedHandler::new(stats.clone())),
        );
        registry.insert(
            users,
            EventKind::Created,
            Arc::new(UserCreatedHandler::new(stats)),
        );
        registry
    }

    /// Bind a handler to a template such as `posts/{postId}`
    pub fn register(
        &mut self,
        template: &str,
        kind: EventKind,
        handler: Arc<dyn TriggerHandler>,
    ) -> Result<(), DispatchError> {
        let template: PathTemplate = template.parse()?;
        let key = (template.collection().to_string(), kind);

        if self.bindings.contains_key(&key) {
            return Err(DispatchError::DuplicateBinding {
                collection: key.0,
                kind,
            });
        }

        self.insert(template, kind, handler);
        Ok(())
    }

    fn insert(&mut self, template: PathTemplate, kind: EventKind, handler: Arc<dyn TriggerHandler>) {
        let key = (template.collection().to_string(), kind);
        self.bindings.insert(key, Binding { template, handler });
    }

    /// Registered bindings, ordered by template then kind
    pub fn bindings(&self) -> Vec<BindingInfo> {
        let mut infos: Vec<BindingInfo> = self
            .bindings
            .iter()
            .map(|((_, kind), binding)| BindingInfo {
                template: binding.template.to_string(),
                kind: *kind,
                handler: binding.handler.name(),
            })
            .collect();
        infos.sort_by(|a, b| {
            a.template
                .cmp(&b.template)
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        });
        infos
    }

    /// Bind a delivered event to its handler without running it
    pub fn resolve(
        &self,
        raw: RawTrigger,
    ) -> Result<(Arc<dyn TriggerHandler>, TriggerEvent), DispatchError> {
        let path = DocumentPath::parse(&raw.document)?;
        let key = (path.collection.clone(), raw.kind);

        let binding = self
            .bindings
            .get(&key)
            .ok_or_else(|| DispatchError::NoBinding {
                collection: path.collection.clone(),
                kind: raw.kind,
            })?;

        let document_id = binding
            .template
            .matches(&path)
            .ok_or_else(|| DispatchError::InvalidPath(raw.document.clone()))?
            .to_string();

        let params = HashMap::from([(binding.template.param().to_string(), document_id.clone())]);

        let event = TriggerEvent {
            event_id: raw.event_id.unwrap_or_else(Uuid::new_v4),
            kind: raw.kind,
            collection: path.collection,
            document_id,
            params,
            before: raw.before.map(DocumentSnapshot::from_value),
            after: raw.after.map(DocumentSnapshot::from_value),
            received_at: Utc::now(),
        };

        Ok((Arc::clone(&binding.handler), event))
    }

    /// Resolve and run the bound handler
    pub async fn dispatch(&self, raw: RawTrigger) -> Result<HandlerOutcome, DispatchError> {
        let (handler, event) = self.resolve(raw)?;

        tracing::debug!(
            event_id = %event.event_id,
            handler = handler.name(),
            document = %format!("{}/{}", event.collection, event.document_id),
            "Dispatching trigger"
        );

        Ok(handler.handle(&event).await)
    }
}
