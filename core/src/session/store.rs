//! Session store implementation

use super::audit::{AuditLog, CommitRecord};
use crate::error::StoreError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Type alias for store operation results
pub type StoreResult<T> = Result<T, StoreError>;

/// An action handler inspects the namespace fields and the payload, and
/// computes zero or one mutation calls
///
/// Handlers must be pure over their inputs: they return the mutation to
/// apply instead of touching the store, and must not call back into it.
pub type ActionHandler =
    Box<dyn Fn(&HashMap<String, Value>, &Value) -> Option<MutationCall> + Send + Sync>;

/// A mutation handler computes the new value of its field from the previous
/// value (`None` when the field was unset) and the payload
pub type MutationHandler = Box<dyn Fn(Option<&Value>, &Value) -> Value + Send + Sync>;

type Observer = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

/// A named mutation with its payload, produced by an action handler
#[derive(Debug, Clone)]
pub struct MutationCall {
    /// Tag of the mutation to apply
    pub mutation: String,
    /// Payload forwarded to the mutation handler
    pub payload: Value,
}

impl MutationCall {
    /// Create a new mutation call
    pub fn new(mutation: impl Into<String>, payload: Value) -> Self {
        Self {
            mutation: mutation.into(),
            payload,
        }
    }
}

struct Mutation {
    field: String,
    apply: MutationHandler,
}

#[derive(Default)]
struct Namespace {
    fields: HashMap<String, Value>,
    actions: HashMap<String, ActionHandler>,
    mutations: HashMap<String, Mutation>,
    observers: HashMap<String, Vec<Observer>>,
}

/// Builder for a namespace: initial fields plus its action and mutation
/// handlers
///
/// Handlers are collected in declaration order; duplicate tags are rejected
/// when the namespace is registered.
pub struct NamespaceBuilder {
    name: String,
    fields: Vec<(String, Value)>,
    actions: Vec<(String, ActionHandler)>,
    mutations: Vec<(String, String, MutationHandler)>,
}

impl NamespaceBuilder {
    /// Start a namespace with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            actions: Vec::new(),
            mutations: Vec::new(),
        }
    }

    /// Declare a field with its initial value
    pub fn field(mut self, name: impl Into<String>, initial: Value) -> Self {
        self.fields.push((name.into(), initial));
        self
    }

    /// Register a mutation handler for the given tag, targeting one field
    pub fn mutation<F>(mut self, tag: impl Into<String>, field: impl Into<String>, apply: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Value + Send + Sync + 'static,
    {
        self.mutations
            .push((tag.into(), field.into(), Box::new(apply)));
        self
    }

    /// Register an action handler for the given tag
    pub fn action<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&HashMap<String, Value>, &Value) -> Option<MutationCall> + Send + Sync + 'static,
    {
        self.actions.push((tag.into(), Box::new(handler)));
        self
    }
}

/// Process-wide keyed state container with audited writes
///
/// Fields are grouped into namespaces. The only external write entry point
/// is [`dispatch`](SessionStore::dispatch); the commit step that applies a
/// mutation is internal, so every change carries its action and mutation
/// tags into the audit log.
#[derive(Default)]
pub struct SessionStore {
    namespaces: Mutex<HashMap<String, Namespace>>,
    audit: AuditLog,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace
    ///
    /// Fails if the namespace name, or any field, action, or mutation tag
    /// within it, is already taken.
    pub fn register(&self, builder: NamespaceBuilder) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().unwrap();
        if namespaces.contains_key(&builder.name) {
            return Err(StoreError::DuplicateNamespace {
                namespace: builder.name,
            });
        }

        let mut namespace = Namespace::default();
        for (field, initial) in builder.fields {
            if namespace.fields.insert(field.clone(), initial).is_some() {
                return Err(StoreError::DuplicateHandler {
                    namespace: builder.name.clone(),
                    tag: field,
                });
            }
        }
        for (tag, field, apply) in builder.mutations {
            if namespace
                .mutations
                .insert(tag.clone(), Mutation { field, apply })
                .is_some()
            {
                return Err(StoreError::DuplicateHandler {
                    namespace: builder.name.clone(),
                    tag,
                });
            }
        }
        for (tag, handler) in builder.actions {
            if namespace.actions.insert(tag.clone(), handler).is_some() {
                return Err(StoreError::DuplicateHandler {
                    namespace: builder.name.clone(),
                    tag,
                });
            }
        }

        namespaces.insert(builder.name, namespace);
        Ok(())
    }

    /// Dispatch an action
    ///
    /// Looks up the action handler under the tag, lets it compute zero or
    /// one mutation calls, and commits the result. Returns the new field
    /// value when a mutation was applied, `None` when the action chose not
    /// to mutate anything.
    pub fn dispatch(
        &self,
        namespace: &str,
        action: &str,
        payload: Value,
    ) -> StoreResult<Option<Value>> {
        let call = {
            let namespaces = self.namespaces.lock().unwrap();
            let ns = namespaces
                .get(namespace)
                .ok_or_else(|| StoreError::UnknownAction {
                    namespace: namespace.to_string(),
                    action: action.to_string(),
                })?;
            let handler = ns
                .actions
                .get(action)
                .ok_or_else(|| StoreError::UnknownAction {
                    namespace: namespace.to_string(),
                    action: action.to_string(),
                })?;
            handler(&ns.fields, &payload)
        };

        let Some(call) = call else {
            tracing::trace!(namespace, action, "action produced no mutation");
            return Ok(None);
        };

        self.commit(namespace, action, call).map(Some)
    }

    /// Apply a mutation call produced by an action handler
    ///
    /// This is the single point where fields change: one field per commit,
    /// applied synchronously, recorded in the audit log, announced to
    /// observers.
    fn commit(&self, namespace: &str, action: &str, call: MutationCall) -> StoreResult<Value> {
        let (field, old, new, observers) = {
            let mut namespaces = self.namespaces.lock().unwrap();
            let ns = namespaces
                .get_mut(namespace)
                .ok_or_else(|| StoreError::UnknownMutation {
                    namespace: namespace.to_string(),
                    mutation: call.mutation.clone(),
                })?;
            let mutation =
                ns.mutations
                    .get(&call.mutation)
                    .ok_or_else(|| StoreError::UnknownMutation {
                        namespace: namespace.to_string(),
                        mutation: call.mutation.clone(),
                    })?;

            let old = ns.fields.get(&mutation.field).cloned();
            let new = (mutation.apply)(old.as_ref(), &call.payload);
            let field = mutation.field.clone();
            ns.fields.insert(field.clone(), new.clone());

            let observers = ns.observers.get(&field).cloned().unwrap_or_default();
            (field, old, new, observers)
        };

        self.audit.append(
            namespace,
            action,
            &call.mutation,
            &field,
            old.clone().unwrap_or(Value::Null),
            new.clone(),
        );
        tracing::debug!(
            namespace,
            action,
            mutation = %call.mutation,
            field = %field,
            "session commit"
        );

        // Observers run outside the lock so they may read the store
        let old = old.unwrap_or(Value::Null);
        for observer in observers {
            observer(&old, &new);
        }

        Ok(new)
    }

    /// Subscribe to changes of one field
    ///
    /// The observer receives the old and new value after every commit that
    /// touches the field.
    pub fn subscribe<F>(&self, namespace: &str, field: impl Into<String>, observer: F) -> StoreResult<()>
    where
        F: Fn(&Value, &Value) + Send + Sync + 'static,
    {
        let mut namespaces = self.namespaces.lock().unwrap();
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace {
                namespace: namespace.to_string(),
            })?;
        ns.observers
            .entry(field.into())
            .or_default()
            .push(Arc::new(observer));
        Ok(())
    }

    /// Get a snapshot of one field's value
    pub fn field(&self, namespace: &str, field: &str) -> Option<Value> {
        let namespaces = self.namespaces.lock().unwrap();
        namespaces.get(namespace)?.fields.get(field).cloned()
    }

    /// Get all recorded commits
    pub fn audit(&self) -> Vec<CommitRecord> {
        self.audit.records()
    }
}
