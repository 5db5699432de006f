//! Session state: namespaced fields with audited, tag-dispatched writes
//!
//! External callers never write fields directly. Every change enters through
//! a named action, which delegates to a named mutation; each applied mutation
//! is one atomic field transition, appended to the audit log and announced to
//! subscribed observers.

pub mod audit;
pub mod store;

// Re-export commonly used types
pub use audit::CommitRecord;
pub use store::{MutationCall, NamespaceBuilder, SessionStore, StoreResult};
