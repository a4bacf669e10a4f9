//! Model-type dispatch over a family of CRUD requests.
//!
//! # Responsibility
//! - Route each operation to the request registered for the argument's
//!   model type.
//!
//! # Invariants
//! - At most one request per model type; re-registering replaces.
//! - A miss fails with `NoMatchingRequest`, never a silent no-op.

use super::{CrudRequest, ListQuery, RequestError};
use std::any::{Any, TypeId};

struct Entry {
    model: TypeId,
    request: Box<dyn Any>,
}

/// One public facade serving several model types.
///
/// Requests register by model type; every operation looks the type up and
/// delegates to the matching [`CrudRequest`].
#[derive(Default)]
pub struct CompositeRequest {
    entries: Vec<Entry>,
}

impl CompositeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `request` for its model type, replacing any previous one.
    pub fn register<M: Any>(&mut self, request: CrudRequest<M>) {
        let model = TypeId::of::<M>();
        self.entries.retain(|entry| entry.model != model);
        self.entries.push(Entry {
            model,
            request: Box::new(request),
        });
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with<M: Any>(mut self, request: CrudRequest<M>) -> Self {
        self.register(request);
        self
    }

    pub fn save<M: Any>(&self, object: &M) -> Result<(), RequestError> {
        self.request_for::<M>()?.save(object)
    }

    pub fn load<M: Any>(&self, object: &mut M) -> Result<bool, RequestError> {
        self.request_for::<M>()?.load(object)
    }

    pub fn update<M: Any>(&self, object: &M) -> Result<(), RequestError> {
        self.request_for::<M>()?.update(object)
    }

    pub fn delete<M: Any>(&self, object: &M) -> Result<(), RequestError> {
        self.request_for::<M>()?.delete(object)
    }

    pub fn load_all<M: Any + Default>(&self, query: &ListQuery) -> Result<Vec<M>, RequestError> {
        self.request_for::<M>()?.load_all(query)
    }

    fn request_for<M: Any>(&self) -> Result<&CrudRequest<M>, RequestError> {
        let model = TypeId::of::<M>();
        self.entries
            .iter()
            .find(|entry| entry.model == model)
            .and_then(|entry| entry.request.downcast_ref::<CrudRequest<M>>())
            .ok_or(RequestError::NoMatchingRequest {
                model: std::any::type_name::<M>(),
            })
    }
}

impl std::fmt::Debug for CompositeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRequest")
            .field("registered", &self.entries.len())
            .finish()
    }
}
