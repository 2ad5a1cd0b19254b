// Common types shared across the domain, kernel and server layers

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;

pub use auth::{AuthError, Caller, Capability, Role};
pub use entity_ids::*;
pub use errors::StoreError;
pub use id::Id;
pub use pagination::{ListParams, ListQuery, Page, QueryParamError, Sort, SortColumn, SortDirection};
