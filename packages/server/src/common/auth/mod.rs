//! Authorization module for the catalog API
//!
//! Provides a fluent API for role checks, consulted once per request by the
//! authorization gate:
//!
//! ```rust
//! use movielab_core::common::auth::{Caller, Capability, Role};
//!
//! let allowed = Caller::new("alice", Role::User)
//!     .can(Capability::ManageCatalog)
//!     .check()
//!     .is_ok();
//! assert!(!allowed);
//! ```

mod builder;
mod capability;
mod errors;
mod role;

pub use builder::{Caller, CapabilityCheck};
pub use capability::Capability;
pub use errors::AuthError;
pub use role::Role;
