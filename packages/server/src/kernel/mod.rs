//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostgresCatalogStore, PostgresUserStore, ServerDeps};
pub use test_dependencies::TestDependencies;
pub use traits::*;
