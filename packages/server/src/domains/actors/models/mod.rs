pub mod actor;

pub use actor::{Actor, ActorPatch, ActorSortColumn, NewActor, Sex};
