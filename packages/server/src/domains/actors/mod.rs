//! Actors domain

pub mod models;

pub use models::{Actor, ActorPatch, ActorSortColumn, NewActor, Sex};
