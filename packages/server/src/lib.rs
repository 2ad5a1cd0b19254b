// Movielab - catalog API core
//
// REST API over a movie/actor catalog. Reads need any signed-in user,
// mutations need the admin role.
//
// Domains live in domains/*; the HTTP surface lives in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
