//! Movies domain - titles, ratings, and their cast
//!
//! A movie's `actor_ids` are never stored on the movie row; they are
//! aggregated from `movie_actors` on every read.

pub mod models;

pub use models::{Movie, MovieActor, MoviePatch, MovieSearch, MovieSortColumn, NewMovie};
