pub mod movie;
pub mod movie_actor;

pub use movie::{
    escape_like, normalize_actor_ids, Movie, MoviePatch, MovieSearch, MovieSortColumn, NewMovie,
};
pub use movie_actor::MovieActor;
