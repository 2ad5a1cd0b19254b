//! Typed ID definitions for catalog entities.
//!
//! ```rust
//! use movielab_core::common::{ActorId, MovieId};
//!
//! let movie_id = MovieId::new(1);
//! let actor_id = ActorId::new(1);
//!
//! // These are incompatible types:
//! // let wrong: ActorId = movie_id;
//! # let _ = (movie_id, actor_id);
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Movie rows.
pub struct MovieEntity;

/// Marker type for Actor rows.
pub struct ActorEntity;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for movies.
pub type MovieId = Id<MovieEntity>;

/// Typed ID for actors.
pub type ActorId = Id<ActorEntity>;
