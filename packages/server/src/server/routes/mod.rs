// HTTP routes
pub mod actors;
pub mod auth;
pub mod health;
pub mod movies;

pub use actors::actor_routes;
pub use auth::sign_in_handler;
pub use health::health_handler;
pub use movies::movie_routes;
