//! Auth domain - credential lookup and stateless session tokens
//!
//! Responsibilities:
//! - Resolve a role from a username/password pair
//! - Issue and verify HMAC-signed JWTs carrying that role

pub mod actions;
pub mod jwt;
pub mod models;

pub use actions::{sign_in, SignInError, SignInRequest};
pub use jwt::{Claims, JwtService};
pub use models::User;
