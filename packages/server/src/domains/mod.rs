// Business domains
pub mod actors;
pub mod auth;
pub mod movies;
