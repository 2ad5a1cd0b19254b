// Common test utilities
#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
pub mod http;

pub use harness::*;
pub use http::*;
