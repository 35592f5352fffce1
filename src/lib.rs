//! Small HTTP service with a single computational endpoint:
//! `GET /lambdaexp/{number}` answers `(number % 2) + (number + 2)` in
//! wrapping i32 arithmetic.
//!
//! The binary wires these modules together; they are exposed as a library
//! so tests can drive each layer directly.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
