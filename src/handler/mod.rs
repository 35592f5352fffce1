//! Request handler module
//!
//! Route dispatch and the lambdaexp endpoint logic.

pub mod lambdaexp;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
