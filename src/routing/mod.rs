//! Routing module
//!
//! Path template matching for the service's routes. Health probe paths are
//! exact matches handled in the request router; the parameterized endpoint
//! route goes through the matcher here.

mod matcher;

pub use matcher::extract_param;
