//! HTTP protocol layer module
//!
//! Response construction shared by the request router and the endpoint
//! handlers, decoupled from the business logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_bad_param_response,
    build_health_response, build_number_response, build_options_response,
};
