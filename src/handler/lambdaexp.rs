//! Lambda expression endpoint module
//!
//! Implements `GET /lambdaexp/{number}`: the response body is the sum of
//! the input modulo 2 and the input plus 2.

use crate::config::HttpConfig;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Route prefix of the endpoint; `{number}` is the following path segment
pub const ROUTE_PREFIX: &str = "/lambdaexp";

/// Remainder of the input divided by 2
///
/// Rust's `%` is a truncating remainder, so the sign follows the dividend:
/// `remainder(-1) == -1`.
const fn remainder(x: i32) -> i32 {
    x % 2
}

/// Input plus 2, wrapping at the i32 boundaries
const fn add_two(x: i32) -> i32 {
    x.wrapping_add(2)
}

/// Evaluate the endpoint arithmetic: `(number % 2) + (number + 2)`
///
/// All arithmetic is two's-complement i32. Inputs near `i32::MAX` wrap
/// instead of failing, so the operation is total: every i32 input
/// produces a result.
pub const fn evaluate(number: i32) -> i32 {
    remainder(number).wrapping_add(add_two(number))
}

/// Serve the endpoint for an extracted raw path segment
///
/// Parsing the segment is the transport layer's concern: a segment that is
/// not an i32 (non-numeric, or out of range) yields 400 and the core
/// computation never runs.
pub fn serve(raw_segment: &str, http_config: &HttpConfig, is_head: bool) -> Response<Full<Bytes>> {
    match raw_segment.parse::<i32>() {
        Ok(number) => http::build_number_response(
            evaluate(number),
            &http_config.default_content_type,
            is_head,
        ),
        Err(e) => {
            logger::log_warning(&format!(
                "Rejected non-integer path parameter '{raw_segment}': {e}"
            ));
            http::build_bad_param_response(raw_segment, &e.to_string())
        }
    }
}
