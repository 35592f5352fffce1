//! HTTP response building module
//!
//! Builders for every response the service produces. Builders never panic:
//! a failed build degrades to a plain fallback response and is logged.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build the 200 response carrying a computed result
///
/// The body is the decimal rendering of the value, which is also a valid
/// bare JSON number. HEAD requests keep the headers (including the
/// Content-Length a GET would produce) with an empty body.
pub fn build_number_response(
    value: i32,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content = value.to_string();
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a health probe response
pub fn build_health_response(status: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content = serde_json::json!({ "status": status }).to_string();
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request for a path parameter that is not an i32
pub fn build_bad_param_response(segment: &str, reason: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "invalid number parameter",
        "parameter": segment,
        "detail": reason,
    });

    Response::builder()
        .status(400)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("Bad Request")))
        })
}

/// Build 404 Not Found listing the paths the service serves
pub fn build_404_response(available_endpoints: &[&str]) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "available_endpoints": available_endpoints,
    });

    Response::builder()
        .status(404)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn test_number_response() {
        let resp = build_number_response(8, "application/json", false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "1");
        assert_eq!(body_string(resp).await, "8");
    }

    #[tokio::test]
    async fn test_number_response_negative() {
        let resp = build_number_response(-2_147_483_646, "application/json", false);
        assert_eq!(body_string(resp).await, "-2147483646");
    }

    #[tokio::test]
    async fn test_number_response_head_keeps_length() {
        let resp = build_number_response(102, "application/json", true);
        assert_eq!(resp.status(), 200);
        // Content-Length reflects what GET would send
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "3");
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_health_response() {
        let resp = build_health_response("ok", false);
        assert_eq!(resp.status(), 200);
        let body = body_string(resp).await;
        let value: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
        assert_eq!(value["status"], "ok");
    }

    #[tokio::test]
    async fn test_bad_param_response() {
        let resp = build_bad_param_response("abc", "invalid digit found in string");
        assert_eq!(resp.status(), 400);
        let body = body_string(resp).await;
        let value: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
        assert_eq!(value["parameter"], "abc");
        assert_eq!(value["error"], "invalid number parameter");
    }

    #[tokio::test]
    async fn test_404_lists_endpoints() {
        let resp = build_404_response(&["/lambdaexp/{number}", "/healthz"]);
        assert_eq!(resp.status(), 404);
        let body = body_string(resp).await;
        assert!(body.contains("/lambdaexp/{number}"));
        assert!(body.contains("/healthz"));
    }

    #[test]
    fn test_405_has_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_options_with_cors() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), 204);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }

    #[test]
    fn test_options_without_cors() {
        let resp = build_options_response(false);
        assert_eq!(resp.status(), 204);
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }
}
