//! Request router module
//!
//! Entry point for request processing: method validation, transport guards,
//! route dispatch, and access logging.

use crate::config::AppState;
use crate::handler::lambdaexp;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context for route dispatch
struct RequestContext<'a> {
    path: &'a str,
    is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// The hyper service seam stays async even though dispatch itself is
/// synchronous today.
#[allow(clippy::unused_async)]
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version());
    entry.referer = header_string(req.headers(), "referer");
    entry.user_agent = header_string(req.headers(), "user-agent");

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = dispatch(&req, &state);
    stamp_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

/// Transport guards, then route dispatch
fn dispatch(req: &Request<hyper::body::Incoming>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(response) = check_http_method(req.method(), state.config.http.enable_cors) {
        return response;
    }

    if let Some(response) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return response;
    }

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *req.method() == Method::HEAD,
    };
    route_request(&ctx, state)
}

/// Validate the HTTP method
///
/// GET and HEAD pass through; OPTIONS is answered inline; everything else
/// is refused with 405 and an Allow header.
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Reject requests whose declared Content-Length exceeds the limit
///
/// A malformed Content-Length is left for hyper's framing layer to refuse.
fn check_body_size(
    headers: &hyper::header::HeaderMap,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let declared = headers
        .get("content-length")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;
    if declared > max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {declared} bytes (limit {max_body_size})"
        ));
        return Some(http::build_413_response());
    }
    None
}

/// Route the request based on path and configuration
fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let health = &state.config.health;

    // Health probes take priority over everything else
    if health.enabled {
        if ctx.path == health.liveness_path {
            return http::build_health_response("ok", ctx.is_head);
        }
        if ctx.path == health.readiness_path {
            // Readiness has no dependencies to check in this service
            return http::build_health_response("ok", ctx.is_head);
        }
    }

    if let Some(raw_segment) = routing::extract_param(ctx.path, lambdaexp::ROUTE_PREFIX) {
        return lambdaexp::serve(raw_segment, &state.config.http, ctx.is_head);
    }

    http::build_404_response(&available_endpoints(state))
}

/// Paths advertised in 404 bodies
fn available_endpoints(state: &AppState) -> Vec<&str> {
    let mut endpoints = vec!["/lambdaexp/{number}"];
    if state.config.health.enabled {
        endpoints.push(state.config.health.liveness_path.as_str());
        endpoints.push(state.config.health.readiness_path.as_str());
    }
    endpoints
}

/// Stamp the configured Server header on every response
fn stamp_server_header(response: &mut Response<Full<Bytes>>, server_name: &str) {
    if let Ok(value) = hyper::header::HeaderValue::from_str(server_name) {
        response.headers_mut().insert("server", value);
    }
}

/// Extract an optional request header as an owned string
fn header_string(headers: &hyper::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Version label for access log entries
///
/// `hyper::Version` debug-formats as e.g. "HTTP/1.1"; the entry stores
/// just the "1.1" part.
fn version_label(version: hyper::Version) -> String {
    let label = format!("{version:?}");
    match label.strip_prefix("HTTP/") {
        Some(v) => v.to_string(),
        None => label,
    }
}
