//! Request logging middleware.
//!
//! Runs inside `TraceLayer`, so it logs within the request span instead of
//! opening its own.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::PROCESS_TIME_HEADER;

/// Log request start and completion and report the handling time in the
/// `x-process-time` header (seconds).
pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let client_ip = client_ip(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info!(
        method = %method,
        uri = %uri,
        path = %path,
        client_ip = %client_ip,
        user_agent = %user_agent,
        "Request started"
    );

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&format_process_time(elapsed.as_secs_f64())) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}

/// Peer address when the server was started with connect info, `-` otherwise.
fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_process_time(seconds: f64) -> String {
    format!("{:.3}", seconds)
}
