//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

/// Send a rendered HTML page.
pub fn send_html(request: Request, status: u16, body: String) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", "text/html; charset=utf-8"));
    request.respond(response)?;
    Ok(())
}

/// Send a plain-text body, used when even the error template fails.
pub fn send_text(request: Request, status: u16, body: &str) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", "text/plain; charset=utf-8"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Header {
    Header::from_bytes(key.as_bytes(), value.as_bytes()).unwrap()
}
