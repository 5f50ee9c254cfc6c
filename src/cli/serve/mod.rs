//! The HTTP server: request loop and dispatch.
//!
//! Requests are handled one at a time on the accept thread; a personal
//! blog has no concurrency worth the locking. Every handler owns the
//! request and always responds, so a failed page still produces an
//! error page rather than a dropped connection.
//!
//! # Module Structure
//!
//! - [`pages`]: page handlers (post, archive, search, contact)
//! - [`response`]: tiny_http response helpers

mod pages;
mod response;

use crate::config::BlogConfig;
use crate::{debug, log};
use anyhow::{Result, anyhow};
use regex::Regex;
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::sync::LazyLock;
use tiny_http::{Method, Request, Server};
use url::form_urlencoded;

/// Slugs are lowercase ASCII, digits and hyphens; anything else in the
/// `p` parameter is rejected before it gets near a query.
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[a-z0-9-]+$").unwrap());

/// Bind and run the request loop. Never returns under normal
/// operation.
pub fn run(config: &BlogConfig, interface: Option<IpAddr>, port: Option<u16>) -> Result<()> {
    let addr = SocketAddr::new(
        interface.unwrap_or(config.serve.interface),
        port.unwrap_or(config.serve.port),
    );
    let server = Server::http(addr).map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    log!("serve"; "listening on http://{addr}");

    for request in server.incoming_requests() {
        debug!("serve"; "{} {}", request.method(), request.url());
        // A handler error means the response itself could not be sent;
        // the client is gone, the server is not.
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request failed: {e:#}");
        }
    }

    Ok(())
}

fn handle_request(mut request: Request, config: &BlogConfig) -> Result<()> {
    match request.method() {
        Method::Get => {
            let page = query_param(request.url(), "p");
            dispatch_get(request, config, page.as_deref())
        }
        Method::Post => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            dispatch_post(request, config, &body)
        }
        method => {
            let message = format!("{method} is not a supported method.");
            pages::serve_error(request, config, 405, "405 Method Not Allowed", &message)
        }
    }
}

fn dispatch_get(request: Request, config: &BlogConfig, page: Option<&str>) -> Result<()> {
    match page {
        None => pages::serve_post(request, config, None),
        Some("archive") => pages::serve_archive(request, config),
        Some("contact") => pages::serve_challenge(request, config, false),
        Some(slug) if SLUG_RE.is_match(slug) => pages::serve_post(request, config, Some(slug)),
        Some(_) => pages::serve_error(
            request,
            config,
            404,
            "404 Not Found",
            "The page you're requesting doesn't exist.",
        ),
    }
}

fn dispatch_post(request: Request, config: &BlogConfig, body: &str) -> Result<()> {
    if let Some(term) = form_value(body, "search") {
        return pages::serve_search(request, config, &term);
    }
    if let Some(answer) = form_value(body, "challenge") {
        return pages::check_challenge(request, config, &answer);
    }
    pages::serve_error(request, config, 400, "400 Bad Request", "Bad POST request.")
}

/// Extract a query-string parameter from a request URL.
fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    form_value(query, key)
}

/// Extract a key from urlencoded form data.
fn form_value(data: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(data.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
