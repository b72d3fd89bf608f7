//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers that may carry the original client address, most trusted first
const CLIENT_IP_HEADERS: [&str; 4] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP", // Cloudflare
    "Forwarded-For",
];

/// Extract client IP address from request headers
///
/// Takes the first address of the first proxy header present, falling back
/// to the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| req.headers().get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| raw.split(',').next().map(str::trim))
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            req.connection_info()
                .peer_addr()
                .unwrap_or("unknown")
                .to_string()
        })
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
