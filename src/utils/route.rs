//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Extract the matched route pattern, so path parameters don't explode
/// metric label cardinality. Unmatched requests share one label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
