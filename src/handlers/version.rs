//! Version information endpoint handler.

use crate::{
    models::VersionResponse,
    utils::build_info::{BUILD_TIMESTAMP, GIT_SHA, VERSION},
};
use actix_web::web;

/// Version information endpoint
///
/// Returns the current version, commit hash, and build time.
pub async fn version() -> web::Json<VersionResponse> {
    web::Json(VersionResponse {
        version: VERSION.to_string(),
        commit: GIT_SHA.to_string(),
        build_time: BUILD_TIMESTAMP.to_string(),
    })
}
