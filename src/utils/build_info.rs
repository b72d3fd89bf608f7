//! Build metadata emitted by the build script.

/// Short git commit hash, or `unknown` outside a git checkout
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
