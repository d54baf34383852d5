//! Subprocess execution.

pub mod interpreter;
pub mod whitelist;

pub use whitelist::{spawn_platform, CommandRunner, RecordingRunner, WhitelistedRunner, WHITELIST};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
