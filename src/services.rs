pub mod github;
pub mod platform;
pub mod runner;
pub mod server;
pub mod webhook;

pub use github::{GithubApp, GithubClient};
pub use platform::Platform;
pub use runner::{sweep, PassSummary, Runner};
pub use server::{router, serve, ServerState};
pub use webhook::{extract_target, verify_signature};
