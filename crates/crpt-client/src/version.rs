//! Version information for crpt-client.

/// crpt-client version from Cargo.toml
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent with every registration request.
pub fn user_agent() -> String {
    format!("crpt-client/{}", CLIENT_VERSION)
}
