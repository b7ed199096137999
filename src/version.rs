// Package identity, used for the startup banner and outbound User-Agent

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `apm-relay/<version>`, sent on every APM and HEC request.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
