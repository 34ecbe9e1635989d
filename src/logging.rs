//! Subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set and valid, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    filter_from(std::env::var("RUST_LOG").ok().as_deref(), default_directive)
}

fn filter_from(rust_log: Option<&str>, default_directive: &str) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

/// Install a fmt subscriber writing to stderr.
pub fn init(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(std::io::stderr)
        .init();
}
