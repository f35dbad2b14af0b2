use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber for the binary
///
/// `RUST_LOG` wins when set; otherwise this crate logs at info.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eat_what=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
