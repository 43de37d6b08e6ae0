use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level. HTTP client
/// internals stay at `warn` either way.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive("hyper=warn".parse().unwrap_or_else(|_| Level::WARN.into()))
        .add_directive("hyper_util=warn".parse().unwrap_or_else(|_| Level::WARN.into()))
        .add_directive("reqwest=warn".parse().unwrap_or_else(|_| Level::WARN.into()))
        .add_directive("rustls=warn".parse().unwrap_or_else(|_| Level::WARN.into()));

    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
