//! Tracing subscriber setup for the `manage` binary

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises the level to `debug` and
/// `-vv` to `trace`; without flags the `log_level` setting applies.
pub fn init_tracing(log_level: &str, verbosity: u8) {
	let default_level = match verbosity {
		0 => log_level,
		1 => "debug",
		_ => "trace",
	};

	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.or_else(|_| EnvFilter::try_new(default_level))
				.unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.try_init();
}
