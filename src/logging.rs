use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Standard output carries the protocol, so
/// logs go to stderr. `RUST_LOG` wins over `level` when set.
pub fn init(level: &str) -> anyhow::Result<()> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(level)?,
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(false)
		.with_target(true)
		.try_init()
		.map_err(|e| anyhow::anyhow!(e))?;

	tracing::trace!("logging initialized: level={}", level);

	Ok(())
}
