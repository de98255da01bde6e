use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages are printed as well; otherwise
/// only info and above. `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    match builder.try_init() {
        Ok(()) => log::debug!("logger initialised at {level}"),
        // A second call finds a logger already installed
        Err(err) => log::debug!("logger already initialised: {err}"),
    }
}
