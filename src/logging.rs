//! Process-wide logger for the runner and for tests that want output.

use log::LevelFilter;

/// Install `env_logger` at info, or debug when `verbose` is set.
///
/// Debug adds sensor toggles, phase timings and housekeeping snapshots.
/// Directives in `RUST_LOG` are applied on top. Calling this twice is
/// harmless; the second logger is discarded.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp_millis()
        .format_target(verbose);
    if builder.try_init().is_err() {
        log::debug!("Logger already installed");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn second_init_is_ignored() {
        super::init(false);
        super::init(true);
        log::info!("still logging");
    }
}
