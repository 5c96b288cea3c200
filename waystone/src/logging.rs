use std::fs::File;
use std::str::FromStr;

use log::{Level, LevelFilter};
use simplelog::{CombinedLogger, SharedLogger, SimpleLogger, WriteLogger};
use waystone_config::LoggingConfig;

/// Initializes the global logger from the logging config section. Level
/// comes from `RUST_LOG`, defaulting to info. A no-op when logging is
/// disabled or when the embedding host already installed a logger.
pub fn init(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }

    let mut builder = simplelog::ConfigBuilder::new();

    if config.timestamp {
        builder.set_time_format_custom(time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ));
        builder.set_time_level(LevelFilter::Trace);
    } else {
        builder.set_time_level(LevelFilter::Off);
    }

    if !config.color {
        for level in Level::iter() {
            builder.set_level_color(level, None);
        }
    }

    let level = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(LevelFilter::from_str)
        .and_then(Result::ok)
        .unwrap_or(LevelFilter::Info);

    let simplelog_config = builder.build();

    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![SimpleLogger::new(level, simplelog_config.clone())];

    if let Some(path) = &config.file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, simplelog_config, file)),
            Err(e) => eprintln!("Could not open log file {path}: {e}"),
        }
    }

    // Err here means a logger is already installed; keep the host's.
    let _ = CombinedLogger::init(loggers);
}
