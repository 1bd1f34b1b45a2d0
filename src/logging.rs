use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::errors::ConfigError;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} [{t}] {m}{n}";

/// Builds and installs the process-wide logger from `[general]` config,
/// mirroring `mygrid_scheduler`'s `logging::setup_logger` (referenced from
/// its `main.rs` as `mod logging;`): a rolling file appender always runs,
/// with an optional console appender layered in for interactive use.
///
/// # Arguments
///
/// * 'log_path' - path of the log file to append to
/// * 'log_level' - minimum level passed through to the appenders
/// * 'log_to_stdout' - whether to also attach a console appender
pub fn setup_logger(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<log4rs::Handle, ConfigError> {
    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(log_path)?;

    let mut builder = LogConfig::builder().appender(Appender::builder().build("file", Box::new(file_appender)));
    let mut root_builder = Root::builder().appender("file");

    if log_to_stdout {
        let console_appender = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(PATTERN))).build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(console_appender)));
        root_builder = root_builder.appender("stdout");
    }

    let config = builder.build(root_builder.build(log_level))?;

    let handle = log4rs::init_config(config)?;
    Ok(handle)
}
