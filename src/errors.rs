use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

use crate::label::Label;

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing config toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("error building log4rs config: {0}")]
    Log4rs(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("error installing global logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Error depicting a violated invariant detected during a solve. Under
/// correct construction this can never happen (spec.md §7 treats it as a
/// programming defect, not a recoverable condition), so it carries a
/// snapshot of the offending label for post-mortem logging rather than a
/// retryable payload.
///
pub struct SchedulerDefect {
    msg: String,
    label: Option<Label>,
}

impl SchedulerDefect {
    pub fn new(msg: impl Into<String>) -> SchedulerDefect {
        SchedulerDefect { msg: msg.into(), label: None }
    }

    pub fn with_label(msg: impl Into<String>, label: &Label) -> SchedulerDefect {
        SchedulerDefect { msg: msg.into(), label: Some(label.clone()) }
    }
}

impl fmt::Display for SchedulerDefect {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SchedulerDefect: {}", self.msg)?;
        if let Some(label) = &self.label {
            write!(
                f,
                "\n  at label: act={} time={} utility={:.3}",
                label.act_id, label.time, label.utility
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for SchedulerDefect {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for SchedulerDefect {}
