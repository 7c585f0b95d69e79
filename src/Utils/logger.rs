//! Logging setup for the binary and for ad hoc debugging sessions.
//!
//! The library itself only talks to the `log` facade. This module connects the facade to
//! `simplelog`: a terminal logger and, on request, a file logger writing to
//! `log_<date>_<time>.txt` in the working directory.

use crate::symbolic::symbolic_error::SymbolicError;
use chrono::Local;
use simplelog::*;
use std::fs::File;

/// Maps a level name to a filter. `None` means "info".
pub fn level_from_str(loglevel: Option<&str>) -> Result<LevelFilter, SymbolicError> {
    let Some(level) = loglevel else {
        return Ok(LevelFilter::Info);
    };
    match level {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        _ => Err(SymbolicError::InvalidSetting {
            key: "loglevel".to_string(),
            value: level.to_string(),
        }),
    }
}

/// Installs the global logger. A second call keeps the first logger and reports the refusal
/// at `debug` level through it.
pub fn init_logger(loglevel: Option<String>, log_to_file: bool) -> Result<(), SymbolicError> {
    let level = level_from_str(loglevel.as_deref())?;
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(err) => eprintln!("cannot create log file {}: {}", name, err),
        }
    }
    if let Err(err) = CombinedLogger::init(loggers) {
        log::debug!("logger already installed, keeping it: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_from_str(None).unwrap(), LevelFilter::Info);
        assert_eq!(level_from_str(Some("debug")).unwrap(), LevelFilter::Debug);
        assert_eq!(level_from_str(Some("none")).unwrap(), LevelFilter::Off);
        assert!(matches!(
            level_from_str(Some("loud")),
            Err(SymbolicError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_off_installs_nothing() {
        assert!(init_logger(Some("off".to_string()), true).is_ok());
    }

    #[test]
    fn test_second_install_keeps_first_logger() {
        assert!(init_logger(Some("error".to_string()), false).is_ok());
        assert!(init_logger(Some("error".to_string()), false).is_ok());
        assert!(log::max_level() >= LevelFilter::Error);
    }
}
