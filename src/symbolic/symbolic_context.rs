//! Call-local solver state: recursion depth, step counter, step log and settings.
//!
//! Every top-level `integrate`/`diff`/ODE call builds its own `SolverContext`, so independent
//! calls never share counters and the engine can be used from several threads at once. Callers
//! that want to inspect the trace, or to tune the ceilings, create a context themselves and use
//! the `*_with` entry points.

use crate::Utils::settings_parser::{SettingValue, parse_settings_document};
use crate::symbolic::symbolic_error::SymbolicError;
use log::{debug, warn};

/// Tunable limits of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    /// nested integrate calls allowed before the sentinel is returned unconditionally
    pub max_depth: usize,
    /// rewrite-loop ceiling; a safety net for rule sets that do not converge
    pub max_rewrite_iterations: usize,
    /// keep `TraceStep` records in memory (the log macros fire either way)
    pub record_trace: bool,
    /// log level used by the demo binary when it sets up logging
    pub loglevel: Option<String>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            max_depth: 20,
            max_rewrite_iterations: 10_000,
            record_trace: true,
            loglevel: Some("info".to_string()),
        }
    }
}

impl SolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn set_max_rewrite_iterations(mut self, iterations: usize) -> Self {
        self.max_rewrite_iterations = iterations;
        self
    }

    pub fn set_record_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn set_loglevel(mut self, loglevel: Option<String>) -> Self {
        self.loglevel = loglevel;
        self
    }

    /// Reads settings from a document like
    /// ```text
    /// solver
    /// max_depth: 12
    /// loglevel: debug
    /// ```
    /// Keys not present keep their default value.
    pub fn from_document(document: &str) -> Result<Self, SymbolicError> {
        let parsed = parse_settings_document(document)?;
        let mut settings = SolverSettings::default();
        let Some(section) = parsed.get("solver") else {
            return Ok(settings);
        };
        for (key, value) in section {
            let invalid = || SymbolicError::InvalidSetting {
                key: key.clone(),
                value: value.to_string(),
            };
            match key.as_str() {
                "max_depth" => {
                    settings.max_depth = value.as_usize().ok_or_else(invalid)?;
                }
                "max_rewrite_iterations" => {
                    settings.max_rewrite_iterations = value.as_usize().ok_or_else(invalid)?;
                }
                "record_trace" => {
                    settings.record_trace = value.as_boolean().ok_or_else(invalid)?;
                }
                "loglevel" => {
                    settings.loglevel = match value {
                        SettingValue::String(level) if level == "none" => None,
                        SettingValue::String(level) => Some(level.clone()),
                        _ => return Err(invalid()),
                    };
                }
                _ => return Err(invalid()),
            }
        }
        Ok(settings)
    }
}

/// One observed engine event.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    pub step: usize,
    pub depth: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct SolverContext {
    pub settings: SolverSettings,
    depth: usize,
    steps: usize,
    trace: Vec<TraceStep>,
}

impl SolverContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SolverSettings) -> Self {
        SolverContext {
            settings,
            ..Self::default()
        }
    }

    /// zero the counters and drop the log, keep the settings
    pub fn reset(&mut self) {
        self.depth = 0;
        self.steps = 0;
        self.trace.clear();
    }

    pub fn push_depth(&mut self) -> usize {
        self.depth += 1;
        self.depth
    }

    /// no-op at depth zero
    pub fn pop_depth(&mut self) -> usize {
        self.depth = self.depth.saturating_sub(1);
        self.depth
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn depth_exceeded(&self) -> bool {
        if self.depth > self.settings.max_depth {
            warn!(
                "recursion depth {} exceeds ceiling {}",
                self.depth, self.settings.max_depth
            );
            true
        } else {
            false
        }
    }

    /// Counts a step and records it. `message` is only built when the step is actually kept
    /// or when debug logging is on.
    pub fn log_step<F: FnOnce() -> String>(&mut self, message: F) {
        self.steps += 1;
        if self.settings.record_trace || log::log_enabled!(log::Level::Debug) {
            let message = message();
            debug!("[{}|depth {}] {}", self.steps, self.depth, message);
            if self.settings.record_trace {
                self.trace.push(TraceStep {
                    step: self.steps,
                    depth: self.depth,
                    message,
                });
            }
        }
    }

    /// Counts a rewrite without building a message.
    pub fn count_step(&mut self) {
        self.steps += 1;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_never_negative() {
        let mut ctx = SolverContext::new();
        assert_eq!(ctx.pop_depth(), 0);
        assert_eq!(ctx.push_depth(), 1);
        assert_eq!(ctx.push_depth(), 2);
        assert_eq!(ctx.pop_depth(), 1);
        assert_eq!(ctx.pop_depth(), 0);
        assert_eq!(ctx.pop_depth(), 0);
    }

    #[test]
    fn test_depth_exceeded_after_ceiling() {
        let mut ctx = SolverContext::with_settings(SolverSettings::new().set_max_depth(2));
        ctx.push_depth();
        ctx.push_depth();
        assert!(!ctx.depth_exceeded());
        ctx.push_depth();
        assert!(ctx.depth_exceeded());
    }

    #[test]
    fn test_log_and_reset() {
        let mut ctx = SolverContext::new();
        ctx.push_depth();
        ctx.log_step(|| "direct rules".to_string());
        ctx.count_step();
        assert_eq!(ctx.steps(), 2);
        assert_eq!(
            ctx.trace(),
            &[TraceStep {
                step: 1,
                depth: 1,
                message: "direct rules".to_string()
            }]
        );
        ctx.reset();
        assert_eq!(ctx.steps(), 0);
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.trace().is_empty());
    }

    #[test]
    fn test_trace_recording_can_be_disabled() {
        let mut ctx = SolverContext::with_settings(SolverSettings::new().set_record_trace(false));
        ctx.log_step(|| "not kept".to_string());
        assert_eq!(ctx.steps(), 1);
        assert!(ctx.trace().is_empty());
    }

    #[test]
    fn test_settings_from_document() {
        let document = "solver\nmax_depth: 12\nrecord_trace: false\nloglevel: debug\n";
        let settings = SolverSettings::from_document(document).unwrap();
        assert_eq!(settings.max_depth, 12);
        assert!(!settings.record_trace);
        assert_eq!(settings.loglevel, Some("debug".to_string()));
        assert_eq!(settings.max_rewrite_iterations, 10_000);
    }

    #[test]
    fn test_settings_reject_unknown_key() {
        let document = "solver\nmax_dept: 12\n";
        assert!(matches!(
            SolverSettings::from_document(document),
            Err(SymbolicError::InvalidSetting { .. })
        ));
        let document = "solver\nmax_depth: deep\n";
        assert!(SolverSettings::from_document(document).is_err());
    }
}
