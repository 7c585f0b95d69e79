/// simplelog wiring for the `log` facade: terminal output plus an optional time-stamped log file
pub mod logger;
/// nom parser for the `key: value` settings documents read by `SolverSettings::from_document`
pub mod settings_parser;
