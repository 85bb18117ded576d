/*!
 * Simulator Configuration
 *
 * Runtime configuration resolved from environment variables
 */

use super::errors::ConfigError;
use super::limits::{DEFAULT_INIT_PRIORITY, DEFAULT_INIT_PROGRAM, DEFAULT_PROGRAM_DIR};
use crate::process::Priority;
use crate::reporting::ReportFormat;
use std::path::PathBuf;

/// Environment variable naming the bootstrap program
pub const ENV_INIT_PROGRAM: &str = "SIM_INIT_PROGRAM";
/// Environment variable naming the directory programs are loaded from
pub const ENV_PROGRAM_DIR: &str = "SIM_PROGRAM_DIR";
/// Environment variable setting the bootstrap priority (0-3)
pub const ENV_INIT_PRIORITY: &str = "SIM_INIT_PRIORITY";
/// Environment variable selecting `text` or `json` reports
pub const ENV_REPORT_FORMAT: &str = "SIM_REPORT_FORMAT";
/// Environment variable enabling JSON log output
pub const ENV_TRACE_JSON: &str = "SIM_TRACE_JSON";

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Program loaded into process 0
    pub init_program: String,
    /// Directory relative program names are resolved against
    pub program_dir: PathBuf,
    /// Priority of process 0
    pub init_priority: Priority,
    /// Rendering used for `P` snapshots
    pub report_format: ReportFormat,
    /// Emit logs as JSON instead of compact text
    pub trace_json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            init_program: DEFAULT_INIT_PROGRAM.to_string(),
            program_dir: PathBuf::from(DEFAULT_PROGRAM_DIR),
            init_priority: Priority::new_unchecked(DEFAULT_INIT_PRIORITY),
            report_format: ReportFormat::Text,
            trace_json: false,
        }
    }
}

impl SimConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(program) = lookup(ENV_INIT_PROGRAM).filter(|v| !v.trim().is_empty()) {
            config.init_program = program.trim().to_string();
        }

        if let Some(dir) = lookup(ENV_PROGRAM_DIR).filter(|v| !v.trim().is_empty()) {
            config.program_dir = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(ENV_INIT_PRIORITY) {
            config.init_priority = raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|p| Priority::try_from(p).ok())
                .ok_or_else(|| invalid(ENV_INIT_PRIORITY, &raw))?;
        }

        if let Some(raw) = lookup(ENV_REPORT_FORMAT) {
            config.report_format = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_REPORT_FORMAT, &raw))?;
        }

        config.trace_json = lookup(ENV_TRACE_JSON)
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        Ok(config)
    }

    /// Override the bootstrap program with the first positional argument
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(program) = args.into_iter().next() {
            self.init_program = program;
        }
        self
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = SimConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.init_program, "init");
        assert_eq!(config.init_priority.get(), 0);
    }

    #[test]
    fn test_environment_overrides() {
        let config = SimConfig::from_lookup(lookup_from(&[
            (ENV_INIT_PROGRAM, "boot"),
            (ENV_PROGRAM_DIR, "/tmp/programs"),
            (ENV_INIT_PRIORITY, "3"),
            (ENV_REPORT_FORMAT, "json"),
            (ENV_TRACE_JSON, "true"),
        ]))
        .unwrap();

        assert_eq!(config.init_program, "boot");
        assert_eq!(config.program_dir, PathBuf::from("/tmp/programs"));
        assert_eq!(config.init_priority.get(), 3);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert!(config.trace_json);
    }

    #[test]
    fn test_out_of_range_priority_rejected() {
        let err = SimConfig::from_lookup(lookup_from(&[(ENV_INIT_PRIORITY, "4")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_INIT_PRIORITY.into(),
                value: "4".into()
            }
        );
    }

    #[test]
    fn test_unknown_report_format_rejected() {
        assert!(SimConfig::from_lookup(lookup_from(&[(ENV_REPORT_FORMAT, "xml")])).is_err());
    }

    #[test]
    fn test_positional_argument_overrides_init_program() {
        let config = SimConfig::default().with_args(vec!["other".to_string()]);
        assert_eq!(config.init_program, "other");
    }
}
