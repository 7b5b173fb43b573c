//! Tracing subscriber setup for the binary.

use crate::ports::config_port::ConfigPort;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            level: config
                .get_string("logging", "level")
                .unwrap_or(defaults.level),
            format: config
                .get_string("logging", "format")
                .map(|f| f.trim().to_lowercase())
                .unwrap_or(defaults.format),
        }
    }

    /// Installs the global subscriber on stderr. `RUST_LOG` overrides the
    /// configured level. Returns false when a subscriber was already
    /// installed; that one stays in place.
    pub fn init(&self) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

        let installed = match self.format.as_str() {
            "compact" => builder.compact().try_init(),
            _ => builder.try_init(),
        };
        match installed {
            Ok(()) => true,
            Err(e) => {
                debug!(reason = %e, "tracing subscriber already installed, keeping it");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_when_section_missing() {
        let config = LoggingConfig::from_config(&FileConfigAdapter::empty());
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn reads_level_and_format() {
        let adapter =
            FileConfigAdapter::from_string("[logging]\nlevel = gbce=debug\nformat = Compact\n")
                .unwrap();
        let config = LoggingConfig::from_config(&adapter);
        assert_eq!(config.level, "gbce=debug");
        assert_eq!(config.format, "compact");
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let config = LoggingConfig::default();
        config.init();
        assert!(!config.init());
    }
}
