// ── Runtime service configuration ──
//
// Tunables for one acquisition service instance. The embedding application
// builds this and hands it to `LogService`; the core never reads files or
// environment variables on its own.

use std::time::Duration;

use crate::error::CoreError;

/// Configuration for the acquisition pipeline.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum number of log reads in flight at once.
    pub max_in_flight: usize,
    /// Per-read deadline; expiry counts as a failed fetch.
    pub fetch_timeout: Duration,
    /// Vendor identifier a discovered device must present.
    pub vendor_id: String,
    /// Accepted two-character model-name prefixes.
    pub model_prefixes: Vec<String>,
    /// Location of the error-log file relative to a controller's path.
    pub log_file_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            fetch_timeout: Duration::from_secs(30),
            // BACnet vendor id 10: Schneider Electric.
            vendor_id: "10".to_owned(),
            model_prefixes: vec!["MP".to_owned(), "RP".to_owned(), "IP".to_owned()],
            log_file_path: "Diagnostic Files/Error Log".to_owned(),
        }
    }
}

impl ServiceConfig {
    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_in_flight == 0 {
            return Err(invalid("max_in_flight must be at least 1"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(invalid("fetch_timeout must be non-zero"));
        }
        if self.vendor_id.is_empty() {
            return Err(invalid("vendor_id must not be empty"));
        }
        if self.model_prefixes.is_empty() {
            return Err(invalid("model_prefixes must not be empty"));
        }
        if self.log_file_path.is_empty() {
            return Err(invalid("log_file_path must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::InvalidConfig {
        message: message.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ServiceConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = ServiceConfig {
            max_in_flight: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn empty_model_prefixes_are_rejected() {
        let config = ServiceConfig {
            model_prefixes: Vec::new(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
