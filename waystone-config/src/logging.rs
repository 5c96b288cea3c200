use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub timestamp: bool,
    pub color: bool,
    /// Also write the log to this file when set.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timestamp: true,
            color: true,
            file: None,
        }
    }
}
