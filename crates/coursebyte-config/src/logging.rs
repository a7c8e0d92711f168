use crate::env_or;

/// Where rolling log files are written (`LOG_DIR`, default `storage/logs`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub directory: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            directory: env_or("LOG_DIR", "storage/logs".to_string()),
        }
    }
}
