//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Base URL of the remote code-execution service.
    pub execution_base_url: String,
    /// Compile-phase timeout forwarded to the execution service, in milliseconds.
    pub execution_compile_timeout_ms: u64,
    /// Run-phase timeout forwarded to the execution service, in milliseconds.
    pub execution_run_timeout_ms: u64,
    /// Total HTTP timeout for one execution request, in seconds.
    pub execution_http_timeout_secs: u64,
    pub ai_base_url: String,
    pub ai_model: String,
    pub ai_api_key: String,
    /// Base URL of the remote progress-persistence service.
    pub progress_base_url: String,
    /// Bearer token attached to progress-service calls. May be empty; the
    /// service's rejection is then handled as a normal failure.
    pub auth_token: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. Remote
    /// endpoints default to their public hosts so a bare environment still
    /// produces a usable config.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "exercise-core".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "session=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "session.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            execution_base_url: env::var("EXECUTION_BASE_URL")
                .unwrap_or_else(|_| "https://emkc.org/api/v2/piston".into()),
            execution_compile_timeout_ms: env::var("EXECUTION_COMPILE_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".into())
                .parse()
                .unwrap_or(10_000),
            execution_run_timeout_ms: env::var("EXECUTION_RUN_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap_or(3_000),
            execution_http_timeout_secs: env::var("EXECUTION_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            ai_base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            ai_api_key: env::var("AI_API_KEY").unwrap_or_default(),
            progress_base_url: env::var("PROGRESS_BASE_URL").unwrap_or_default(),
            auth_token: env::var("AUTH_TOKEN").unwrap_or_default(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_file(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_file = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_execution_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.execution_base_url = value.into());
    }

    pub fn set_execution_compile_timeout_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.execution_compile_timeout_ms = value);
    }

    pub fn set_execution_run_timeout_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.execution_run_timeout_ms = value);
    }

    pub fn set_execution_http_timeout_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.execution_http_timeout_secs = value);
    }

    pub fn set_ai_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.ai_base_url = value.into());
    }

    pub fn set_ai_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.ai_model = value.into());
    }

    pub fn set_ai_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.ai_api_key = value.into());
    }

    pub fn set_progress_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.progress_base_url = value.into());
    }

    pub fn set_auth_token(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.auth_token = value.into());
    }
}

// --- Convenience accessors for the most commonly read values ---

pub fn execution_base_url() -> String {
    AppConfig::global().execution_base_url.clone()
}

pub fn execution_compile_timeout_ms() -> u64 {
    AppConfig::global().execution_compile_timeout_ms
}

pub fn execution_run_timeout_ms() -> u64 {
    AppConfig::global().execution_run_timeout_ms
}

pub fn execution_http_timeout_secs() -> u64 {
    AppConfig::global().execution_http_timeout_secs
}

pub fn ai_base_url() -> String {
    AppConfig::global().ai_base_url.clone()
}

pub fn ai_model() -> String {
    AppConfig::global().ai_model.clone()
}

pub fn ai_api_key() -> String {
    AppConfig::global().ai_api_key.clone()
}

pub fn progress_base_url() -> String {
    AppConfig::global().progress_base_url.clone()
}

pub fn auth_token() -> String {
    AppConfig::global().auth_token.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_env() {
        let cfg = AppConfig::from_env();
        assert!(!cfg.execution_base_url.is_empty());
        assert!(cfg.execution_run_timeout_ms > 0);
        assert!(!cfg.ai_model.is_empty());
    }

    #[test]
    fn setters_override_global() {
        AppConfig::set_auth_token("test-token");
        assert_eq!(auth_token(), "test-token");
        AppConfig::set_auth_token("");
    }

    #[test]
    fn log_level_override_is_visible_through_accessor() {
        AppConfig::set_log_level("runner=debug");
        assert_eq!(log_level(), "runner=debug");
        AppConfig::set_log_level("session=info");
    }
}
