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
    /// API key for the generative scoring oracle. Empty when unset; the
    /// oracle adapter rejects the request before making a call.
    pub gemini_api_key: String,
    /// Model name used for the `generateContent` endpoint.
    pub gemini_model: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".into()),
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

    pub fn set_gemini_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.gemini_api_key = value.into());
    }

    pub fn set_gemini_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.gemini_model = value.into());
    }
}
