use std::env;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Environment variable holding comma separated field names to ignore.
///
/// The names extend the default ignore-list; `middleware` is always kept.
pub const IGNORE_ENV: &str = "AUTOBIND_IGNORE";
/// Environment variable selecting the [`LookupStrategy`].
pub const LOOKUP_ENV: &str = "AUTOBIND_LOOKUP";

/// How a marked field's model is fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LookupStrategy {
    /// Match the marker's column against the route value.
    #[default]
    Column,
    /// Fetch by identity, ignoring the marker's column.
    Identity,
}

/// Binder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    /// Field names never bound, even when marked.
    pub ignored: Vec<String>,
    pub strategy: LookupStrategy,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            ignored: vec!["middleware".to_string()],
            strategy: LookupStrategy::default(),
        }
    }
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `AUTOBIND_IGNORE` and `AUTOBIND_LOOKUP`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key/value source.
    pub fn from_source<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(list) = get(IGNORE_ENV) {
            for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                if !config.is_ignored(name) {
                    config.ignored.push(name.to_string());
                }
            }
        }

        if let Some(raw) = get(LOOKUP_ENV) {
            match LookupStrategy::from_str(raw.trim()) {
                Ok(strategy) => config.strategy = strategy,
                Err(_) => tracing::warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    LOOKUP_ENV,
                    raw,
                    config.strategy
                ),
            }
        }

        config
    }

    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignored.push(name.into());
        self
    }

    pub fn strategy(mut self, strategy: LookupStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored.iter().any(|name| name == field)
    }
}
