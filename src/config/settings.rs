//! Application settings configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// When the ticket list is rendered from the snapshot versus the backend.
///
/// The original behavior — render a cached list when one exists and only
/// fetch when it is absent — trades freshness for perceived responsiveness
/// and offline tolerance. It stays the default, but as an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Render the persisted snapshot when present; fetch only without one.
    #[default]
    PreferCache,
    /// Always fetch, then overwrite the snapshot.
    PreferNetwork,
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the ticket service.
    pub server_url: String,
    /// Render policy for the ticket list.
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:7070".to_string(),
            refresh: RefreshPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server_url, "http://localhost:7070");
        assert_eq!(settings.refresh, RefreshPolicy::PreferCache);
    }

    #[test]
    fn test_refresh_defaults_when_absent_from_file() {
        let settings: Settings = toml::from_str(r#"server_url = "http://tickets.local""#).unwrap();
        assert_eq!(settings.refresh, RefreshPolicy::PreferCache);
    }

    #[test]
    fn test_refresh_policy_kebab_case() {
        let settings: Settings = toml::from_str(
            r#"
            server_url = "http://tickets.local"
            refresh = "prefer-network"
            "#,
        )
        .unwrap();
        assert_eq!(settings.refresh, RefreshPolicy::PreferNetwork);
    }
}
