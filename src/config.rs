//! Layered settings
//!
//! Values are resolved in this order, later layers winning:
//! built-in defaults, the optional TOML config file, environment variables
//! (`GHE_URL`, `MP_USER`, `MP_PASSWORD`), then command-line flags applied by
//! the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::github::client::DEFAULT_API_BASE_URL;
use crate::types::{SERVICE_NAME, Secret, Username};

/// Alternate API base, for GitHub Enterprise installations
pub const ENV_API_BASE_URL: &str = "GHE_URL";
/// Username override, also used as keychain account
pub const ENV_USER: &str = "MP_USER";
/// Token override; only honored together with `MP_USER`
pub const ENV_PASSWORD: &str = "MP_PASSWORD";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub service_name: Option<String>,
}

impl FileSettings {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Credential-related settings handed to the auth handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub service_name: String,
    pub user_override: Option<Username>,
    pub password_override: Option<Secret>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            user_override: None,
            password_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
    pub auth: AuthSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
            auth: AuthSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the config file and the process environment.
    ///
    /// An explicit `config_path` must exist. Without one the default location
    /// is read only if present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_settings = match config_path {
            Some(path) => Some(FileSettings::from_path(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(FileSettings::from_path(&path)?),
                _ => None,
            },
        };

        let mut settings = Self::default();
        if let Some(file_settings) = file_settings {
            settings.apply_file(file_settings);
        }
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;

        Ok(settings)
    }

    pub fn apply_file(&mut self, file_settings: FileSettings) {
        if let Some(api_base_url) = file_settings.api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(secs) = file_settings.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(service_name) = file_settings.service_name {
            self.auth.service_name = service_name;
        }
    }

    /// Applies environment overrides read through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(api_base_url) = non_empty(ENV_API_BASE_URL) {
            self.api_base_url = api_base_url;
        }
        if let Some(user) = non_empty(ENV_USER) {
            self.auth.user_override = Some(Username::from(user));
        }
        if let Some(password) = non_empty(ENV_PASSWORD) {
            self.auth.password_override = Some(Secret::from(password));
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must use http or https: {}", self.api_base_url);
        }
        if self.auth.service_name.is_empty() {
            anyhow::bail!("Keychain service name must not be empty");
        }
        Ok(())
    }
}

/// `<config dir>/monopoly/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("monopoly").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.auth.service_name, "monopoly-CLI");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(lookup_from(&[
            ("GHE_URL", "https://ghe.example.com/api/v3"),
            ("MP_USER", "alice"),
            ("MP_PASSWORD", "tok123"),
        ]));

        assert_eq!(settings.api_base_url, "https://ghe.example.com/api/v3");
        assert_eq!(settings.auth.user_override, Some(Username::from("alice")));
        assert_eq!(settings.auth.password_override, Some(Secret::from("tok123")));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(lookup_from(&[("GHE_URL", ""), ("MP_USER", "")]));

        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.auth.user_override, None);
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_base_url = \"https://ghe.internal/api/v3\"\nrequest_timeout_secs = 20\nservice_name = \"monopoly-test\""
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.apply_file(FileSettings::from_path(file.path()).unwrap());
        assert_eq!(settings.api_base_url, "https://ghe.internal/api/v3");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(20)));
        assert_eq!(settings.auth.service_name, "monopoly-test");

        settings.apply_env(lookup_from(&[("GHE_URL", "https://other.example.com")]));
        assert_eq!(settings.api_base_url, "https://other.example.com");
    }

    #[test]
    fn test_unknown_config_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "token = \"should-not-live-here\"").unwrap();

        assert!(FileSettings::from_path(file.path()).is_err());
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let settings = Settings {
            api_base_url: "ftp://example.com".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            api_base_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
