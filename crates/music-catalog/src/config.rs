use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

const APP_NAME: &str = "music-catalog";
const CONFIG_FILE: &str = "config.json";

const ENV_KEY_ID: &str = "MUSIC_CATALOG_KEY_ID";
const ENV_TEAM_ID: &str = "MUSIC_CATALOG_TEAM_ID";
const ENV_TOKEN_SERVER: &str = "MUSIC_CATALOG_TOKEN_SERVER";
const ENV_AUTH_MODE: &str = "MUSIC_CATALOG_AUTH_MODE";
const ENV_DEBUG: &str = "MUSIC_CATALOG_DEBUG";

/// Which tokens a request chain tries to obtain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Developer token only
    #[default]
    Developer,
    /// Developer token upgraded to a user token through media authorization
    User,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "developer" | "dev" => Ok(Self::Developer),
            "user" => Ok(Self::User),
            other => anyhow::bail!("Unknown auth mode: {}", other),
        }
    }
}

/// Session configuration read by every catalog call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Key identifier of the MusicKit private key
    #[serde(default)]
    pub key_id: Option<String>,
    /// Developer team identifier
    #[serde(default)]
    pub team_id: Option<String>,
    /// Address of the server that signs developer tokens
    #[serde(default)]
    pub token_server: Option<String>,
    #[serde(default)]
    pub auth_mode: AuthMode,
    /// Emit request and outcome events at info level instead of debug
    #[serde(default)]
    pub debug: bool,
}

/// The three fields the token server needs, all known to be non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenServerCredentials<'a> {
    pub key_id: &'a str,
    pub team_id: &'a str,
    pub token_server: &'a str,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SessionConfig {
    /// Creates a developer-mode configuration
    pub fn new(
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        token_server: impl Into<String>,
    ) -> Self {
        Self {
            key_id: Some(key_id.into()),
            team_id: Some(team_id.into()),
            token_server: Some(token_server.into()),
            ..Self::default()
        }
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the token server credentials, or `None` if any is missing or empty
    pub fn credentials(&self) -> Option<TokenServerCredentials<'_>> {
        Some(TokenServerCredentials {
            key_id: present(&self.key_id)?,
            team_id: present(&self.team_id)?,
            token_server: present(&self.token_server)?,
        })
    }

    /// Builds a configuration from `MUSIC_CATALOG_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Builds a configuration from variables returned by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Overrides fields with values returned by `lookup`
    ///
    /// Only variables that are set replace the current value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_KEY_ID) {
            self.key_id = Some(v);
        }
        if let Some(v) = lookup(ENV_TEAM_ID) {
            self.team_id = Some(v);
        }
        if let Some(v) = lookup(ENV_TOKEN_SERVER) {
            self.token_server = Some(v);
        }
        if let Some(v) = lookup(ENV_AUTH_MODE) {
            self.auth_mode = v
                .parse()
                .with_context(|| format!("Invalid {}", ENV_AUTH_MODE))?;
        }
        if let Some(v) = lookup(ENV_DEBUG) {
            self.debug = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

/// Configuration manager
///
/// Holds the session configuration behind a lock so it can be initialized
/// after clients have been created.
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: RwLock<SessionConfig>,
}

impl ConfigManager {
    /// Creates a manager holding `config`
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Loads `config.json` from the user config directory, then applies
    /// environment overrides
    ///
    /// A missing file yields the default (unconfigured) session.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_dir()?.join(CONFIG_FILE), env_var)
    }

    /// Loads `config_file` if it exists, then applies overrides from `lookup`
    pub fn load_from<F>(config_file: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if config_file.exists() {
            Self::read_file(config_file)?
        } else {
            SessionConfig::default()
        };
        config.apply_env(lookup)?;

        Ok(Self::new(config))
    }

    /// Loads configuration from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(Self::read_file(path)?))
    }

    fn read_file(path: &Path) -> Result<SessionConfig> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data).context("Failed to parse config file")
    }

    /// Gets a copy of the current configuration
    pub fn get(&self) -> SessionConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the configuration
    pub fn set(&self, config: SessionConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Mutates the configuration in place
    pub fn update<F: FnOnce(&mut SessionConfig)>(&self, f: F) {
        f(&mut self.config.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Writes the current configuration to a JSON file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.get()).context("Failed to serialize config")?;
        std::fs::write(path, json).context("Failed to write config file")?;
        Ok(())
    }

    /// Returns the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_NAME))
    }
}

static GLOBAL: OnceLock<Arc<ConfigManager>> = OnceLock::new();

/// Returns the process-wide configuration manager
pub fn global() -> Arc<ConfigManager> {
    GLOBAL.get_or_init(Arc::default).clone()
}

/// Initializes the process-wide session with the token server credentials
///
/// Must run before any catalog call made through [`global`]; until then every
/// call fails as unauthorized. Auth mode and debug flag keep their values.
pub fn initialize(
    key_id: impl Into<String>,
    team_id: impl Into<String>,
    token_server: impl Into<String>,
) {
    let (key_id, team_id, token_server) = (key_id.into(), team_id.into(), token_server.into());
    global().update(|config| {
        config.key_id = Some(key_id);
        config.team_id = Some(team_id);
        config.token_server = Some(token_server);
    });
}

/// Sets the process-wide auth mode
pub fn set_auth_mode(auth_mode: AuthMode) {
    global().update(|config| config.auth_mode = auth_mode);
}

/// Sets the process-wide debug flag
pub fn set_debug(debug: bool) {
    global().update(|config| config.debug = debug);
}
