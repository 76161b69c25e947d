use config::{Config, ConfigBuilder, ConfigError, Environment, File, Map, builder::DefaultState};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.slidesgpt.com/v1";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Bearer token for the SlidesGPT API.
    pub api_key: String,

    /// `TELEGRAM_BOT_TOKEN`, or the older `TG_TOKEN` when only that one is set.
    pub telegram_bot_token: Option<String>,

    #[serde(default)]
    tg_token: Option<String>,

    /// Chat that gets a notice whenever somebody generates a deck.
    #[serde(alias = "admin_id")]
    pub admin_chat_id: Option<i64>,

    pub api_url: String,

    /// Output format requested from the API and used as the artifact extension.
    pub format: String,

    /// Retention window in minutes. Also the sweep interval.
    pub cleanup_minutes: u64,

    pub download_dir: String,

    pub download_attempts: u32,

    pub poll_interval_secs: u64,

    #[serde(skip)]
    pub project_root: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // 1. Try standard dotenv discovery from current dir
        if dotenvy::dotenv().is_err() {
            // 2. Fallback: Try explicitly from resolved DECKBOT_ROOT
            let path = crate::path_utils::get_app_root().join(".env");
            if path.exists() {
                let _ = dotenvy::from_path(&path);
            }
        }

        let builder = Self::defaults()?
            .add_source(File::with_name("deckbot").required(false))
            .add_source(Environment::default());

        Self::finish(builder)
    }

    /// Builds a config from an explicit set of variables instead of the process environment.
    pub fn from_env_map(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(Environment::default().source(Some(vars)));
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("format", "pptx")?
            .set_default("cleanup_minutes", 30)?
            .set_default("download_dir", "downloads")?
            .set_default("download_attempts", 3)?
            .set_default("poll_interval_secs", 10)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: Self = builder.build()?.try_deserialize()?;
        if let Some(legacy) = config.tg_token.take() {
            config.telegram_bot_token.get_or_insert(legacy);
        }
        config.validate()?;
        config.project_root = crate::path_utils::get_app_root();
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cleanup_minutes == 0 {
            return Err(ConfigError::Message("CLEANUP_MINUTES must be a positive number of minutes".into()));
        }
        if self.cleanup_minutes.checked_mul(60).is_none() {
            return Err(ConfigError::Message(format!(
                "CLEANUP_MINUTES is too large ({} minutes)",
                self.cleanup_minutes
            )));
        }
        if self.download_attempts == 0 {
            return Err(ConfigError::Message("DOWNLOAD_ATTEMPTS must be at least 1".into()));
        }
        if self.format.trim().is_empty() {
            return Err(ConfigError::Message("FORMAT must not be empty".into()));
        }
        Ok(())
    }

    /// Directory downloaded decks are written to and swept from.
    pub fn storage_dir(&self) -> PathBuf {
        crate::path_utils::resolve_under(&self.project_root, &self.download_dir)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.cleanup_minutes.saturating_mul(60))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_env_map(vars(&[("API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.format, "pptx");
        assert_eq!(config.cleanup_minutes, 30);
        assert_eq!(config.download_dir, "downloads");
        assert_eq!(config.download_attempts, 3);
        assert!(config.telegram_bot_token.is_none());
        assert!(config.admin_chat_id.is_none());
    }

    #[test]
    fn legacy_variable_names_are_accepted() {
        let config = AppConfig::from_env_map(vars(&[
            ("API_KEY", "sk-test"),
            ("TG_TOKEN", "123:abc"),
            ("ADMIN_ID", "-1001234"),
            ("CLEANUP_MINUTES", "5"),
            ("FORMAT", "pdf"),
        ]))
        .unwrap();

        assert_eq!(config.telegram_bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.admin_chat_id, Some(-1001234));
        assert_eq!(config.retention(), Duration::from_secs(300));
        assert_eq!(config.format, "pdf");
    }

    #[test]
    fn new_token_name_wins_over_the_legacy_one() {
        let config = AppConfig::from_env_map(vars(&[
            ("API_KEY", "k"),
            ("TG_TOKEN", "1:old"),
            ("TELEGRAM_BOT_TOKEN", "1:new"),
        ]))
        .unwrap();
        assert_eq!(config.telegram_bot_token.as_deref(), Some("1:new"));

        let same = AppConfig::from_env_map(vars(&[
            ("API_KEY", "k"),
            ("TG_TOKEN", "1:a"),
            ("TELEGRAM_BOT_TOKEN", "1:a"),
        ]))
        .unwrap();
        assert_eq!(same.telegram_bot_token.as_deref(), Some("1:a"));
    }

    #[test]
    fn retention_that_overflows_seconds_is_rejected() {
        let err = AppConfig::from_env_map(vars(&[
            ("API_KEY", "k"),
            ("CLEANUP_MINUTES", "18446744073709551615"),
        ]))
        .unwrap_err();
        assert!(err.to_string().to_lowercase().contains("cleanup_minutes"));

        let max = u64::MAX / 60;
        let config =
            AppConfig::from_env_map(vars(&[("API_KEY", "k"), ("CLEANUP_MINUTES", &max.to_string())])).unwrap();
        assert_eq!(config.retention(), Duration::from_secs(max * 60));
    }

    #[test]
    fn zero_retention_is_rejected() {
        let err = AppConfig::from_env_map(vars(&[("API_KEY", "k"), ("CLEANUP_MINUTES", "0")])).unwrap_err();
        assert!(err.to_string().contains("CLEANUP_MINUTES"));
    }

    #[test]
    fn missing_api_key_is_an_error() {
        assert!(AppConfig::from_env_map(vars(&[("FORMAT", "pptx")])).is_err());
    }

    #[test]
    fn relative_download_dir_resolves_under_project_root() {
        let mut config = AppConfig::from_env_map(vars(&[("API_KEY", "k"), ("DOWNLOAD_DIR", "decks")])).unwrap();
        config.project_root = PathBuf::from("/srv/deckbot");
        assert_eq!(config.storage_dir(), PathBuf::from("/srv/deckbot/decks"));

        config.download_dir = "/var/tmp/decks".into();
        assert_eq!(config.storage_dir(), PathBuf::from("/var/tmp/decks"));
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret("sk-abcdef1234"), "*********1234");
        assert_eq!(mask_secret("abc"), "***");
    }
}
