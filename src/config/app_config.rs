use serde::Deserialize;

use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub langfuse: LangfuseConfig,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Tracing backend credentials and tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LangfuseConfig {
    pub public_key: String,
    pub secret_key: String,
    pub host: String,
    pub batch_size: usize,
    pub flush_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LangfuseConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            secret_key: String::new(),
            host: "https://cloud.langfuse.com".to_string(),
            batch_size: 16,
            flush_interval_secs: 5,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from optional files, `APP__`-prefixed environment
    /// variables, and the canonical environment variables of this server
    /// (`LANGFUSE_*`, `OPENAI_API_KEY`, `SERVER_HOST`/`SERVER_PORT`, `DEBUG`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("langfuse.secret_key", env("LANGFUSE_SECRET_KEY"))?
            .set_override_option("langfuse.public_key", env("LANGFUSE_PUBLIC_KEY"))?
            .set_override_option("langfuse.host", env("LANGFUSE_HOST"))?
            .set_override_option("openai.api_key", env("OPENAI_API_KEY"))?
            .set_override_option("openai.base_url", env("OPENAI_BASE_URL"))?
            .set_override_option("server.host", env("SERVER_HOST"))?
            .set_override_option("server.port", env("SERVER_PORT"))?;

        // DEBUG=true raises log verbosity, as in the original server
        if env("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            builder = builder.set_override("logging.level", "debug")?;
        }

        builder.build()?.try_deserialize()
    }

    /// Reject a configuration that is missing required credentials
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut missing = Vec::new();

        if self.langfuse.secret_key.is_empty() {
            missing.push("LANGFUSE_SECRET_KEY");
        }
        if self.langfuse.public_key.is_empty() {
            missing.push("LANGFUSE_PUBLIC_KEY");
        }
        if self.openai.api_key.is_empty() {
            missing.push("OPENAI_API_KEY");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::configuration(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.langfuse.host, "https://cloud.langfuse.com");
        assert_eq!(config.langfuse.batch_size, 16);
        assert_eq!(config.openai.timeout_secs, 60);
        assert!(config.openai.base_url.is_none());
    }

    #[test]
    fn test_validate_reports_missing_keys() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("LANGFUSE_SECRET_KEY"));
        assert!(message.contains("LANGFUSE_PUBLIC_KEY"));
        assert!(message.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let mut config = AppConfig::default();
        config.langfuse.secret_key = "sk-lf-test".to_string();
        config.langfuse.public_key = "pk-lf-test".to_string();
        config.openai.api_key = "sk-test".to_string();

        assert!(config.validate().is_ok());
    }
}
