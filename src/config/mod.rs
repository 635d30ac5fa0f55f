mod app_config;

pub use app_config::{AppConfig, LangfuseConfig, LogFormat, LoggingConfig, OpenAiConfig, ServerConfig};
