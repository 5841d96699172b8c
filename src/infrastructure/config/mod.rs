use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Polling
    pub poll_interval_ms: u64,
    pub poll_max_attempts: Option<u32>,
    pub vendor_timeout_secs: u64,
    // Music vendors
    pub suno: SunoConfig,
    pub kie: KieConfig,
    pub musicgen: MusicGenConfig,
    pub mureka: MurekaConfig,
    // Text generation
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_tts_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SunoConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KieConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MusicGenConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MurekaConfig {
    pub rapidapi_key: Option<String>,
    pub account: Option<String>,
    pub base_url: String,
}

pub const DEFAULT_SUNO_BASE_URL: &str = "https://api.suno.ai/v1";
pub const DEFAULT_KIE_BASE_URL: &str = "https://api.kie.ai";
pub const DEFAULT_MUSICGEN_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MUREKA_BASE_URL: &str =
    "https://mureka-ai-music-generation.p.rapidapi.com/v1/mureka";

/// Unset and blank values both count as missing
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            poll_max_attempts: optional_var("POLL_MAX_ATTEMPTS")
                .map(|v| v.parse())
                .transpose()?,
            vendor_timeout_secs: env::var("VENDOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            suno: SunoConfig {
                api_key: optional_var("SUNO_API_KEY"),
                base_url: optional_var("SUNO_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SUNO_BASE_URL.to_string()),
            },
            kie: KieConfig {
                api_key: optional_var("KIE_API_KEY"),
                base_url: optional_var("KIE_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_KIE_BASE_URL.to_string()),
                model: optional_var("KIE_MODEL").unwrap_or_else(|| "V3_5".to_string()),
            },
            musicgen: MusicGenConfig {
                base_url: optional_var("MUSICGEN_BACKEND_URL")
                    .or_else(|| optional_var("PYTHON_BACKEND_URL"))
                    .unwrap_or_else(|| DEFAULT_MUSICGEN_BASE_URL.to_string()),
            },
            mureka: MurekaConfig {
                rapidapi_key: optional_var("RAPIDAPI_KEY"),
                account: optional_var("MUREKA_ACCOUNT"),
                base_url: optional_var("MUREKA_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MUREKA_BASE_URL.to_string()),
            },
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_model: optional_var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            openai_tts_model: optional_var("OPENAI_TTS_MODEL")
                .unwrap_or_else(|| "tts-1".to_string()),
            groq_api_key: optional_var("GROQ_API_KEY"),
            groq_model: optional_var("GROQ_MODEL").unwrap_or_else(|| "qwen-qwq-32b".to_string()),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn vendor_timeout(&self) -> Duration {
        Duration::from_secs(self.vendor_timeout_secs)
    }
}
