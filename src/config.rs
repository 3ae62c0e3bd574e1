use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration structure loaded from lingodesk.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub system: SystemConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Model selection and asset locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemConfig {
    pub translation_model: String,
    pub correction_model: String,
    pub chatbot_model: String,
    pub audiobook_model: String,
    pub audiobook_max_output_tokens: u32,
    pub audiobook_temperature: f32,
    pub tts_model: String,
    pub prompt_dir: String,
    pub speech_dir: String,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub http_bind: SocketAddr,
    /// Mount the API under this path when serving behind a reverse proxy
    pub root_path: Option<String>,
    pub log_level: String,
    pub upstream_timeout_ms: u64,
    pub http_request_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            http_bind: "127.0.0.1:8080"
                .parse()
                .expect("default bind address should parse"),
            root_path: None,
            log_level: "lingodesk=info".to_string(),
            upstream_timeout_ms: 60_000,
            http_request_timeout_ms: 120_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig {
                translation_model: "gpt-5-nano".to_string(),
                correction_model: "gpt-4o".to_string(),
                chatbot_model: "gpt-4.1".to_string(),
                audiobook_model: "gpt-4.1".to_string(),
                audiobook_max_output_tokens: 2000,
                audiobook_temperature: 0.5,
                tts_model: "gpt-4o-mini-tts".to_string(),
                prompt_dir: "config".to_string(),
                speech_dir: "speechfiles".to_string(),
            },
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses LINGODESK_CONFIG environment variable or defaults to "lingodesk.toml"
    pub fn load() -> anyhow::Result<Self> {
        // Load environment variables with smart fallbacks:
        // 1) LINGO_ENV_FILE if set
        // 2) ./.env
        // 3) ../.env (repo root when running from a subdirectory)
        if let Ok(env_path) = std::env::var("LINGO_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
            if std::env::var("OPENAI_API_KEY").is_err() {
                let _ = dotenvy::from_path("../.env");
            }
        }

        let config_path =
            std::env::var("LINGODESK_CONFIG").unwrap_or_else(|_| "lingodesk.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides for asset locations (env-first)
        if let Ok(prompt_dir) = std::env::var("LINGO_PROMPT_DIR") {
            config.system.prompt_dir = prompt_dir;
        }
        if let Ok(speech_dir) = std::env::var("LINGO_SPEECH_DIR") {
            config.system.speech_dir = speech_dir;
        }

        // Load runtime configuration from environment variables
        config.runtime = RuntimeConfig::load_from_env();

        // Validate configuration
        if config.runtime.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; upstream model calls will fail");
        }
        if !(0.0..=2.0).contains(&config.system.audiobook_temperature) {
            anyhow::bail!(
                "audiobook_temperature must be between 0.0 and 2.0, got {}",
                config.system.audiobook_temperature
            );
        }
        if config.system.audiobook_max_output_tokens == 0 {
            anyhow::bail!("audiobook_max_output_tokens must be > 0");
        }
        if let Some(root) = &config.runtime.root_path
            && !root.starts_with('/')
        {
            anyhow::bail!("LINGO_ROOT_PATH must start with '/', got {root}");
        }

        Ok(config)
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "lingodesk=info".to_string()),
            root_path: std::env::var("LINGO_ROOT_PATH")
                .ok()
                .filter(|p| !p.is_empty()),
            upstream_timeout_ms: std::env::var("LINGO_UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
            http_request_timeout_ms: std::env::var("LINGO_HTTP_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120_000),
            ..Self::default()
        };

        if let Ok(v) = std::env::var("LINGO_HTTP_BIND")
            && let Ok(bind) = v.parse::<SocketAddr>()
        {
            cfg.http_bind = bind;
        }

        cfg
    }
}
