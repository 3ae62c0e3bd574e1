use anyhow::Result;
use lingodesk::{
    clients::{LanguageModel, OpenAiClient, SpeechModel},
    config::Config,
    http::{self, AppState, HttpMetrics},
    prompts::PromptRegistry,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .with_ansi(false)
        .init();

    let prompts = PromptRegistry::load(Path::new(&config.system.prompt_dir))?;
    info!("loaded {} prompt templates", prompts.list().len());

    let client = Arc::new(OpenAiClient::new(
        config.runtime.openai_api_key.clone().unwrap_or_default(),
        config.runtime.openai_base_url.clone(),
        config.runtime.upstream_timeout_ms,
    )?);
    let language: Arc<dyn LanguageModel> = client.clone();
    let speech: Arc<dyn SpeechModel> = client;

    let state = AppState {
        config: Arc::new(config),
        prompts: Arc::new(prompts),
        language,
        speech,
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    };

    http::serve(state).await?;

    Ok(())
}
