use std::sync::Arc;

use appforge_gateway::config::GatewayConfig;
use appforge_gateway::{router, AppState};
use appforge_llm::prelude::{LlmGateway, OpenAiChatModel, OpenAiConfig};
use appforge_pipeline::prelude::ApplicationService;
use appforge_storage::prelude::{
    MemoryApplicationStore, MemoryCompletionLogStore, MemoryDatastore,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::from_env()?;

    let mut openai = OpenAiConfig::new(config.openai_api_key.clone())
        .map_err(|err| anyhow::anyhow!("openai config: {err}"))?
        .with_timeout(config.openai_timeout);
    if let Some(base_url) = config.openai_base_url.as_deref() {
        openai = openai
            .with_base_url(base_url)
            .map_err(|err| anyhow::anyhow!("openai base url: {err}"))?;
    }
    let model = OpenAiChatModel::new(openai)
        .map_err(|err| anyhow::anyhow!("openai client: {err}"))?;
    let gateway = Arc::new(LlmGateway::new(Arc::new(model), config.openai_model.clone()));

    let datastore = MemoryDatastore::new();
    let apps = Arc::new(MemoryApplicationStore::new(&datastore));
    let logs = Arc::new(MemoryCompletionLogStore::new(&datastore));
    let service = Arc::new(ApplicationService::new(apps, logs, gateway));

    let state = AppState {
        service,
        health: Arc::new(datastore),
    };
    let app = router(state);

    info!(listen = %config.listen, model = %config.openai_model, "appforge gateway listening");
    axum::serve(tokio::net::TcpListener::bind(config.listen).await?, app).await?;
    Ok(())
}
