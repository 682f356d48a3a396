use std::{sync::Arc, time::Duration};

use marquee::{
    AppState, annotation::AnnotationService, catalog::Catalog, config::Config, db,
    llm::AzureChatClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("marquee/0.1")
        .timeout(Duration::from_secs(config.openai.timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url, config.database_max_connections).await?;
    let chat = AzureChatClient::new(http, &config.openai);

    let state = Arc::new(AppState {
        catalog: Catalog::new(db),
        annotations: AnnotationService::new(Arc::new(chat)),
    });

    let app = marquee::router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
