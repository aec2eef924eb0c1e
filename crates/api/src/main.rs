use anyhow::Context;

use ums_infra::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ums_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let app = ums_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        service = config.service.as_str(),
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
