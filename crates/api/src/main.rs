use anyhow::Context;

use barstock_api::app::{AppServices, ServiceDeps, build_app};
use barstock_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    barstock_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let mut deps = ServiceDeps::in_memory(&config).context("failed to build LLM client")?;

    if config.use_persistent_stores {
        use_postgres(&config, &mut deps).await?;
    }

    let services = AppServices::start(deps).await.context("failed to start services")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn use_postgres(config: &ApiConfig, deps: &mut ServiceDeps) -> anyhow::Result<()> {
    use std::sync::Arc;

    use barstock_infra::store::{PostgresInventoryStore, PostgresPosConfigStore, ensure_schema};

    let url = config
        .database_url
        .as_deref()
        .context("USE_PERSISTENT_STORES requires DATABASE_URL")?;
    let pool = sqlx::PgPool::connect(url).await.context("failed to connect to Postgres")?;
    ensure_schema(&pool).await?;

    let pool = Arc::new(pool);
    deps.store = Arc::new(PostgresInventoryStore::new(pool.clone()));
    deps.pos_store = Arc::new(PostgresPosConfigStore::new(pool));
    tracing::info!("using Postgres document stores");
    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn use_postgres(_config: &ApiConfig, _deps: &mut ServiceDeps) -> anyhow::Result<()> {
    anyhow::bail!("USE_PERSISTENT_STORES is set but this build lacks the `postgres` feature")
}
