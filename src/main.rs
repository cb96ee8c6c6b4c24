use std::net::SocketAddr;

use anyhow::{bail, Context};
use recruitflow::config::{Config, DEFAULT_SECRET_KEY};
use recruitflow::{create_app, db, AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.secret_key == DEFAULT_SECRET_KEY {
        if config.is_production() {
            bail!("SECRET_KEY must be set in production");
        }
        warn!("SECRET_KEY is not set; using the development default");
    }

    let conn = db::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    if config.run_migrations {
        db::migrate(&conn).await.context("Failed to apply migrations")?;
    }
    tokio::fs::create_dir_all(&config.resume_upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.resume_upload_dir.display()))?;

    let addr = format!("{}:{}", config.host, config.port);
    let project_name = config.project_name.clone();
    let state = AppState::new(conn, config)?;
    if !state.resume_parser.is_configured() {
        warn!("RESUME_PARSER_URL or RESUME_PARSER_API_KEY is not set; resume autofill is disabled");
    }
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("{} listening on http://{}", project_name, addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
