// Law-firm CMS Server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lawfirm_cms::{api::create_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    if let Some(parent) = config.database.file_path().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(&parent)?;
        }
    }

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;
    let app = create_router(app_state);

    // Start server
    let addr = config.server_address();
    info!("Law-firm CMS starting on http://{}", addr);
    info!("  GET/POST        /api/v1/{{lawyers|announcements|events|publications}}");
    info!("  GET/PUT/DELETE  /api/v1/{{kind}}/{{id}}");
    info!("  GET             /api/v1/{{kind}}/slug/{{slug}}");
    info!("  POST/GET        /api/v1/contact, /api/v1/newsletter");
    info!("  default language: {}", config.content.default_language);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
