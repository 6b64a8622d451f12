use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{config::Config, router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    if config.auth_secret.is_fallback() {
        if config.secure_cookies {
            tracing::error!(
                "❌ AUTH_SECRET is not set in production; sessions are signed with the public development secret"
            );
        } else {
            tracing::warn!("⚠️ AUTH_SECRET is not set, using the development secret");
        }
    }

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let app = router::build(state);

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
