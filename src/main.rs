use fittrack_api_rust::{app::app, config, database, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Fittrack API in {:?} mode", config.environment);

    let pool = database::connect().await?;
    if config.database.apply_schema_on_startup {
        database::apply_schema(&pool).await?;
    }

    let app = app(AppState::new(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Fittrack API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
