use vantake::api::router::create_router;
use vantake::config::AppConfig;
use vantake::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    if config.has_jwt_auth() {
        tracing::info!("JWT auth enabled for /api/me");
    } else {
        tracing::warn!("AUTH_JWT_SECRET not set, /api/me accepts a raw user id as bearer token (dev mode)");
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("vantake/", env!("CARGO_PKG_VERSION")))
        .build()?;

    tracing::info!(
        gamma = %config.gamma_api_base,
        clob = %config.clob_api_base,
        data = %config.data_api_base,
        "Upstreams configured"
    );

    let metrics_handle = metrics::init_metrics();
    let state = AppState::new(pool, config, http, metrics_handle);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
