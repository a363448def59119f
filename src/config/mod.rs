use std::env;

const DEFAULT_GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";
const DEFAULT_CLOB_API_BASE: &str = "https://clob.polymarket.com";
const DEFAULT_DATA_API_BASE: &str = "https://data-api.polymarket.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,

    // Upstream Polymarket services (overridable for local fakes)
    pub gamma_api_base: String,
    pub clob_api_base: String,
    pub data_api_base: String,

    // Hosted auth provider: HS256 secret. None = dev mode (bearer token is the user id)
    pub auth_jwt_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),

            gamma_api_base: base_url_var("GAMMA_API_BASE", DEFAULT_GAMMA_API_BASE),
            clob_api_base: base_url_var("CLOB_API_BASE", DEFAULT_CLOB_API_BASE),
            data_api_base: base_url_var("DATA_API_BASE", DEFAULT_DATA_API_BASE),

            auth_jwt_secret: env::var("AUTH_JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }

    /// Config pointing every upstream at `upstream_base`; used by tests and local runs.
    pub fn with_upstream(database_url: &str, upstream_base: &str) -> Self {
        let base = upstream_base.trim_end_matches('/').to_string();
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 0,
            db_max_connections: 5,
            gamma_api_base: base.clone(),
            clob_api_base: base.clone(),
            data_api_base: base,
            auth_jwt_secret: None,
        }
    }

    /// Returns true if JWT verification is configured.
    pub fn has_jwt_auth(&self) -> bool {
        self.auth_jwt_secret.is_some()
    }
}

fn base_url_var(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.into())
        .trim_end_matches('/')
        .to_string()
}
