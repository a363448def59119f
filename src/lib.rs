pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod polymarket;
pub mod services;

use crate::config::AppConfig;
use crate::polymarket::Upstreams;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub upstreams: Upstreams,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl AppState {
    /// Wire the upstream clients from `config` around a shared HTTP client.
    pub fn new(
        db: sqlx::PgPool,
        config: AppConfig,
        http: reqwest::Client,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        let upstreams = Upstreams::new(
            http,
            &config.gamma_api_base,
            &config.clob_api_base,
            &config.data_api_base,
        );
        Self {
            db,
            config,
            upstreams,
            metrics_handle,
        }
    }
}
