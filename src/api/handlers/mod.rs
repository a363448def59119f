pub mod analytics;
pub mod clob;
pub mod data;
pub mod gamma;
pub mod health;
pub mod me;
pub mod metrics;
