pub mod auth;
pub mod handlers;
pub mod proxy;
pub mod router;
