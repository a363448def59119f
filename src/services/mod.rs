pub mod trader_service;
