//! pricing_service_rust - keeps dynamic service prices fresh for the store dashboard

pub mod config;
pub mod service;

pub use config::PricingServiceConfig;
pub use service::PricingService;
