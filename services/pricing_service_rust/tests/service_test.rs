//! PricingService lifecycle against the in-memory store (no database needed).

use laundry_pricing_core::db::{DbPoolConfig, PoolHealthConfig};
use laundry_pricing_core::{EventCalendar, MemoryStore, PricingConfig, PricingEngine, Service};
use pricing_service_rust::service::load_calendar;
use pricing_service_rust::{PricingService, PricingServiceConfig};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn test_config(events_file: Option<PathBuf>) -> PricingServiceConfig {
    PricingServiceConfig {
        service_id: "pricing_test".to_string(),
        database_url: "postgres://localhost/unused".to_string(),
        db_pool: DbPoolConfig::default(),
        db_health: PoolHealthConfig::default(),
        pricing: PricingConfig {
            refresh_interval: Duration::from_millis(20),
            ..Default::default()
        },
        events_file,
        stats_log_every: 2,
    }
}

#[tokio::test]
async fn test_run_until_shutdown_prices_services() {
    let config = test_config(None);
    let store = Arc::new(MemoryStore::with_services(vec![
        Service::new("1", "Wash & Fold", "laundry", 80.0),
        Service::new("2", "Dry Clean Suit", "dry_cleaning", 350.0),
    ]));
    let engine = Arc::new(
        PricingEngine::new(store, &config.pricing, EventCalendar::empty()).unwrap(),
    );
    let mut service = PricingService::with_engine(config, engine.clone());

    service
        .run_until(tokio::time::sleep(Duration::from_millis(120)))
        .await
        .unwrap();

    let stats = engine.stats();
    assert!(stats.cycles_run >= 2, "cycles_run = {}", stats.cycles_run);
    assert_eq!(stats.cycles_failed, 0);
    assert_eq!(engine.get_all_pricing().len(), 2);

    // Scheduler is stopped once run_until returns
    let settled = engine.stats().cycles_run;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(engine.stats().cycles_run, settled);
}

#[test]
fn test_load_calendar_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let event = concat!(
        r#"{"name":"Onam","start_date":"2027-08-20","end_date":"2027-08-25","#,
        r#""impact":0.7,"categories":["laundry"]}"#
    );
    write!(file, "[{}]", event).unwrap();

    let calendar = load_calendar(&test_config(Some(file.path().to_path_buf()))).unwrap();
    assert_eq!(calendar.len(), 1);

    assert!(load_calendar(&test_config(None)).unwrap().is_empty());
    assert!(load_calendar(&test_config(Some(PathBuf::from("/no/such/events.json")))).is_err());
}
