//! End-to-end pricing scenarios against the in-memory store.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use laundry_pricing_core::{
    EventCalendar, LocalEvent, MemoryStore, Order, OrderStatus, PricingConfig, PricingEngine,
    PricingError, Product, Service,
};
use std::sync::Arc;

/// Saturday 10:00 in Kolkata (04:30 UTC), October
fn saturday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 24, 4, 30, 0).unwrap()
}

/// Sunday 02:00 in Kolkata (Saturday 20:30 UTC), January
fn sunday_night_january() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2027, 1, 9, 20, 30, 0).unwrap()
}

fn order(id: usize, service_id: &str, created_at: DateTime<Utc>) -> Order {
    Order {
        id: id.to_string(),
        service_id: service_id.to_string(),
        status: OrderStatus::Created,
        total_cost: 120.0,
        created_at,
    }
}

fn product(id: &str, category: &str, stock: f64, max: f64) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        category: category.to_string(),
        stock_quantity: stock,
        max_stock: max,
    }
}

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_services(vec![
        Service::new("wash", "Wash & Fold", "laundry", 80.0),
        Service::new("dry", "Dry Clean Suit", "dry_cleaning", 350.0),
        Service::new("iron", "Steam Iron", "ironing", 15.0),
    ]))
}

fn engine(store: Arc<MemoryStore>, calendar: EventCalendar) -> PricingEngine {
    PricingEngine::new(store, &PricingConfig::default(), calendar).unwrap()
}

#[tokio::test]
async fn test_peak_busy_scarce_service_costs_more_than_off_peak() {
    let store = store();
    let peak = saturday_morning();
    store.add_orders((0..15).map(|i| order(i, "dry", peak - Duration::hours(2))));
    store.upsert_product(product("solvent", "dry_cleaning", 1.0, 20.0));
    let engine = engine(store.clone(), EventCalendar::empty());

    engine.update_all_pricing_at(peak).await.unwrap();
    let busy = engine.get_service_pricing("dry").unwrap();
    assert_eq!(busy.factors.demand, 1.0);
    assert_eq!(busy.factors.time_of_day, 1.0);
    assert_eq!(busy.factors.day_of_week, 1.0);
    assert_eq!(busy.factors.seasonality, 1.0);
    assert!((busy.factors.inventory - 0.05).abs() < 1e-12);
    assert!(busy.price_multiplier > 1.3);
    assert!(busy.current_price > 350.0);

    let quiet_time = sunday_night_january();
    engine.update_all_pricing_at(quiet_time).await.unwrap();
    let quiet = engine.get_service_pricing("dry").unwrap();
    assert_eq!(quiet.factors.demand, 0.0);
    assert_eq!(quiet.factors.day_of_week, 0.5);
    assert_eq!(quiet.factors.time_of_day, 0.3);
    assert!(quiet.price_multiplier < 1.0);
    assert!(quiet.price_multiplier >= 0.5);
    assert!(quiet.current_price < busy.current_price);
}

#[tokio::test]
async fn test_demand_grows_with_new_orders() {
    let store = store();
    let now = saturday_morning();
    let engine = engine(store.clone(), EventCalendar::empty());

    let mut last_price = 0.0;
    let mut last_demand = -1.0;
    for batch in 0..6 {
        store.add_orders((0..3).map(|i| order(batch * 3 + i, "wash", now - Duration::minutes(30))));
        let rule = engine.update_service_pricing_at("wash", now).await.unwrap();

        assert!(rule.factors.demand >= last_demand);
        assert!(rule.current_price >= last_price);
        last_demand = rule.factors.demand;
        last_price = rule.current_price;
    }
    assert_eq!(last_demand, 1.0);
}

#[tokio::test]
async fn test_local_event_lifts_matching_category_only() {
    let calendar = EventCalendar::new(vec![LocalEvent {
        name: "Wedding season fair".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 10, 23).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
        impact: 1.0,
        categories: vec!["dry_cleaning".to_string()],
    }])
    .unwrap();

    let plain = engine(store(), EventCalendar::empty());
    let festive = engine(store(), calendar);
    let now = saturday_morning();
    plain.update_all_pricing_at(now).await.unwrap();
    festive.update_all_pricing_at(now).await.unwrap();

    let dry_plain = plain.get_service_pricing("dry").unwrap();
    let dry_festive = festive.get_service_pricing("dry").unwrap();
    assert_eq!(dry_festive.factors.local_events, 1.0);
    assert!((dry_festive.price_multiplier - dry_plain.price_multiplier - 0.25).abs() < 1e-9);

    let iron_festive = festive.get_service_pricing("iron").unwrap();
    let iron_plain = plain.get_service_pricing("iron").unwrap();
    assert_eq!(iron_festive.current_price, iron_plain.current_price);
}

#[tokio::test]
async fn test_recommended_price_lifecycle() {
    let store = store();
    let engine = engine(store.clone(), EventCalendar::empty());

    // No rule yet: base price
    assert_eq!(engine.get_recommended_price("iron").await.unwrap(), 15.0);
    assert!(engine.get_pricing_factors("iron").is_none());

    engine.initialize().await.unwrap();
    assert_eq!(engine.get_all_pricing().len(), 3);
    assert_eq!(engine.get_recommended_price("iron").await.unwrap(), 15.0);

    store.add_orders((0..10).map(|i| order(i, "iron", saturday_morning() - Duration::hours(1))));
    engine.update_all_pricing_at(saturday_morning()).await.unwrap();
    let rule = engine.get_service_pricing("iron").unwrap();
    assert_eq!(engine.get_recommended_price("iron").await.unwrap(), rule.current_price);
    assert_eq!(engine.get_pricing_factors("iron"), Some(rule.factors));

    // New services have no rule until the next refresh
    store.upsert_service(Service::new("curtain", "Curtain Clean", "home", 499.0));
    assert_eq!(engine.get_recommended_price("curtain").await.unwrap(), 499.0);
    assert!(matches!(
        engine.get_recommended_price("missing").await,
        Err(PricingError::ServiceNotFound(_))
    ));
}

#[tokio::test]
async fn test_every_rule_within_bounds_and_rounded() {
    let store = store();
    let now = saturday_morning();
    let services = ["wash", "dry", "iron"];
    store.add_orders((0..40).map(|i| order(i, services[i % 3], now - Duration::hours(1))));
    store.upsert_product(product("detergent", "laundry", 0.0, 50.0));
    store.upsert_product(product("hangers", "ironing", 500.0, 100.0));
    let engine = engine(store, EventCalendar::empty());

    engine.update_all_pricing_at(now).await.unwrap();
    for rule in engine.get_all_pricing() {
        assert!((0.5..=2.0).contains(&rule.price_multiplier), "{:?}", rule);
        let cents = rule.current_price * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6, "{} not whole cents", rule.current_price);
        for f in rule.factors.as_array() {
            assert!((0.0..=1.0).contains(&f));
        }
    }
}
