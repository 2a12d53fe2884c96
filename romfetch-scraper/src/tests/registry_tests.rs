use super::*;
use crate::test_support::{FakeFactory, FakeProvider, Reply};

fn registry() -> (ProviderRegistry, Arc<FakeFactory>, Arc<FakeProvider>) {
    let provider = FakeProvider::new("fake", Reply::Miss);
    let factory = FakeFactory::new(vec![Arc::clone(&provider)], Vec::new());
    let registry = ProviderRegistry::new(Arc::clone(&factory) as Arc<dyn ProfileFactory>);
    (registry, factory, provider)
}

#[test]
fn starts_without_a_profile() {
    let (registry, factory, _) = registry();
    assert!(registry.snapshot().is_none());
    assert_eq!(registry.active_profile(), None);
    assert_eq!(factory.builds(), 0);
}

#[test]
fn selecting_the_active_profile_is_a_no_op() {
    let (registry, factory, provider) = registry();
    for _ in 0..3 {
        registry.select(Profile::ScreenScraper).unwrap();
    }
    assert_eq!(factory.builds(), 1);
    assert_eq!(provider.closes(), 0);
    assert_eq!(registry.snapshot().unwrap().generation(), 1);
}

#[test]
fn switching_closes_the_previous_set() {
    let (registry, factory, provider) = registry();
    registry.select(Profile::ScreenScraper).unwrap();
    registry.select(Profile::ArcadeDb).unwrap();

    assert_eq!(registry.active_profile(), Some(Profile::ArcadeDb));
    assert_eq!(factory.builds(), 2);
    assert_eq!(provider.closes(), 1);
    assert_eq!(registry.snapshot().unwrap().generation(), 2);
}

#[test]
fn failed_switch_keeps_the_previous_profile() {
    let (registry, factory, provider) = registry();
    registry.select(Profile::ScreenScraper).unwrap();
    factory.fail(Profile::OpenDb);

    let err = registry.select(Profile::OpenDb).unwrap_err();

    assert!(matches!(err, ConfigError::Missing(_)));
    assert_eq!(registry.active_profile(), Some(Profile::ScreenScraper));
    assert_eq!(registry.snapshot().unwrap().generation(), 1);
    assert_eq!(provider.closes(), 0);
}

#[test]
fn failed_first_selection_leaves_nothing_active() {
    let (registry, factory, _) = registry();
    factory.fail(Profile::ArcadeDb);

    assert!(registry.select(Profile::ArcadeDb).is_err());
    assert!(registry.snapshot().is_none());

    factory.heal(Profile::ArcadeDb);
    registry.select(Profile::ArcadeDb).unwrap();
    assert_eq!(registry.active_profile(), Some(Profile::ArcadeDb));
}

#[test]
fn in_flight_snapshot_outlives_a_switch() {
    let (registry, _, provider) = registry();
    registry.select(Profile::ScreenScraper).unwrap();
    let in_flight = registry.snapshot().unwrap();

    registry.select(Profile::OpenDb).unwrap();

    assert_eq!(in_flight.profile(), Profile::ScreenScraper);
    assert_eq!(in_flight.providers().console.len(), 1);
    assert_eq!(provider.closes(), 0);

    drop(in_flight);
    assert_eq!(provider.closes(), 1);
}

#[test]
fn close_clears_and_releases() {
    let (registry, _, provider) = registry();
    registry.select(Profile::ArcadeDb).unwrap();

    registry.close();
    assert!(registry.snapshot().is_none());
    assert_eq!(provider.closes(), 1);

    registry.close();
    assert_eq!(provider.closes(), 1);
}

#[test]
fn reselect_after_close_rebuilds() {
    let (registry, factory, _) = registry();
    registry.select(Profile::ArcadeDb).unwrap();
    registry.close();
    registry.select(Profile::ArcadeDb).unwrap();

    assert_eq!(factory.builds(), 2);
    assert_eq!(registry.snapshot().unwrap().generation(), 2);
}
