//! Behaviour of `LocationService` against scripted collaborators

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{fast_timeouts, BrokenStore, Harness, NotifyMode, ScriptedNotifier};
use location_share::notifier::NotifierError;
use location_share::store::StoreError;
use location_share::{Error, LocationService, ShareLocationRequest};

fn request(latitude: f64, longitude: f64) -> ShareLocationRequest {
    ShareLocationRequest {
        latitude,
        longitude,
        accuracy: None,
    }
}

#[tokio::test]
async fn each_share_gets_a_unique_id_and_ordered_timestamp() {
    let harness = Harness::new(NotifyMode::Succeed);

    let mut ids = HashSet::new();
    let mut last = None;
    for i in 0..20 {
        let record = harness
            .service
            .share_location(request(i as f64, -(i as f64)))
            .await
            .unwrap();
        assert!(ids.insert(record.id.as_str().to_string()));
        if let Some(previous) = last {
            assert!(record.timestamp >= previous);
        }
        last = Some(record.timestamp);
    }
}

#[tokio::test]
async fn accuracy_is_echoed_when_present() {
    let harness = Harness::new(NotifyMode::Succeed);

    let record = harness
        .service
        .share_location(ShareLocationRequest {
            latitude: 28.6139,
            longitude: 77.209,
            accuracy: Some(10.0),
        })
        .await
        .unwrap();

    assert_eq!(record.accuracy, Some(10.0));
    let notified = harness.notifier.calls.lock().clone();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].latitude, 28.6139);
    assert_eq!(notified[0].longitude, 77.209);
}

#[tokio::test]
async fn non_finite_coordinates_are_rejected_before_storage() {
    let harness = Harness::new(NotifyMode::Succeed);

    let err = harness
        .service
        .share_location(request(f64::NAN, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(harness.store.is_empty());
    assert_eq!(harness.notifier.call_count(), 0);
}

#[tokio::test]
async fn out_of_range_coordinates_are_accepted() {
    let harness = Harness::new(NotifyMode::Succeed);

    let record = harness
        .service
        .share_location(request(123.0, -400.0))
        .await
        .unwrap();

    assert_eq!(record.latitude, 123.0);
    assert_eq!(record.longitude, -400.0);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let harness = Harness::new(NotifyMode::Succeed);
    for i in 0..10 {
        harness
            .service
            .share_location(request(i as f64, 0.0))
            .await
            .unwrap();
    }

    let listed = harness.service.list_locations().await.unwrap();
    assert_eq!(listed.len(), 10);
    for pair in listed.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    assert_eq!(listed[0].latitude, 9.0);
    assert_eq!(listed[9].latitude, 0.0);
}

#[tokio::test]
async fn listing_is_capped_at_the_hundred_most_recent() {
    let harness = Harness::new(NotifyMode::Succeed);

    let mut submitted = Vec::new();
    for i in 0..150 {
        let record = harness
            .service
            .share_location(request(i as f64, 0.0))
            .await
            .unwrap();
        submitted.push(record.id.as_str().to_string());
    }

    let listed = harness.service.list_locations().await.unwrap();
    assert_eq!(listed.len(), 100);

    let listed_ids: HashSet<String> = listed.iter().map(|r| r.id.as_str().to_string()).collect();
    let newest: HashSet<String> = submitted[50..].iter().cloned().collect();
    assert_eq!(listed_ids, newest);
}

#[tokio::test]
async fn clear_reports_the_number_removed() {
    let harness = Harness::new(NotifyMode::Succeed);
    for i in 0..7 {
        harness
            .service
            .share_location(request(i as f64, 0.0))
            .await
            .unwrap();
    }

    assert_eq!(harness.service.clear_locations().await.unwrap(), 7);
    assert!(harness.service.list_locations().await.unwrap().is_empty());
    assert_eq!(harness.service.clear_locations().await.unwrap(), 0);
    assert_eq!(harness.service.metrics().snapshot().locations_cleared, 7);
}

#[tokio::test]
async fn record_is_stored_before_notification() {
    let harness = Harness::new(NotifyMode::Succeed);

    harness
        .service
        .share_location(request(1.0, 1.0))
        .await
        .unwrap();
    harness
        .service
        .share_location(request(2.0, 2.0))
        .await
        .unwrap();

    assert_eq!(*harness.notifier.store_len_at_call.lock(), vec![1, 2]);
}

#[tokio::test]
async fn notification_failure_keeps_the_record() {
    let harness = Harness::new(NotifyMode::Reject);

    let err = harness
        .service
        .share_location(request(51.5, -0.12))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Notification(NotifierError::Rejected { status: 502, .. })
    ));
    assert_eq!(harness.store.len(), 1);

    let metrics = harness.service.metrics().snapshot();
    assert_eq!(metrics.notification_failures, 1);
    assert_eq!(metrics.locations_shared, 0);
}

#[tokio::test]
async fn slow_notification_times_out_as_notification_error() {
    let harness = Harness::new(NotifyMode::Hang);

    let err = harness
        .service
        .share_location(request(0.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Notification(NotifierError::Timeout(_))
    ));
    assert_eq!(harness.store.len(), 1);
}

#[tokio::test]
async fn storage_failure_skips_notification() {
    let notifier = Arc::new(ScriptedNotifier::new(NotifyMode::Succeed));
    let service = LocationService::new(
        Arc::new(BrokenStore { hang: false }),
        notifier.clone(),
        fast_timeouts(),
    );

    let err = service.share_location(request(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, Error::Storage(StoreError::Closed)));
    assert_eq!(notifier.call_count(), 0);

    assert!(matches!(
        service.list_locations().await,
        Err(Error::Storage(_))
    ));
    assert!(matches!(
        service.clear_locations().await,
        Err(Error::Storage(_))
    ));
    assert_eq!(service.metrics().snapshot().storage_failures, 3);
}

#[tokio::test]
async fn slow_store_times_out_as_storage_error() {
    let notifier = Arc::new(ScriptedNotifier::new(NotifyMode::Succeed));
    let service = LocationService::new(
        Arc::new(BrokenStore { hang: true }),
        notifier.clone(),
        fast_timeouts(),
    );

    let err = service.share_location(request(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, Error::Storage(StoreError::Timeout(_))));
    assert_eq!(notifier.call_count(), 0);
    assert!(!service.store_healthy().await);
}
