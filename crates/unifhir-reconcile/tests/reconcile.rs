//! End-to-end reconciliation scenarios against the in-memory store backend.

mod common;

use std::sync::Arc;

use common::{Device, init_tracing};
use unifhir_core::Identifier;
use unifhir_gateway_memory::{GatewayOptions, InMemoryGateway};
use unifhir_reconcile::{ReconcileError, ReconciliationService};

const DEVICE_SYSTEM: &str = "http://example.org/devices";

fn service() -> ReconciliationService<InMemoryGateway> {
    init_tracing();
    ReconciliationService::new(Arc::new(InMemoryGateway::new()))
}

fn service_with(options: GatewayOptions) -> ReconciliationService<InMemoryGateway> {
    init_tracing();
    ReconciliationService::new(Arc::new(InMemoryGateway::with_options(options)))
}

#[tokio::test]
async fn ensure_creates_when_absent() {
    let service = service();

    let device: Device = service
        .ensure_by_identity("12345", Some(DEVICE_SYSTEM))
        .await
        .unwrap();

    // Store-assigned fields are populated and the identifier is attached
    assert!(device.id.is_some());
    assert_eq!(device.identifier.len(), 1);
    assert_eq!(device.identifier[0].value(), "12345");
    assert_eq!(device.identifier[0].system(), Some(DEVICE_SYSTEM));
    assert_eq!(service.gateway().count().await, 1);
}

#[tokio::test]
async fn ensure_is_idempotent() {
    let service = service();

    let first: Device = service
        .ensure_by_identity("12345", Some(DEVICE_SYSTEM))
        .await
        .unwrap();
    let second: Device = service
        .ensure_by_identity("12345", Some(DEVICE_SYSTEM))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(service.gateway().count().await, 1);
}

#[tokio::test]
async fn ensure_returns_existing_without_writing() {
    let service = service();
    let identifier = Identifier::new("12345", Some(DEVICE_SYSTEM)).unwrap();

    let created: Device = service.create_by_identity(&identifier).await.unwrap();
    let ensured: Device = service
        .ensure_by_identity("12345", Some(DEVICE_SYSTEM))
        .await
        .unwrap();

    assert_eq!(created.id, ensured.id);
    assert_eq!(service.gateway().count().await, 1);
}

#[tokio::test]
async fn blank_value_fails_before_any_store_call() {
    let service = service();

    let err = service
        .ensure_by_identity::<Device>("", Some(DEVICE_SYSTEM))
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::InvalidArgument(_)));

    let err = service
        .get_by_identity::<Device>("   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::InvalidArgument(_)));

    assert_eq!(service.gateway().count().await, 0);
}

#[tokio::test]
async fn blank_system_shares_namespace_with_absent_system() {
    let service = service();

    let created: Device = service.ensure_by_identity("abc", Some("")).await.unwrap();
    let by_none: Device = service
        .get_by_identity("abc", None)
        .await
        .unwrap()
        .expect("resource should resolve under the absent-system namespace");
    let by_whitespace: Device = service
        .ensure_by_identity("abc", Some("   "))
        .await
        .unwrap();

    assert_eq!(created.id, by_none.id);
    assert_eq!(created.id, by_whitespace.id);
    assert_eq!(service.gateway().count().await, 1);
}

#[tokio::test]
async fn initializer_runs_once_and_only_on_create() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let service = service();
    let calls = AtomicUsize::new(0);

    let created: Device = service
        .ensure_by_identity_with("12345", Some(DEVICE_SYSTEM), |device: &mut Device, _id| {
            calls.fetch_add(1, Ordering::SeqCst);
            device.display_name = Some("Pump 7".to_string());
        })
        .await
        .unwrap();
    assert_eq!(created.display_name.as_deref(), Some("Pump 7"));

    let found: Device = service
        .ensure_by_identity_with("12345", Some(DEVICE_SYSTEM), |device: &mut Device, _id| {
            calls.fetch_add(1, Ordering::SeqCst);
            device.display_name = Some("should not run".to_string());
        })
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(found.display_name.as_deref(), Some("Pump 7"));
}

#[tokio::test]
async fn ambiguous_identity_is_an_error_and_never_creates() {
    // Uniqueness enforcement off so the store can hold corrupt data, and a
    // one-entry page size so the duplicate is only visible on page two.
    let service = service_with(
        GatewayOptions::default()
            .with_page_size(1)
            .with_unique_identifiers(false),
    );
    let identifier = Identifier::new("dup", Some(DEVICE_SYSTEM)).unwrap();

    let _: Device = service.create_by_identity(&identifier).await.unwrap();
    let _: Device = service.create_by_identity(&identifier).await.unwrap();

    let err = service
        .get_by_identity::<Device>("dup", Some(DEVICE_SYSTEM))
        .await
        .unwrap_err();
    assert!(err.is_ambiguous());

    let err = service
        .ensure_by_identity::<Device>("dup", Some(DEVICE_SYSTEM))
        .await
        .unwrap_err();
    assert!(err.is_ambiguous());
    assert_eq!(service.gateway().count().await, 2);
}

#[tokio::test]
async fn unconditional_create_surfaces_store_conflict() {
    let service = service();
    let identifier = Identifier::new("12345", Some(DEVICE_SYSTEM)).unwrap();

    let _: Device = service.create_by_identity(&identifier).await.unwrap();
    let err = service
        .create_by_identity::<Device>(&identifier)
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_ensure_converges_on_one_resource() {
    let service = service();

    let a = service.clone();
    let b = service.clone();
    let (first, second) = tokio::join!(
        tokio::spawn(async move {
            a.ensure_by_identity::<Device>("raced", Some(DEVICE_SYSTEM))
                .await
        }),
        tokio::spawn(async move {
            b.ensure_by_identity::<Device>("raced", Some(DEVICE_SYSTEM))
                .await
        }),
    );

    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();

    // Whichever caller lost the create race reconciled to the winner's copy
    assert_eq!(first.id, second.id);
    assert_eq!(service.gateway().count().await, 1);
}
