//! Unit tests for the passcode service

use chrono::Duration;
use std::sync::Arc;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;
use crate::services::otp::{OtpService, OtpServiceConfig, VerifyOutcome};

use super::mocks::{
    start_time, BrokenGenerator, FixedGenerator, ManualClock, MockNotifier, MockStore,
    ReissuingStore,
};

struct Harness {
    store: Arc<MockStore>,
    notifier: Arc<MockNotifier>,
    clock: Arc<ManualClock>,
    service: OtpService<MockStore, MockNotifier>,
}

fn harness_with(store: MockStore, notifier: MockNotifier) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);
    let clock = Arc::new(ManualClock::new(start_time()));
    let service = OtpService::new(store.clone(), notifier.clone(), OtpServiceConfig::default())
        .unwrap()
        .with_generator(Arc::new(FixedGenerator("123456")))
        .with_clock(clock.clone());
    Harness {
        store,
        notifier,
        clock,
        service,
    }
}

fn harness() -> Harness {
    harness_with(MockStore::new(), MockNotifier::new())
}

#[tokio::test]
async fn test_issue_wrong_right_repeat() {
    let h = harness();

    let receipt = h.service.issue("a@x.com").await.unwrap();
    assert_eq!(receipt.record.code, "123456");
    assert_eq!(receipt.record.expires_at, start_time() + Duration::minutes(5));
    assert_eq!(receipt.message_id, "mock-msg-0");

    assert_eq!(
        h.service.verify("a@x.com", "000000").await.unwrap(),
        VerifyOutcome::IncorrectCode
    );
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::Verified
    );
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::NoCodeFound
    );
}

#[tokio::test]
async fn test_issue_sends_rendered_message() {
    let h = harness();

    h.service.issue("a@x.com").await.unwrap();

    let sent = h.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let (destination, subject, body) = &sent[0];
    assert_eq!(destination, "a@x.com");
    assert_eq!(subject, "Your OTP Code");
    assert_eq!(body, "Your OTP is: 123456");
}

#[tokio::test]
async fn test_identity_is_normalized() {
    let h = harness();

    let receipt = h.service.issue("  Alice@Example.COM ").await.unwrap();
    assert_eq!(receipt.record.identity, "alice@example.com");
    assert!(h.store.record("alice@example.com").is_some());

    assert_eq!(
        h.service.verify("ALICE@example.com", "123456").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_issue_rejects_malformed_email() {
    let h = harness();

    for bad in ["", "not-an-email", "a@b", "@x.com"] {
        let result = h.service.issue(bad).await;
        assert!(
            matches!(result, Err(DomainError::Validation { .. })),
            "{:?} should be rejected",
            bad
        );
    }
    assert_eq!(h.store.len(), 0);
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_verify_without_issue() {
    let h = harness();
    assert_eq!(
        h.service.verify("nobody@x.com", "123456").await.unwrap(),
        VerifyOutcome::NoCodeFound
    );
}

#[tokio::test]
async fn test_incorrect_code_keeps_record() {
    let h = harness();
    h.service.issue("a@x.com").await.unwrap();

    for _ in 0..3 {
        assert_eq!(
            h.service.verify("a@x.com", "654321").await.unwrap(),
            VerifyOutcome::IncorrectCode
        );
    }
    assert!(h.store.record("a@x.com").is_some());
    assert_eq!(
        h.service.verify("a@x.com", "12345").await.unwrap(),
        VerifyOutcome::IncorrectCode
    );
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_valid_at_exact_expiry() {
    let h = harness();
    h.service.issue("a@x.com").await.unwrap();

    h.clock.advance(Duration::minutes(5));
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_expired_code_is_removed() {
    let h = harness();
    h.service.issue("a@x.com").await.unwrap();

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::Expired
    );
    assert!(h.store.record("a@x.com").is_none());
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::NoCodeFound
    );
}

#[tokio::test]
async fn test_wrong_code_on_expired_record_is_incorrect() {
    let h = harness();
    h.service.issue("a@x.com").await.unwrap();

    h.clock.advance(Duration::minutes(10));
    assert_eq!(
        h.service.verify("a@x.com", "999999").await.unwrap(),
        VerifyOutcome::IncorrectCode
    );
    assert!(h.store.record("a@x.com").is_some());
}

#[tokio::test]
async fn test_reissue_replaces_pending_code() {
    let store = Arc::new(MockStore::new());
    let notifier = Arc::new(MockNotifier::new());
    let clock = Arc::new(ManualClock::new(start_time()));

    let first = OtpService::new(store.clone(), notifier.clone(), OtpServiceConfig::default())
        .unwrap()
        .with_generator(Arc::new(FixedGenerator("111111")))
        .with_clock(clock.clone());
    let second = OtpService::new(store.clone(), notifier.clone(), OtpServiceConfig::default())
        .unwrap()
        .with_generator(Arc::new(FixedGenerator("222222")))
        .with_clock(clock.clone());

    first.issue("a@x.com").await.unwrap();
    clock.advance(Duration::minutes(3));
    let receipt = second.issue("a@x.com").await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(receipt.record.expires_at, start_time() + Duration::minutes(8));
    assert_eq!(
        first.verify("a@x.com", "111111").await.unwrap(),
        VerifyOutcome::IncorrectCode
    );

    // The new lifetime counts from the re-issue
    clock.advance(Duration::minutes(4));
    assert_eq!(
        first.verify("a@x.com", "222222").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_notifier_failure_keeps_record() {
    let h = harness_with(MockStore::new(), MockNotifier::failing());

    let result = h.service.issue("a@x.com").await;
    match result {
        Err(DomainError::Notifier { message }) => assert!(message.contains("SMTP")),
        other => panic!("Expected notifier error, got {:?}", other),
    }

    assert!(h.store.record("a@x.com").is_some());
    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let h = harness_with(MockStore::failing(), MockNotifier::new());

    assert!(matches!(
        h.service.issue("a@x.com").await,
        Err(DomainError::StorageUnavailable { .. })
    ));
    assert!(matches!(
        h.service.verify("a@x.com", "123456").await,
        Err(DomainError::StorageUnavailable { .. })
    ));
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_randomness_failure_stores_nothing() {
    let h = harness();
    let service = OtpService::new(h.store.clone(), h.notifier.clone(), OtpServiceConfig::default())
        .unwrap()
        .with_generator(Arc::new(BrokenGenerator));

    assert!(matches!(
        service.issue("a@x.com").await,
        Err(DomainError::RandomnessUnavailable { .. })
    ));
    assert_eq!(h.store.len(), 0);
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_reissue_between_lookup_and_consume_survives() {
    let original = OtpRecord::new("a@x.com", "123456", start_time(), Duration::minutes(5)).unwrap();
    let replacement = OtpRecord::new(
        "a@x.com",
        "777777",
        start_time() + Duration::seconds(30),
        Duration::minutes(5),
    )
    .unwrap();

    let store = Arc::new(ReissuingStore::new(replacement.clone()));
    store.inner.records.lock().unwrap().insert(original.identity.clone(), original);

    let service = OtpService::new(store.clone(), Arc::new(MockNotifier::new()), OtpServiceConfig::default())
        .unwrap()
        .with_clock(Arc::new(ManualClock::new(start_time() + Duration::minutes(1))));

    assert_eq!(
        service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::NoCodeFound
    );
    assert_eq!(store.inner.record("a@x.com"), Some(replacement));
    assert_eq!(
        service.verify("a@x.com", "777777").await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn test_revoke_removes_pending_code() {
    let h = harness();
    h.service.issue("a@x.com").await.unwrap();

    h.service.revoke("A@X.com").await.unwrap();
    h.service.revoke("a@x.com").await.unwrap();

    assert_eq!(
        h.service.verify("a@x.com", "123456").await.unwrap(),
        VerifyOutcome::NoCodeFound
    );
}

#[tokio::test]
async fn test_health_check_reports_store_state() {
    let h = harness();
    assert!(h.service.health_check().await.is_ok());

    h.store.should_fail.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(matches!(
        h.service.health_check().await,
        Err(DomainError::StorageUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = OtpServiceConfig {
        ttl_minutes: -1,
        ..Default::default()
    };
    let result = OtpService::new(Arc::new(MockStore::new()), Arc::new(MockNotifier::new()), config);
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_secure_codes_have_configured_length() {
    let config = OtpServiceConfig {
        code_length: 8,
        ..Default::default()
    };
    let notifier = Arc::new(MockNotifier::new());
    let service = OtpService::new(Arc::new(MockStore::new()), notifier.clone(), config).unwrap();

    let receipt = service.issue("a@x.com").await.unwrap();
    assert_eq!(receipt.record.code.len(), 8);
    assert!(receipt.record.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(notifier.last_body(), Some(format!("Your OTP is: {}", receipt.record.code)));
}
