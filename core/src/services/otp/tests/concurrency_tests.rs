//! Concurrent issue and verify behaviour

use std::sync::Arc;
use tokio::sync::Barrier;

use crate::services::otp::{OtpService, OtpServiceConfig, VerifyOutcome};

use super::mocks::{
    start_time, FixedGenerator, ManualClock, MockNotifier, MockStore, SequenceGenerator,
};

fn service(store: Arc<MockStore>) -> Arc<OtpService<MockStore, MockNotifier>> {
    Arc::new(
        OtpService::new(store, Arc::new(MockNotifier::new()), OtpServiceConfig::default())
            .unwrap()
            .with_generator(Arc::new(FixedGenerator("123456")))
            .with_clock(Arc::new(ManualClock::new(start_time()))),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_verifies_succeed_once() {
    let store = Arc::new(MockStore::new());
    let service = service(store.clone());

    for round in 0..50 {
        let identity = format!("user{}@x.com", round);
        service.issue(&identity).await.unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                let barrier = barrier.clone();
                let identity = identity.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    service.verify(&identity, "123456").await.unwrap()
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        let verified = outcomes.iter().filter(|o| o.is_verified()).count();
        assert_eq!(verified, 1, "round {}: {:?}", round, outcomes);
        assert!(outcomes.contains(&VerifyOutcome::NoCodeFound));
    }
    assert_eq!(store.len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_identities_are_independent() {
    let store = Arc::new(MockStore::new());
    let service = service(store.clone());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let identity = format!("user{}@x.com", i);
                service.issue(&identity).await.unwrap();
                service.verify(&identity, "123456").await.unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), VerifyOutcome::Verified);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_verifiers_one_winner() {
    let store = Arc::new(MockStore::new());
    let service = service(store.clone());
    service.issue("a@x.com").await.unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                service.verify("a@x.com", "123456").await.unwrap()
            })
        })
        .collect();

    let mut verified = 0;
    for handle in handles {
        match handle.await.unwrap() {
            VerifyOutcome::Verified => verified += 1,
            VerifyOutcome::NoCodeFound => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    assert_eq!(verified, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_issues_leave_one_whole_record() {
    for round in 0..20 {
        let store = Arc::new(MockStore::new());
        let service = Arc::new(
            OtpService::new(store.clone(), Arc::new(MockNotifier::new()), OtpServiceConfig::default())
                .unwrap()
                .with_generator(Arc::new(SequenceGenerator::default()))
                .with_clock(Arc::new(ManualClock::new(start_time()))),
        );

        let barrier = Arc::new(Barrier::new(6));
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let service = service.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    service.issue("a@x.com").await.unwrap()
                })
            })
            .collect();

        let mut receipts = Vec::new();
        for handle in handles {
            receipts.push(handle.await.unwrap());
        }

        assert_eq!(store.len(), 1);
        let stored = store.record("a@x.com").unwrap();
        assert!(
            receipts.iter().any(|r| r.record == stored),
            "round {}: stored record {:?} matches no issue",
            round,
            stored
        );

        for receipt in receipts.iter().filter(|r| r.record.code != stored.code) {
            assert_eq!(
                service.verify("a@x.com", &receipt.record.code).await.unwrap(),
                VerifyOutcome::IncorrectCode
            );
        }
        assert_eq!(
            service.verify("a@x.com", &stored.code).await.unwrap(),
            VerifyOutcome::Verified
        );
    }
}
