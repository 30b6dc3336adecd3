//! SQLite-backed Claim Tests
//!
//! File databases with a real connection pool, so concurrent writers go
//! through SQLite's locking rather than a single connection.

use claimq_core::application::{ClaimService, EventBus, ResolveRequest};
use claimq_core::domain::{ConsumerId, ContainerId, ProductId, Resolution, UserId};
use claimq_core::port::{ManualTimeProvider, SharedSecretGate, SystemTimeProvider, TimeProvider};
use claimq_infra_sqlite::{
    create_pool, run_migrations, SqliteAssignmentRepository, SqliteTransientStore,
};
use claimq_infra_woocommerce::LocalProductCreator;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const USER: UserId = UserId::new(1);

async fn service_at(path: &Path, clock: Arc<dyn TimeProvider>) -> Arc<ClaimService> {
    let pool = create_pool(&format!("sqlite://{}", path.display()))
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();

    Arc::new(ClaimService::new(
        Arc::new(SqliteTransientStore::new(pool.clone(), clock.clone())),
        Arc::new(SqliteAssignmentRepository::new(pool)),
        Arc::new(LocalProductCreator::new("http://shop.test", 501)),
        Arc::new(SharedSecretGate::open()),
        clock,
        EventBus::default(),
    ))
}

fn render(container: &str, consumer: &str) -> ResolveRequest {
    ResolveRequest {
        container: Some(ContainerId::parse(container).unwrap()),
        consumer: ConsumerId::parse(consumer).unwrap(),
        user: USER,
    }
}

#[tokio::test]
async fn test_end_to_end_scenario_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_at(&dir.path().join("claims.db"), Arc::new(SystemTimeProvider)).await;

    service.queue().enqueue(USER, ProductId::new(501)).await.unwrap();

    assert_eq!(
        service.resolve(render("postA", "w1")).await.unwrap(),
        Resolution::Claimed(ProductId::new(501))
    );
    assert_eq!(
        service.resolve(render("postA", "w1")).await.unwrap(),
        Resolution::Existing(ProductId::new(501))
    );
    assert_eq!(
        service.resolve(render("postB", "w2")).await.unwrap(),
        Resolution::Unassigned
    );
    assert_eq!(service.assignment_count().await.unwrap(), 1);
}

/// One entry, two resolvers on separate connections: exactly one wins
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_entry_race_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_at(&dir.path().join("race.db"), Arc::new(SystemTimeProvider)).await;

    for round in 0..20u64 {
        let id = ProductId::new(1_000 + round);
        service.queue().enqueue(USER, id).await.unwrap();

        let a = {
            let svc = service.clone();
            let req = render(&format!("postA{}", round), "w1");
            tokio::spawn(async move { svc.resolve(req).await })
        };
        let b = {
            let svc = service.clone();
            let req = render(&format!("postB{}", round), "w2");
            tokio::spawn(async move { svc.resolve(req).await })
        };

        let results = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
        let claimed = results
            .iter()
            .filter(|r| **r == Resolution::Claimed(id))
            .count();

        assert_eq!(claimed, 1, "round {}: {:?}", round, results);
        assert!(
            results.contains(&Resolution::Unassigned),
            "round {}: {:?}",
            round,
            results
        );
    }

    assert_eq!(service.assignment_count().await.unwrap(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_drain_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_at(&dir.path().join("drain.db"), Arc::new(SystemTimeProvider)).await;

    for id in 1..=6 {
        service.queue().enqueue(USER, ProductId::new(id)).await.unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..10 {
        let svc = service.clone();
        handles.push(tokio::spawn(async move {
            svc.resolve(render(&format!("post{}", i), "w")).await
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        if let Resolution::Claimed(id) = handle.await.unwrap().unwrap() {
            assert!(seen.insert(id), "{} claimed twice", id);
        }
    }

    assert_eq!(seen.len(), 6);
    assert!(service.pending(USER).await.unwrap().is_empty());
}

/// A burst far larger than the pool: every resolve is a claim or unassigned
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_resolver_burst_on_sqlite_never_errors() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_at(&dir.path().join("burst.db"), Arc::new(SystemTimeProvider)).await;

    for id in 1..=40 {
        service.queue().enqueue(USER, ProductId::new(id)).await.unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..120 {
        let svc = service.clone();
        handles.push(tokio::spawn(async move {
            svc.resolve(render(&format!("post{}", i), "w")).await
        }));
    }

    let mut seen = HashSet::new();
    let mut unassigned = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(Resolution::Claimed(id)) => assert!(seen.insert(id), "{} claimed twice", id),
            Ok(Resolution::Unassigned) => unassigned += 1,
            other => panic!("unexpected {:?}", other),
        }
    }

    assert_eq!(seen.len(), 40);
    assert_eq!(unassigned, 80);
    assert_eq!(service.assignment_count().await.unwrap(), 40);
    assert!(service.pending(USER).await.unwrap().is_empty());
}

/// Producers and resolvers racing on one queue: every entry lands exactly once
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_enqueue_and_resolve_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_at(&dir.path().join("mixed.db"), Arc::new(SystemTimeProvider)).await;

    let mut producers = Vec::new();
    for id in 1..=60 {
        let svc = service.clone();
        producers.push(tokio::spawn(async move {
            svc.queue().enqueue(USER, ProductId::new(id)).await
        }));
    }
    let mut resolvers = Vec::new();
    for i in 0..100 {
        let svc = service.clone();
        resolvers.push(tokio::spawn(async move {
            svc.resolve(render(&format!("post{}", i), "w")).await
        }));
    }

    for handle in producers {
        handle.await.unwrap().unwrap();
    }
    let mut landed = Vec::new();
    for handle in resolvers {
        match handle.await.unwrap().unwrap() {
            Resolution::Claimed(id) => landed.push(id.get()),
            Resolution::Unassigned => {}
            other => panic!("unexpected {:?}", other),
        }
    }
    landed.extend(service.pending(USER).await.unwrap().iter().map(|id| id.get()));

    landed.sort_unstable();
    assert_eq!(landed, (1..=60).collect::<Vec<_>>());
}

/// Queue and assignments survive a restart; the TTL keeps counting
#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persist.db");
    let clock = Arc::new(ManualTimeProvider::new(1_700_000_000_000));

    {
        let service = service_at(&path, clock.clone()).await;
        service.queue().enqueue(USER, ProductId::new(501)).await.unwrap();
        service.queue().enqueue(USER, ProductId::new(502)).await.unwrap();
        service.resolve(render("postA", "w1")).await.unwrap();
    }

    let service = service_at(&path, clock.clone()).await;
    assert_eq!(
        service.resolve(render("postA", "w1")).await.unwrap(),
        Resolution::Existing(ProductId::new(501))
    );
    assert_eq!(
        service.pending(USER).await.unwrap(),
        vec![ProductId::new(502)]
    );

    clock.advance(service.queue().ttl_ms());
    assert_eq!(
        service.resolve(render("postB", "w2")).await.unwrap(),
        Resolution::Unassigned
    );
    assert_eq!(service.purge_expired().await.unwrap(), 1);
    assert_eq!(
        service.resolve(render("postA", "w1")).await.unwrap(),
        Resolution::Existing(ProductId::new(501))
    );
}
