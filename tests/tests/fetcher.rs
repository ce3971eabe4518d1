use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use txpage_clients::fixture::FixtureSet;
use txpage_core::errors::PagerError;
use txpage_core::network::Network;
use txpage_explorer::fetcher::{RpcSource, TransactionFetcher};
use txpage_tests::{init_logger, sequence_numbers, MockLedger};

fn rpc_fetcher(ledger: &Arc<MockLedger>) -> TransactionFetcher {
    TransactionFetcher::rpc(RpcSource::single(Network::Local, ledger.clone()))
}

#[tokio::test]
async fn first_page_is_newest_twenty() {
    init_logger();
    let ledger = Arc::new(MockLedger::seeded(45));
    let records = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 20, Some(1))
        .await
        .unwrap();
    assert_eq!(sequence_numbers(&records), (25..45).rev().collect::<Vec<_>>());
    assert_eq!(ledger.range_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.hydrate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn last_page_is_partial() {
    let ledger = Arc::new(MockLedger::seeded(45));
    let records = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 20, Some(3))
        .await
        .unwrap();
    assert_eq!(sequence_numbers(&records), vec![4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn page_beyond_the_end_shows_the_last_page() {
    let ledger = Arc::new(MockLedger::seeded(45));
    let records = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 20, Some(4))
        .await
        .unwrap();
    assert_eq!(sequence_numbers(&records), vec![4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn empty_ledger_makes_no_remote_calls() {
    let ledger = Arc::new(MockLedger::seeded(0));
    let records = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 0, 20, Some(1))
        .await
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(ledger.remote_calls(), 0);
}

#[tokio::test]
async fn invalid_range_makes_no_remote_calls() {
    let ledger = Arc::new(MockLedger::seeded(45));
    let err = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 0, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, PagerError::InvalidRange { .. }));
    assert_eq!(ledger.remote_calls(), 0);
}

#[tokio::test]
async fn range_failure_skips_hydration() {
    let ledger = Arc::new(MockLedger::seeded(45));
    ledger.fail_range(25, "connection reset by peer");
    let err = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 20, Some(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PagerError::Transport("connection reset by peer".to_string())
    );
    assert_eq!(ledger.hydrate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn misordered_hydration_is_a_transport_error() {
    let ledger = Arc::new(MockLedger::seeded(45));
    ledger.reverse_hydration(true);
    let err = rpc_fetcher(&ledger)
        .fetch(&Network::Local, 45, 20, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, PagerError::Transport(_)));
}

#[tokio::test(start_paused = true)]
async fn fixture_source_matches_remote_source() {
    let fixtures = FixtureSet::seeded(45);
    let ledger = Arc::new(MockLedger::new(&fixtures));
    let remote = rpc_fetcher(&ledger);
    let offline = TransactionFetcher::fixtures(fixtures, Duration::from_millis(500));
    assert_eq!(
        remote.sequence_count(&Network::Local).await.unwrap(),
        offline.sequence_count(&Network::Local).await.unwrap()
    );
    for page in [-1, 1, 2, 3, 4] {
        assert_eq!(
            remote.fetch(&Network::Local, 45, 20, Some(page)).await,
            offline.fetch(&Network::Local, 45, 20, Some(page)).await,
            "page {page}"
        );
    }
}
