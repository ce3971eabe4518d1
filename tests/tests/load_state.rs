use std::sync::Arc;
use std::time::Duration;
use txpage_core::errors::PagerError;
use txpage_core::network::Network;
use txpage_core::pagination::PageRequest;
use txpage_core::projection::ProjectionOptions;
use txpage_explorer::fetcher::{RpcSource, TransactionFetcher};
use txpage_explorer::state::{LoadState, LoadStateMachine};
use txpage_explorer::view::TransactionView;
use txpage_tests::{init_logger, sequence_numbers, MockLedger};

const TOTAL: u64 = 200;
const PAGE_SIZE: u64 = 20;

fn machine(ledger: &Arc<MockLedger>) -> Arc<LoadStateMachine> {
    let fetcher = TransactionFetcher::rpc(RpcSource::single(Network::Local, ledger.clone()));
    LoadStateMachine::new(Arc::new(fetcher), Network::Local)
}

fn page(page: u64) -> PageRequest {
    PageRequest::new(page, PAGE_SIZE, TOTAL).unwrap()
}

fn first_sequence(state: &LoadState) -> Option<u64> {
    state.records().and_then(|r| r.first()).map(|r| r.sequence_number)
}

#[tokio::test(start_paused = true)]
async fn slow_earlier_request_cannot_overwrite_later_one() {
    init_logger();
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    // page 2 covers [160, 180), page 5 covers [100, 120)
    ledger.delay_range(160, Duration::from_millis(300));
    ledger.delay_range(100, Duration::from_millis(10));
    let machine = machine(&ledger);
    let slow = machine.on_page_request(page(2));
    let fast = machine.on_page_request(page(5));
    tokio::join!(slow, fast);
    let state = machine.current();
    assert_eq!(first_sequence(&state), Some(119));
    assert_eq!(state.records().map(|r| r.len()), Some(20));
}

#[tokio::test(start_paused = true)]
async fn early_stale_resolution_leaves_state_pending() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    ledger.delay_range(160, Duration::from_millis(10));
    ledger.delay_range(100, Duration::from_millis(300));
    let machine = machine(&ledger);
    let first = machine.spawn_page_request(page(2));
    let second = machine.spawn_page_request(page(5));
    first.await.unwrap();
    assert!(machine.current().is_pending());
    second.await.unwrap();
    assert_eq!(first_sequence(&machine.current()), Some(119));
}

#[tokio::test(start_paused = true)]
async fn spawn_order_does_not_matter_once_issued() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    let machine = machine(&ledger);
    let older = machine.on_page_request(page(1));
    let newer = machine.on_page_request(page(3));
    newer.await;
    older.await;
    assert_eq!(first_sequence(&machine.current()), Some(159));
}

#[tokio::test(start_paused = true)]
async fn failure_discards_previous_page() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    let machine = machine(&ledger);
    machine.on_page_request(page(1)).await;
    assert!(machine.current().records().is_some());
    ledger.fail_range(160, "timed out");
    machine.on_page_request(page(2)).await;
    assert_eq!(
        machine.current(),
        LoadState::Failed(PagerError::Transport("timed out".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn teardown_discards_in_flight_resolution() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    ledger.delay_range(180, Duration::from_millis(200));
    let machine = machine(&ledger);
    let mut receiver = machine.subscribe();
    let handle = machine.spawn_page_request(page(1));
    tokio::time::sleep(Duration::from_millis(50)).await;
    machine.shutdown();
    handle.await.unwrap();
    let snapshot = machine.snapshot();
    assert!(snapshot.closed);
    assert!(snapshot.load.is_pending());
    assert!(receiver.borrow_and_update().is_pending());
    assert!(machine.begin(page(2)).is_none());
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_the_committed_state() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    ledger.delay_range(180, Duration::from_millis(100));
    let machine = machine(&ledger);
    let mut receiver = machine.subscribe();
    let handle = machine.spawn_page_request(page(1));
    receiver.changed().await.unwrap();
    let settled = machine.settled().await;
    handle.await.unwrap();
    assert_eq!(first_sequence(&settled), Some(199));
    assert_eq!(*receiver.borrow(), settled);
}

#[tokio::test(start_paused = true)]
async fn view_reports_count_failure() {
    let ledger = Arc::new(MockLedger::seeded(TOTAL));
    ledger.fail_count(true);
    let view = TransactionView::new(
        TransactionFetcher::rpc(RpcSource::single(Network::Local, ledger.clone())),
        Network::Local,
        PAGE_SIZE,
        ProjectionOptions::default(),
    )
    .unwrap();
    let state = view.mount(1).await;
    assert!(matches!(state, LoadState::Failed(PagerError::Transport(_))));
    assert!(view.rows().is_none());
    ledger.fail_count(false);
    view.refresh().await;
    assert_eq!(
        sequence_numbers(view.state().records().unwrap())[..3],
        [199, 198, 197]
    );
    assert_eq!(view.pagination().max_page, 10);
}
