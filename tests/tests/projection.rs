use std::time::Duration;
use txpage_clients::fixture::FixtureSet;
use txpage_core::formatting::PLACEHOLDER;
use txpage_core::ledger::TransactionKind;
use txpage_core::network::Network;
use txpage_core::projection::{project, ProjectionOptions, RowStatus, UNKNOWN_AMOUNT};
use txpage_explorer::fetcher::TransactionFetcher;
use txpage_explorer::view::TransactionView;

#[tokio::test(start_paused = true)]
async fn loaded_page_projects_one_row_per_record() {
    let fixtures = FixtureSet::seeded(45);
    let view = TransactionView::new(
        TransactionFetcher::fixtures(fixtures.clone(), Duration::from_millis(500)),
        Network::Local,
        20,
        ProjectionOptions::default(),
    )
    .unwrap();
    view.mount(3).await;
    let now_ms = 1_700_000_000_000 + 60_000;
    let rows = view.rows_at(now_ms).unwrap();
    assert_eq!(rows.len(), 5);
    let genesis = rows.last().unwrap();
    assert_eq!(genesis.kind, TransactionKind::Genesis.label());
    assert_eq!(genesis.amount, UNKNOWN_AMOUNT);
    assert_eq!(genesis.gas, "0");
    assert_eq!(genesis.age, "1 min ago");
    assert_eq!(genesis.recipient.display, PLACEHOLDER);
}

#[test]
fn projection_is_stable_across_budgets() {
    let fixtures = FixtureSet::seeded(12);
    let records = fixtures.get_all_fixture_transactions();
    let wide = project(records, &ProjectionOptions::default().with_truncate_budget(0), 0);
    let narrow = project(records, &ProjectionOptions::default().with_truncate_budget(8), 0);
    for (w, n) in wide.iter().zip(&narrow) {
        assert_eq!(w.transaction.full, n.transaction.full);
        assert_eq!(w.transaction.display, w.transaction.full);
        assert_eq!(n.transaction.display.chars().count(), 8 + 3);
        assert_eq!(w.amount, n.amount);
    }
    let failed = &narrow[10];
    assert_eq!(failed.status, RowStatus::Failure);
    assert_eq!(
        failed.status_detail.as_deref(),
        Some("InsufficientCoinBalance")
    );
}
