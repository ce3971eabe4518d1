use crate::fetcher::TransactionFetcher;
use crate::state::{LoadState, LoadStateMachine};
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use txpage_core::errors::PagerError;
use txpage_core::network::Network;
use txpage_core::pagination::{clamp_page, max_page, PageRequest};
use txpage_core::projection::{project, DisplayRow, ProjectionOptions};
use txpage_core::query::page_query;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub total_count: u64,
    pub page_size: u64,
    pub max_page: u64,
}

impl Pagination {
    fn new(page: u64, total_count: u64, page_size: u64) -> Self {
        Pagination {
            page: clamp_page(Some(i64::try_from(page).unwrap_or(i64::MAX)), total_count, page_size),
            total_count,
            page_size,
            max_page: max_page(total_count, page_size),
        }
    }
    fn request(&self) -> Result<PageRequest, PagerError> {
        PageRequest::new(self.page, self.page_size, self.total_count)
    }
}

#[derive(Debug, Copy, Clone)]
struct Position {
    pagination: Pagination,
    /// Whether `pagination.total_count` came from the ledger.
    counted: bool,
    /// Count queries in flight. Page changes made meanwhile are applied by
    /// the refresh that finishes the query.
    counting: usize,
}

enum PageChange<F> {
    Load(F),
    AwaitRefresh,
    Refresh,
    Ignore,
}

struct ViewShared {
    machine: Arc<LoadStateMachine>,
    fetcher: Arc<TransactionFetcher>,
    network: Network,
    position: Mutex<Position>,
}

impl ViewShared {
    async fn refresh(self: Arc<Self>) -> LoadState {
        let token = {
            let mut position = self.position.lock();
            let Some(token) = position
                .pagination
                .request()
                .ok()
                .and_then(|r| self.machine.begin(r))
            else {
                return self.machine.current();
            };
            position.counting += 1;
            token
        };
        let counted = self.fetcher.sequence_count(&self.network).await;
        let pagination = {
            let mut position = self.position.lock();
            position.counting -= 1;
            if let Ok(total_count) = counted {
                let current = position.pagination;
                position.pagination =
                    Pagination::new(current.page, total_count, current.page_size);
                position.counted = true;
            }
            position.pagination
        };
        let result = match counted {
            Ok(total_count) => {
                info!(
                    "{} has {total_count} transactions ({} pages)",
                    self.network, pagination.max_page
                );
                match pagination.request() {
                    Ok(request) => {
                        self.machine.retarget(token, request);
                        self.fetcher.fetch_request(&self.network, &request).await
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        self.machine.commit(token, result);
        self.machine.current()
    }
}

/// Transaction table controller for a single network: the current page, the
/// last known sequence count and the load lifecycle of the visible page.
pub struct TransactionView {
    shared: Arc<ViewShared>,
    options: ProjectionOptions,
}

impl TransactionView {
    pub fn new(
        fetcher: TransactionFetcher,
        network: Network,
        page_size: u64,
        options: ProjectionOptions,
    ) -> Result<Self, PagerError> {
        let pagination = Pagination::new(1, 0, page_size);
        pagination.request()?;
        let fetcher = Arc::new(fetcher);
        Ok(TransactionView {
            shared: Arc::new(ViewShared {
                machine: LoadStateMachine::new(fetcher.clone(), network.clone()),
                fetcher,
                network,
                position: Mutex::new(Position {
                    pagination,
                    counted: false,
                    counting: 0,
                }),
            }),
            options,
        })
    }

    pub fn network(&self) -> &Network {
        &self.shared.network
    }

    /// Loads the sequence count, then `initial_page`.
    pub async fn mount(&self, initial_page: u64) -> LoadState {
        self.shared.position.lock().pagination.page = initial_page.max(1);
        self.shared.clone().refresh().await
    }

    /// Re-queries the sequence count and reloads the current page. A count
    /// failure is committed as the page's failure.
    pub async fn refresh(&self) -> LoadState {
        self.shared.clone().refresh().await
    }

    /// The page-change callback. Once the count is known the page is clamped
    /// against it and the request is issued before this returns. While a count
    /// query is in flight the page is only recorded and loaded by that
    /// refresh; before any count has been seen the returned future refreshes.
    pub fn set_page(&self, page: u64) -> impl Future<Output = ()> + Send + 'static {
        let shared = self.shared.clone();
        let change = {
            let mut position = shared.position.lock();
            if position.counting > 0 || !position.counted {
                position.pagination.page = page.max(1);
                if position.counting > 0 {
                    debug!("Page {page} deferred until the sequence count arrives");
                    PageChange::AwaitRefresh
                } else {
                    PageChange::Refresh
                }
            } else {
                let current = position.pagination;
                position.pagination = Pagination::new(page, current.total_count, current.page_size);
                if position.pagination.page != page {
                    debug!("Clamped page {page} to {}", position.pagination.page);
                }
                match position.pagination.request() {
                    Ok(request) => PageChange::Load(shared.machine.on_page_request(request)),
                    Err(_) => PageChange::Ignore,
                }
            }
        };
        async move {
            match change {
                PageChange::Load(load) => load.await,
                PageChange::AwaitRefresh => {
                    shared.machine.settled().await;
                }
                PageChange::Refresh => {
                    shared.refresh().await;
                }
                PageChange::Ignore => {}
            }
        }
    }

    pub fn spawn_page(&self, page: u64) -> JoinHandle<()> {
        tokio::spawn(self.set_page(page))
    }

    pub fn pagination(&self) -> Pagination {
        self.shared.position.lock().pagination
    }

    /// The request the current (or last committed) load was made for.
    pub fn current_request(&self) -> Option<PageRequest> {
        self.shared.machine.snapshot().request
    }

    pub fn page_query(&self) -> String {
        page_query(self.pagination().page)
    }

    pub fn state(&self) -> LoadState {
        self.shared.machine.current()
    }

    pub async fn settled(&self) -> LoadState {
        self.shared.machine.settled().await
    }

    pub fn rows(&self) -> Option<Vec<DisplayRow>> {
        let now_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        self.rows_at(u64::try_from(now_ms).unwrap_or_default())
    }

    /// Rows of the loaded page with ages measured from `now_ms`.
    pub fn rows_at(&self, now_ms: u64) -> Option<Vec<DisplayRow>> {
        self.shared
            .machine
            .current()
            .records()
            .map(|records| project(records, &self.options, now_ms))
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.shared.machine.subscribe()
    }

    pub fn close(&self) {
        self.shared.machine.shutdown();
    }
}

impl Drop for TransactionView {
    fn drop(&mut self) {
        self.close();
    }
}
