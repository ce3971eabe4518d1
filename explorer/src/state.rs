use crate::fetcher::TransactionFetcher;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use txpage_core::errors::PagerError;
use txpage_core::ledger::TransactionRecord;
use txpage_core::network::Network;
use txpage_core::pagination::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded(Vec<TransactionRecord>),
    Failed(PagerError),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }
    pub fn records(&self) -> Option<&[TransactionRecord]> {
        match self {
            LoadState::Loaded(records) => Some(records),
            _ => None,
        }
    }
}

/// The committed state of one view. `token` names the most recent request
/// and `revision` increases on every observable change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagerState {
    pub token: u64,
    pub revision: u64,
    pub request: Option<PageRequest>,
    pub load: LoadState,
    pub closed: bool,
}

impl PagerState {
    pub fn is_current(&self, token: u64) -> bool {
        !self.closed && token == self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Requested {
        token: u64,
        request: PageRequest,
    },
    Resolved {
        token: u64,
        result: Result<Vec<TransactionRecord>, PagerError>,
    },
    /// The pending request `token` now targets `request`, e.g. once the
    /// sequence count it was issued against has been refreshed.
    Retargeted {
        token: u64,
        request: PageRequest,
    },
    TornDown,
}

/// Pure transition function. A resolution is committed only when it belongs
/// to the latest request and that request is still pending; anything else
/// leaves the state untouched.
pub fn reduce(state: PagerState, event: LoadEvent) -> PagerState {
    match event {
        LoadEvent::Requested { token, request } => {
            if state.closed || token <= state.token {
                return state;
            }
            PagerState {
                token,
                revision: state.revision + 1,
                request: Some(request),
                load: LoadState::Pending,
                closed: false,
            }
        }
        LoadEvent::Resolved { token, result } => {
            if !state.is_current(token) || !state.load.is_pending() {
                return state;
            }
            PagerState {
                revision: state.revision + 1,
                load: match result {
                    Ok(records) => LoadState::Loaded(records),
                    Err(e) => LoadState::Failed(e),
                },
                ..state
            }
        }
        LoadEvent::Retargeted { token, request } => {
            if !state.is_current(token) || !state.load.is_pending() {
                return state;
            }
            PagerState {
                revision: state.revision + 1,
                request: Some(request),
                ..state
            }
        }
        LoadEvent::TornDown => {
            if state.closed {
                return state;
            }
            PagerState {
                revision: state.revision + 1,
                closed: true,
                ..state
            }
        }
    }
}

/// Runs page requests through the fetcher and commits their results with
/// [`reduce`], publishing every committed [`LoadState`] to subscribers.
pub struct LoadStateMachine {
    fetcher: Arc<TransactionFetcher>,
    network: Network,
    state: Mutex<PagerState>,
    channel: watch::Sender<LoadState>,
}

impl LoadStateMachine {
    pub fn new(fetcher: Arc<TransactionFetcher>, network: Network) -> Arc<Self> {
        let (channel, _) = watch::channel(LoadState::Pending);
        Arc::new(LoadStateMachine {
            fetcher,
            network,
            state: Mutex::new(PagerState::default()),
            channel,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Applies `event`; returns whether anything observable changed.
    fn dispatch(&self, event: LoadEvent) -> bool {
        let mut state = self.state.lock();
        let previous = std::mem::take(&mut *state);
        let revision = previous.revision;
        *state = reduce(previous, event);
        if state.revision != revision {
            self.channel.send_replace(state.load.clone());
            true
        } else {
            false
        }
    }

    /// Issues the next token for `request` and moves to `Pending`.
    /// Returns `None` once the machine has been shut down.
    pub fn begin(&self, request: PageRequest) -> Option<u64> {
        let token = {
            let state = self.state.lock();
            if state.closed {
                return None;
            }
            state.token + 1
        };
        debug!("Request {token}: page {} of {}", request.page, request.max_page());
        self.dispatch(LoadEvent::Requested { token, request })
            .then_some(token)
    }

    /// Points the still pending request `token` at `request`.
    pub fn retarget(&self, token: u64, request: PageRequest) -> bool {
        self.dispatch(LoadEvent::Retargeted { token, request })
    }

    /// Commits the outcome of request `token`. Superseded results are dropped.
    pub fn commit(&self, token: u64, result: Result<Vec<TransactionRecord>, PagerError>) -> bool {
        let summary = match &result {
            Ok(records) => format!("{} records", records.len()),
            Err(e) => e.to_string(),
        };
        let committed = self.dispatch(LoadEvent::Resolved { token, result });
        if committed {
            match self.current() {
                LoadState::Failed(_) => warn!("Request {token} failed: {summary}"),
                _ => info!("Request {token} loaded {summary}"),
            }
        } else {
            debug!("Discarding superseded request {token} ({summary})");
        }
        committed
    }

    /// Starts `request`. The token is taken before this returns, so issuance
    /// order decides which request is current no matter how the returned
    /// futures are polled or in what order they complete.
    pub fn on_page_request(
        self: &Arc<Self>,
        request: PageRequest,
    ) -> impl Future<Output = ()> + Send + 'static {
        let token = self.begin(request);
        let machine = self.clone();
        async move {
            let Some(token) = token else {
                return;
            };
            let result = machine
                .fetcher
                .fetch_request(&machine.network, &request)
                .await;
            machine.commit(token, result);
        }
    }

    pub fn spawn_page_request(self: &Arc<Self>, request: PageRequest) -> JoinHandle<()> {
        tokio::spawn(self.on_page_request(request))
    }

    /// Treats every outstanding request as superseded from now on.
    pub fn shutdown(&self) {
        self.dispatch(LoadEvent::TornDown);
        debug!("Load state machine for {} shut down", self.network);
    }

    pub fn current(&self) -> LoadState {
        self.state.lock().load.clone()
    }

    pub fn snapshot(&self) -> PagerState {
        self.state.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.channel.subscribe()
    }

    /// Waits for the current request to leave `Pending`, or for shutdown.
    pub async fn settled(&self) -> LoadState {
        let mut receiver = self.subscribe();
        loop {
            let state = receiver.borrow_and_update().clone();
            if !state.is_pending() {
                return state;
            }
            let closed = self.state.lock().closed;
            if closed || receiver.changed().await.is_err() {
                return self.current();
            }
        }
    }
}
