// Refresh coordinator - Per-server status state machine
use crate::application::status_client::StatusClient;
use crate::domain::error::ClientError;
use crate::domain::server::ServerRecord;
use crate::domain::status::ServerStatusSnapshot;
use futures::Stream;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshState {
    Loading,
    Success(Arc<ServerStatusSnapshot>),
    Error(String),
}

impl RefreshState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RefreshState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// User-visible refresh: show loading and drop cached data first.
    Foreground,
    /// Background refresh: keep whatever is displayed until a result arrives.
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer fetch had already been applied.
    Stale,
    /// A foreground refresh was already loading.
    Skipped,
}

pub struct RefreshCoordinator {
    record: RwLock<ServerRecord>,
    client: Arc<StatusClient>,
    state_tx: watch::Sender<RefreshState>,
    last_known_good: Mutex<Option<Arc<ServerStatusSnapshot>>>,
    last_error: Mutex<Option<ClientError>>,
    issued_seq: AtomicU64,
    applied_seq: Mutex<u64>,
    foreground_in_flight: AtomicBool,
}

impl RefreshCoordinator {
    pub fn new(record: ServerRecord, client: Arc<StatusClient>) -> Self {
        let (state_tx, _) = watch::channel(RefreshState::Loading);
        Self {
            record: RwLock::new(record),
            client,
            state_tx,
            last_known_good: Mutex::new(None),
            last_error: Mutex::new(None),
            issued_seq: AtomicU64::new(0),
            applied_seq: Mutex::new(0),
            foreground_in_flight: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.record().id
    }

    pub fn record(&self) -> ServerRecord {
        match self.record.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Point the coordinator at an edited record. The id never changes.
    pub fn update_record(&self, mut record: ServerRecord) {
        let mut guard = match self.record.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        record.id = guard.id;
        *guard = record;
    }

    pub fn state(&self) -> RefreshState {
        self.state_tx.borrow().clone()
    }

    /// Last successful snapshot, kept across silent failures.
    pub fn last_known_good(&self) -> Option<Arc<ServerStatusSnapshot>> {
        lock(&self.last_known_good).clone()
    }

    pub fn last_error(&self) -> Option<ClientError> {
        lock(&self.last_error).clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state_tx.subscribe()
    }

    /// Stream of states, starting with the current one.
    pub fn changes(&self) -> impl Stream<Item = RefreshState> + Send + use<> {
        let mut rx = self.subscribe();
        async_stream::stream! {
            let current = rx.borrow_and_update().clone();
            yield current;
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                yield next;
            }
        }
    }

    pub async fn refresh(&self, mode: RefreshMode) -> RefreshOutcome {
        let _in_flight = match mode {
            RefreshMode::Foreground => {
                if self.foreground_in_flight.swap(true, Ordering::SeqCst) {
                    tracing::debug!("Foreground refresh of {} already in flight", self.id());
                    return RefreshOutcome::Skipped;
                }
                *lock(&self.last_known_good) = None;
                *lock(&self.last_error) = None;
                self.state_tx.send_replace(RefreshState::Loading);
                Some(InFlightGuard(&self.foreground_in_flight))
            }
            RefreshMode::Silent => None,
        };

        let seq = self.issued_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let record = self.record();
        let result = self
            .client
            .fetch_status(&record.address, record.variant, record.explicit_port())
            .await;

        self.apply(seq, &record, result)
    }

    fn apply(
        &self,
        seq: u64,
        record: &ServerRecord,
        result: Result<ServerStatusSnapshot, ClientError>,
    ) -> RefreshOutcome {
        let mut applied = lock(&self.applied_seq);
        if seq < *applied {
            tracing::debug!(
                "Discarding stale status for {} (fetch {} < applied {})",
                record.name,
                seq,
                *applied
            );
            return RefreshOutcome::Stale;
        }
        *applied = seq;

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *lock(&self.last_known_good) = Some(snapshot.clone());
                *lock(&self.last_error) = None;
                tracing::debug!("{} refreshed (online: {})", record.name, snapshot.online);
                self.state_tx.send_replace(RefreshState::Success(snapshot));
            }
            Err(e) => {
                tracing::debug!("Status refresh of {} failed: {}", record.name, e);
                let message = e.user_message();
                *lock(&self.last_error) = Some(e);
                self.state_tx.send_replace(RefreshState::Error(message));
            }
        }

        RefreshOutcome::Applied
    }
}

/// Clears the foreground flag when the refresh ends, including when its
/// future is dropped mid-fetch.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
