//! # Catalog Session
//!
//! One continuous interaction with a catalog view: initial load, explicit
//! "load more" requests, full reloads and a live query. The session owns the
//! accumulated collection and publishes a snapshot on every transition.
//!
//! Phases:
//!
//! ```text
//! Idle -> LoadingInitial -> Ready <-> LoadingIncremental -> ... -> Complete
//!              |                            |
//!              +----------> Error <---------+
//! ```
//!
//! From `Error` the user either reloads or retries the same page. Failed
//! fetches never touch the collection, the cursor or `has_more`.
//!
//! Only one fetch may be in flight. The state lock is released while the
//! request is outstanding, so snapshot and filter reads stay responsive; the
//! `loading` flag rejects re-entry in the meantime.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::application::accumulator::Accumulator;
use crate::application::filter;
use crate::application::profile::CatalogProfile;
use crate::domain::Product;
use crate::infrastructure::catalog_error::CatalogError;
use crate::infrastructure::catalog_fetcher::CatalogSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing requested yet
    Idle,
    LoadingInitial,
    LoadingIncremental,
    /// Some pages loaded, more available
    Ready,
    /// Every record of the remote total has been requested
    Complete,
    /// Last fetch failed; previously loaded data is still there
    Error,
}

impl SessionPhase {
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::LoadingInitial | Self::LoadingIncremental)
    }
}

/// Observable state handed to the rendering layer
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[ts(type = "Array<Product>")]
    pub items: Arc<Vec<Product>>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
    #[ts(type = "number")]
    pub total_count: u64,
    pub phase: SessionPhase,
    pub query: String,
}

impl CatalogSnapshot {
    fn idle() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            loading: false,
            error: None,
            has_more: true,
            total_count: 0,
            phase: SessionPhase::Idle,
            query: String::new(),
        }
    }

    /// Items matching this snapshot's query under `profile`
    pub fn filtered<'a>(&'a self, profile: &CatalogProfile) -> Vec<&'a Product> {
        filter::filter(&self.items, &self.query, profile.search_fields())
    }
}

#[derive(Debug)]
struct SessionState {
    accumulator: Accumulator,
    phase: SessionPhase,
    loading: bool,
    error: Option<String>,
    /// Kind of the last fetch if it failed; the next `load_more` repeats it
    failed: Option<FetchKind>,
    query: String,
}

/// Which kind of fetch a request turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Offset 0; replaces the collection on success
    Initial,
    Incremental,
}

pub struct CatalogSession<S: CatalogSource + ?Sized> {
    id: Uuid,
    source: Arc<S>,
    profile: CatalogProfile,
    state: Mutex<SessionState>,
    snapshot_tx: watch::Sender<CatalogSnapshot>,
    closed: AtomicBool,
}

impl<S: CatalogSource + ?Sized> CatalogSession<S> {
    pub fn new(source: Arc<S>, profile: CatalogProfile) -> Self {
        let (snapshot_tx, _) = watch::channel(CatalogSnapshot::idle());
        let page_size = source.page_size();
        let id = Uuid::new_v4();
        debug!(
            "Catalog session {} created (profile={}, page_size={}, source={})",
            id,
            profile.name(),
            page_size,
            source.source_name()
        );

        Self {
            id,
            source,
            profile,
            state: Mutex::new(SessionState {
                accumulator: Accumulator::new(page_size),
                phase: SessionPhase::Idle,
                loading: false,
                error: None,
                failed: None,
                query: String::new(),
            }),
            snapshot_tx,
            closed: AtomicBool::new(false),
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn profile(&self) -> &CatalogProfile {
        &self.profile
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the page at the cursor and append it.
    ///
    /// Before anything was loaded this performs the initial load. After a
    /// failure it repeats the failed request: the same page, or offset 0
    /// when a reload failed. Once the remote total has been reached it does
    /// nothing; use [`Self::reload`].
    pub async fn load_more(&self) -> Result<(), CatalogError> {
        let (offset, kind) = {
            let mut state = self.state.lock().await;
            self.ensure_open()?;
            if state.loading {
                return Err(CatalogError::Busy);
            }

            let kind = if state.accumulator.pages_loaded() == 0
                || state.failed == Some(FetchKind::Initial)
            {
                FetchKind::Initial
            } else {
                FetchKind::Incremental
            };
            if kind == FetchKind::Incremental && !state.accumulator.has_more() {
                debug!("Catalog session {}: nothing left to load", self.id);
                return Ok(());
            }

            let offset = match kind {
                FetchKind::Initial => 0,
                FetchKind::Incremental => state.accumulator.offset(),
            };
            self.begin_fetch(&mut state, kind);
            (offset, kind)
        };

        self.run_fetch(offset, kind).await
    }

    /// Fetch the first page again and replace the collection with it.
    /// The current collection stays in place until the new page arrives.
    pub async fn reload(&self) -> Result<(), CatalogError> {
        {
            let mut state = self.state.lock().await;
            self.ensure_open()?;
            if state.loading {
                return Err(CatalogError::Busy);
            }
            self.begin_fetch(&mut state, FetchKind::Initial);
        }

        self.run_fetch(0, FetchKind::Initial).await
    }

    /// Replace the query; the filtered view follows on the next read
    pub async fn set_query(&self, query: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.query = query.into();
        self.publish(&state);
    }

    /// Items of the collection matching the current query
    pub async fn filtered_items(&self) -> Vec<Product> {
        let state = self.state.lock().await;
        filter::filter(
            state.accumulator.items(),
            &state.query,
            self.profile.search_fields(),
        )
        .into_iter()
        .cloned()
        .collect()
    }

    /// End the session. A fetch still in flight is discarded when it lands.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Catalog session {} closed", self.id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), CatalogError> {
        if self.is_closed() {
            Err(CatalogError::Closed)
        } else {
            Ok(())
        }
    }

    fn begin_fetch(&self, state: &mut SessionState, kind: FetchKind) {
        state.loading = true;
        state.phase = match kind {
            FetchKind::Initial => SessionPhase::LoadingInitial,
            FetchKind::Incremental => SessionPhase::LoadingIncremental,
        };
        self.publish(state);
    }

    async fn run_fetch(&self, offset: u64, kind: FetchKind) -> Result<(), CatalogError> {
        let outcome = self.source.fetch_page(offset).await;

        let mut state = self.state.lock().await;
        if self.is_closed() {
            debug!(
                "Catalog session {}: discarding page at offset {} after close",
                self.id, offset
            );
            return Ok(());
        }
        state.loading = false;

        match outcome {
            Ok(response) => {
                if !response.count_matches_records() {
                    warn!(
                        "Catalog session {}: page at offset {} declares {} records, received {}",
                        self.id,
                        offset,
                        response.count,
                        response.art_cat_m.len()
                    );
                }

                let page = response.into_page(self.profile.parse_options());
                if kind == FetchKind::Initial {
                    state.accumulator.reset();
                }
                state.accumulator.apply_page(page);
                state.error = None;
                state.failed = None;
                state.phase = if state.accumulator.has_more() {
                    SessionPhase::Ready
                } else {
                    SessionPhase::Complete
                };

                info!(
                    "Catalog session {}: {} of {} products loaded (has_more={})",
                    self.id,
                    state.accumulator.len(),
                    state.accumulator.total_count(),
                    state.accumulator.has_more()
                );
                self.publish(&state);
                Ok(())
            }
            Err(error) => {
                warn!(
                    "Catalog session {}: fetch at offset {} failed: {}",
                    self.id, offset, error
                );
                state.error = Some(error.to_string());
                state.failed = Some(kind);
                state.phase = SessionPhase::Error;
                self.publish(&state);
                Err(error)
            }
        }
    }

    fn publish(&self, state: &SessionState) {
        self.snapshot_tx.send_replace(CatalogSnapshot {
            items: state.accumulator.shared_items(),
            loading: state.loading,
            error: state.error.clone(),
            has_more: state.accumulator.has_more(),
            total_count: state.accumulator.total_count(),
            phase: state.phase,
            query: state.query.clone(),
        });
    }
}
