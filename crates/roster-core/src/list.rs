//! List/filter controller.
//!
//! Owns the canonical collection and the search text. The derived view is
//! never stored: every read goes through [`derive_view`], so it is always in
//! step with both inputs. A load is split into [`ListController::begin_refresh`]
//! and [`ListController::finish_refresh`] so a presentation layer can show the
//! `Loading` state while the request is in flight; [`ListController::refresh`]
//! does both around one gateway call.

use tracing::{debug, info, warn};

use crate::{
  Result,
  gateway::{GatewayError, RecordGateway},
  record::{Record, RecordId},
  view::{Stats, derive_view},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
  #[default]
  Idle,
  Loading,
  Ready,
  Failed,
}

#[derive(Debug, Default)]
pub struct ListController {
  records:    Vec<Record>,
  filter:     String,
  load_state: LoadState,
  error:      Option<String>,
}

impl ListController {
  pub fn new() -> Self { Self::default() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The canonical collection, newest-created first.
  pub fn records(&self) -> &[Record] { &self.records }

  pub fn filter(&self) -> &str { &self.filter }

  /// The derived view.
  pub fn view(&self) -> Vec<&Record> { derive_view(&self.records, &self.filter) }

  pub fn view_len(&self) -> usize { self.view().len() }

  /// The `n`th record of the derived view.
  pub fn view_get(&self, n: usize) -> Option<&Record> { self.view().into_iter().nth(n) }

  pub fn find(&self, id: RecordId) -> Option<&Record> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn load_state(&self) -> LoadState { self.load_state }

  /// The message from the last failed load, until the next load starts.
  pub fn error(&self) -> Option<&str> { self.error.as_deref() }

  pub fn stats(&self) -> Stats { Stats::of(&self.records) }

  // ── Inputs ────────────────────────────────────────────────────────────────

  pub fn set_filter(&mut self, text: impl Into<String>) {
    self.filter = text.into();
    self.log_view();
  }

  /// Enter `Loading`. Valid from every state.
  pub fn begin_refresh(&mut self) {
    self.load_state = LoadState::Loading;
    self.error = None;
  }

  /// Apply the outcome of a `list_records` call started by
  /// [`begin_refresh`](Self::begin_refresh).
  ///
  /// Success replaces the collection wholesale. Failure leaves it untouched.
  /// An outcome arriving when no load is pending (the controller was cleared
  /// meanwhile) is dropped.
  pub fn finish_refresh(
    &mut self,
    outcome: Result<Vec<Record>, GatewayError>,
  ) -> Result<()> {
    if self.load_state != LoadState::Loading {
      debug!("dropping load result; no load pending");
      return Ok(());
    }
    match outcome {
      Ok(records) => {
        info!(count = records.len(), "records loaded");
        self.records = records;
        self.load_state = LoadState::Ready;
        self.log_view();
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "loading records failed");
        self.load_state = LoadState::Failed;
        self.error = Some(format!("Could not load records: {e}"));
        Err(e.into())
      }
    }
  }

  pub async fn refresh<G: RecordGateway>(&mut self, gateway: &G) -> Result<()> {
    self.begin_refresh();
    let outcome = gateway.list_records().await;
    self.finish_refresh(outcome)
  }

  /// Drop everything and return to `Idle`.
  pub fn clear(&mut self) { *self = Self::default(); }

  fn log_view(&self) {
    debug!(filter = %self.filter, shown = self.view_len(), total = self.records.len(), "view recomputed");
  }
}
