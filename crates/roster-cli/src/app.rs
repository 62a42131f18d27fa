//! Application state and key dispatcher.
//!
//! Everything that matters lives in the [`Dashboard`]; this layer only adds
//! what the terminal needs on top: cursors, the search prompt and a status
//! line.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  Error,
  dashboard::{Dashboard, Route},
  gate::AuthEvent,
  record::{Field, Record, Status},
};

use crate::client::ApiClient;

/// Which part of the screen receives keys. Derived from the dashboard's
/// dialog flags; when several are set, the form wins, then the delete
/// confirmation, then details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  SignIn,
  List,
  Search,
  Details,
  Form,
  DeleteConfirm,
}

pub struct App {
  pub dashboard:     Dashboard<Arc<ApiClient>, Arc<ApiClient>>,
  /// Cursor within the derived view.
  pub list_cursor:   usize,
  /// Field under the cursor in the form dialog.
  pub form_cursor:   usize,
  /// Whether keys go to the search prompt.
  pub search_active: bool,
  /// One-line message shown in the status bar.
  pub status_msg:    String,
}

impl App {
  pub fn new(client: Arc<ApiClient>) -> Self {
    Self {
      dashboard:     Dashboard::new(client.clone(), client),
      list_cursor:   0,
      form_cursor:   0,
      search_active: false,
      status_msg:    String::new(),
    }
  }

  pub fn client(&self) -> &ApiClient { self.dashboard.gateway() }

  pub fn focus(&self) -> Focus {
    let dialogs = self.dashboard.dialogs();
    if self.dashboard.route() == Route::SignIn {
      Focus::SignIn
    } else if dialogs.is_form_open() {
      Focus::Form
    } else if dialogs.is_delete_open() {
      Focus::DeleteConfirm
    } else if dialogs.is_details_open() {
      Focus::Details
    } else if self.search_active {
      Focus::Search
    } else {
      Focus::List
    }
  }

  /// The record under the list cursor.
  pub fn cursor_record(&self) -> Option<&Record> {
    self.dashboard.list().view_get(self.list_cursor)
  }

  pub fn form_field(&self) -> Field { Field::ALL[self.form_cursor] }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Establish the session and load the list.
  pub async fn start(&mut self) {
    self.status_msg = "Loading records…".into();
    let result = self.dashboard.start().await;
    self.report(result.map(|_| ()), "");
  }

  async fn sign_in(&mut self) {
    self.status_msg = "Signing in…".into();
    let signed_in = self.client().sign_in().await;
    match signed_in {
      Ok(session) => {
        let result = self.dashboard.handle_auth_event(AuthEvent::SignedIn(session)).await;
        self.list_cursor = 0;
        self.report(result.map(|_| ()), "");
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.focus() {
      Focus::SignIn => return Ok(self.handle_sign_in_key(key).await),
      Focus::List => return Ok(self.handle_list_key(key).await),
      Focus::Search => self.handle_search_key(key),
      Focus::Details => self.handle_details_key(key),
      Focus::Form => self.handle_form_key(key).await,
      Focus::DeleteConfirm => self.handle_delete_key(key).await,
    }
    Ok(true)
  }

  async fn handle_sign_in_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return false,
      KeyCode::Enter => self.sign_in().await,
      _ => {}
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let mut text = self.dashboard.list().filter().to_owned();
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        text.clear();
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        text.pop();
      }
      KeyCode::Char(c) => text.push(c),
      _ => return,
    }
    self.dashboard.set_search(text);
    self.list_cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.dashboard.list().view_len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Char('/') => {
        self.search_active = true;
      }
      KeyCode::Char('r') => {
        self.status_msg = "Loading records…".into();
        let result = self.dashboard.refresh().await;
        self.report(result, "");
        self.clamp_cursor();
      }
      KeyCode::Char('s') => {
        let result = self.dashboard.sign_out().await;
        self.list_cursor = 0;
        self.report(result.map(|_| ()), "Signed out");
      }

      KeyCode::Enter => {
        if let Some(id) = self.cursor_record().map(|r| r.id) {
          let result = self.dashboard.open_details(id);
          self.report(result, "");
        }
      }
      KeyCode::Char('a') => self.open_create(),
      KeyCode::Char('e') => self.open_edit(),
      KeyCode::Char('d') => self.open_delete(),
      _ => {}
    }
    true
  }

  fn handle_details_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.dashboard.close_details(),
      KeyCode::Char('e') => {
        self.dashboard.close_details();
        self.open_edit();
      }
      KeyCode::Char('d') => {
        self.dashboard.close_details();
        self.open_delete();
      }
      _ => {}
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let field = self.form_field();
    match key.code {
      KeyCode::Esc => self.dashboard.close_form(),
      KeyCode::Enter => {
        let result = self.dashboard.submit_form().await;
        match result {
          Ok(mutation) => {
            self.status_msg = mutation.message().into();
            self.clamp_cursor();
          }
          // The dialog shows validation and save errors itself.
          Err(Error::Validation(_) | Error::Transport(_)) => {}
          Err(e) => self.report(Err(e), ""),
        }
      }
      KeyCode::Down | KeyCode::Tab => {
        self.form_cursor = (self.form_cursor + 1) % Field::ALL.len();
      }
      KeyCode::Up | KeyCode::BackTab => {
        self.form_cursor = (self.form_cursor + Field::ALL.len() - 1) % Field::ALL.len();
      }
      KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field == Field::Status => {
        let next = self
          .dashboard
          .dialogs()
          .draft()
          .status
          .parse::<Status>()
          .map(Status::toggled)
          .unwrap_or(Status::Active);
        self.dashboard.set_field(Field::Status, next.as_str());
      }
      KeyCode::Backspace if field != Field::Status => {
        self.dashboard.draft_mut().get_mut(field).pop();
      }
      KeyCode::Char(c) if field != Field::Status => {
        self.dashboard.draft_mut().get_mut(field).push(c);
      }
      _ => {}
    }
  }

  async fn handle_delete_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => match self.dashboard.confirm_delete().await {
        Ok(mutation) => {
          self.status_msg = mutation.message().into();
          self.clamp_cursor();
        }
        Err(Error::Transport(_)) => {}
        Err(e) => self.report(Err(e), ""),
      },
      KeyCode::Char('n') | KeyCode::Esc => self.dashboard.close_delete(),
      _ => {}
    }
  }

  // ── Dialog openers ────────────────────────────────────────────────────────

  fn open_create(&mut self) {
    let result = self.dashboard.open_create();
    self.form_cursor = 0;
    self.report(result, "");
  }

  fn open_edit(&mut self) {
    if let Some(id) = self.cursor_record().map(|r| r.id) {
      let result = self.dashboard.open_edit(id);
      self.form_cursor = 0;
      self.report(result, "");
    }
  }

  fn open_delete(&mut self) {
    if let Some(id) = self.cursor_record().map(|r| r.id) {
      let result = self.dashboard.open_delete(id);
      self.report(result, "");
    }
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Put the outcome of an action in the status bar.
  fn report(&mut self, result: roster_core::Result<()>, success: &str) {
    self.status_msg = match result {
      Ok(()) => self
        .dashboard
        .list()
        .error()
        .map(str::to_owned)
        .unwrap_or_else(|| success.to_owned()),
      Err(Error::SessionExpired) => {
        self.search_active = false;
        self.list_cursor = 0;
        "Session expired. Press Enter to sign in again.".into()
      }
      Err(e) => format!("Error: {e}"),
    };
  }

  fn clamp_cursor(&mut self) {
    let len = self.dashboard.list().view_len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }
}
