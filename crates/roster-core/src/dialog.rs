//! Dialog orchestrator.
//!
//! Three visibility flags (form, details, delete-confirm) share one targeted
//! record. The flags are independent: nothing stops more than one being set
//! at once, and the orchestrator does not try to prevent it.
//!
//! The targeted record is a read-only snapshot of the row that last opened a
//! dialog. The form pins the record it was opened on next to its
//! [`RecordDraft`], so opening details or a delete confirmation for another
//! row while the form is up never redirects the save. Only the validated
//! result of the draft is ever sent to the gateway. The form and the delete
//! confirmation each keep their own error message.
//!
//! Successful mutations return a [`Mutation`], which tells the caller to
//! reload the list. Failures leave the dialog open with the target and the
//! draft intact so the user can retry.

use std::fmt;

use tracing::{info, warn};

use crate::{
  Error, Result,
  gate::{Action, authorize},
  gateway::RecordGateway,
  record::{Field, Record, RecordDraft},
  session::Role,
  validate::validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
  Form,
  Details,
  DeleteConfirm,
}

impl fmt::Display for Dialog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Form => "form",
      Self::Details => "details",
      Self::DeleteConfirm => "delete confirmation",
    })
  }
}

/// Whether the form creates a new record or edits the targeted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit,
}

/// A write that the gateway acknowledged. The list must be reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
  Created,
  Updated,
  Deleted,
}

impl Mutation {
  pub fn message(self) -> &'static str {
    match self {
      Self::Created => "Record created",
      Self::Updated => "Record updated",
      Self::Deleted => "Record deleted",
    }
  }
}

#[derive(Debug, Default)]
pub struct DialogOrchestrator {
  form_open:    bool,
  details_open: bool,
  delete_open:  bool,
  target:       Option<Record>,
  /// The record the form edits; `None` in create mode.
  editing:      Option<Record>,
  draft:        RecordDraft,
  form_error:   Option<String>,
  delete_error: Option<String>,
}

impl DialogOrchestrator {
  pub fn new() -> Self { Self::default() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn is_form_open(&self) -> bool { self.form_open }

  pub fn is_details_open(&self) -> bool { self.details_open }

  pub fn is_delete_open(&self) -> bool { self.delete_open }

  pub fn is_any_open(&self) -> bool {
    self.form_open || self.details_open || self.delete_open
  }

  pub fn target(&self) -> Option<&Record> { self.target.as_ref() }

  pub fn draft(&self) -> &RecordDraft { &self.draft }

  /// The record the form was opened on in edit mode.
  pub fn editing(&self) -> Option<&Record> { self.editing.as_ref() }

  /// The message from the last failed form submission, if any.
  pub fn form_error(&self) -> Option<&str> { self.form_error.as_deref() }

  /// The message from the last failed delete, if any.
  pub fn delete_error(&self) -> Option<&str> { self.delete_error.as_deref() }

  pub fn form_mode(&self) -> FormMode {
    if self.editing.is_some() { FormMode::Edit } else { FormMode::Create }
  }

  // ── Opening and closing ───────────────────────────────────────────────────

  /// Open the form in create mode with an empty draft.
  pub fn open_create(&mut self, role: Role) -> Result<()> {
    authorize(role, Action::Create)?;
    self.target = None;
    self.editing = None;
    self.draft = RecordDraft::default();
    self.form_error = None;
    self.form_open = true;
    Ok(())
  }

  /// Open the form in edit mode, seeded from `record`.
  pub fn open_edit(&mut self, role: Role, record: &Record) -> Result<()> {
    authorize(role, Action::Edit)?;
    self.draft = RecordDraft::from(record);
    self.target = Some(record.clone());
    self.editing = Some(record.clone());
    self.form_error = None;
    self.form_open = true;
    Ok(())
  }

  pub fn open_details(&mut self, record: &Record) {
    self.target = Some(record.clone());
    self.details_open = true;
  }

  pub fn open_delete(&mut self, role: Role, record: &Record) -> Result<()> {
    authorize(role, Action::Delete)?;
    self.target = Some(record.clone());
    self.delete_error = None;
    self.delete_open = true;
    Ok(())
  }

  /// Close the form. Clears the target.
  pub fn close_form(&mut self) {
    self.form_open = false;
    self.target = None;
    self.editing = None;
    self.form_error = None;
  }

  /// Close the details view. The target is kept.
  pub fn close_details(&mut self) { self.details_open = false; }

  /// Close the delete confirmation. The target is kept.
  pub fn close_delete(&mut self) {
    self.delete_open = false;
    self.delete_error = None;
  }

  /// Close everything and forget the target and draft.
  pub fn clear(&mut self) { *self = Self::default(); }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
    self.draft.set(field, value);
  }

  pub fn draft_mut(&mut self) -> &mut RecordDraft { &mut self.draft }

  // ── Submission ────────────────────────────────────────────────────────────

  /// Validate the draft and send it to the gateway.
  ///
  /// Edits go to the record the form was opened on, whatever the target is
  /// now. On success the form closes and the target is cleared. On any
  /// failure the form stays open with its record and draft untouched and the
  /// message is kept in [`form_error`](Self::form_error).
  pub async fn submit_form<G: RecordGateway>(
    &mut self,
    gateway: &G,
    role: Role,
  ) -> Result<Mutation> {
    if !self.form_open {
      return Err(Error::DialogClosed(Dialog::Form));
    }
    let mode = self.form_mode();
    let action = match mode {
      FormMode::Create => Action::Create,
      FormMode::Edit => Action::Edit,
    };
    if let Err(e) = authorize(role, action) {
      self.form_error = Some(e.to_string());
      return Err(e);
    }

    let candidate = match validate(&self.draft) {
      Ok(candidate) => candidate,
      Err(violations) => {
        self.form_error = Some(violations.first().to_string());
        return Err(Error::Validation(violations));
      }
    };

    let outcome = match &self.editing {
      None => gateway
        .insert_record(candidate)
        .await
        .map(|record| {
          info!(id = %record.id, "record created");
          Mutation::Created
        }),
      Some(editing) => {
        let id = editing.id;
        gateway.update_record(id, candidate).await.map(|()| {
          info!(%id, "record updated");
          Mutation::Updated
        })
      }
    };

    match outcome {
      Ok(mutation) => {
        self.close_form();
        Ok(mutation)
      }
      Err(e) => {
        warn!(error = %e, ?mode, "saving record failed");
        self.form_error = Some(format!("Could not save record: {e}"));
        Err(e.into())
      }
    }
  }

  /// Delete the targeted record.
  ///
  /// On success the confirmation closes and the target is cleared; on failure
  /// both stay as they were.
  pub async fn confirm_delete<G: RecordGateway>(
    &mut self,
    gateway: &G,
    role: Role,
  ) -> Result<Mutation> {
    if !self.delete_open {
      return Err(Error::DialogClosed(Dialog::DeleteConfirm));
    }
    authorize(role, Action::Delete)?;
    let id = self.target.as_ref().map(|r| r.id).ok_or(Error::NoTarget)?;

    match gateway.delete_record(id).await {
      Ok(()) => {
        info!(%id, "record deleted");
        self.delete_open = false;
        self.target = None;
        self.delete_error = None;
        Ok(Mutation::Deleted)
      }
      Err(e) => {
        warn!(%id, error = %e, "deleting record failed");
        self.delete_error = Some(format!("Could not delete record: {e}"));
        Err(e.into())
      }
    }
  }
}
