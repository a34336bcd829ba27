// services/sentiment-dash/src/controller/submit.rs
//
// Submission coordinator: draft editing, client-side guards, and the full
// refresh that follows an accepted submission

use std::sync::Arc;

use tracing::{info, warn};

use svckit::errors::{ApiError, ValidationError};
use svckit::types::{Department, FeedbackRecord, NewFeedbackDraft};

use super::{ControllerEvent, DashboardController};
use crate::state::{DataCategory, FormField, LogLevel, NoticeLevel};

pub const SUCCESS_NOTICE: &str = "Feedback submitted successfully!";
pub const FAILURE_NOTICE: &str = "Error submitting feedback. Please try again.";

impl DashboardController {
    pub fn draft(&self) -> &NewFeedbackDraft {
        &self.state.draft
    }

    // The form is locked while a submission is in flight, so a reset on
    // success never wipes text typed after pressing submit.

    pub fn set_employee_id(&mut self, value: &str) {
        if !self.state.submitting {
            self.state.draft.employee_id = value.to_string();
        }
    }

    pub fn set_feedback_text(&mut self, value: &str) {
        if !self.state.submitting {
            self.state.draft.feedback_text = value.to_string();
        }
    }

    pub fn set_department(&mut self, department: Department) {
        if !self.state.submitting {
            self.state.draft.department = department;
        }
    }

    pub fn focus_next_field(&mut self) {
        self.state.form_focus = self.state.form_focus.next();
    }

    pub fn focus_prev_field(&mut self) {
        self.state.form_focus = self.state.form_focus.prev();
    }

    /// Type a character into the focused text field.
    pub fn type_char(&mut self, c: char) {
        if self.state.submitting {
            return;
        }
        match self.state.form_focus {
            FormField::EmployeeId => self.state.draft.employee_id.push(c),
            FormField::FeedbackText => self.state.draft.feedback_text.push(c),
            FormField::Department => {}
        }
    }

    pub fn delete_char(&mut self) {
        if self.state.submitting {
            return;
        }
        match self.state.form_focus {
            FormField::EmployeeId => {
                self.state.draft.employee_id.pop();
            }
            FormField::FeedbackText => {
                self.state.draft.feedback_text.pop();
            }
            FormField::Department => {}
        }
    }

    pub fn cycle_draft_department(&mut self, forward: bool) {
        let current = self.state.draft.department;
        self.set_department(if forward { current.next() } else { current.prev() });
    }

    /// Validate and send the current draft. Validation failures are
    /// reported here and nothing is sent; the server's verdict arrives later
    /// as a `Submitted` event.
    pub fn submit(&mut self) -> Result<(), ValidationError> {
        if self.state.submitting {
            return Err(self.reject(ValidationError::SubmissionPending));
        }

        let submission = self.state.draft.validate().map_err(|err| self.reject(err))?;

        info!(
            "Submitting feedback for {} ({} chars)",
            submission.department,
            submission.feedback_text.len()
        );
        self.state.submitting = true;

        let backend = Arc::clone(&self.backend);
        self.spawn_request(
            async move { backend.submit_feedback(&submission).await },
            Box::new(|result| ControllerEvent::Submitted { result }),
        );
        Ok(())
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        warn!("Submission rejected locally: {}", err);
        self.state.raise_notice(NoticeLevel::Invalid, &err.to_string());
        err
    }

    pub(super) fn apply_submitted(&mut self, result: Result<FeedbackRecord, ApiError>) {
        self.state.submitting = false;
        self.note_reachability(&result);

        match result {
            Ok(record) => {
                self.state.draft = NewFeedbackDraft::default();
                self.state.form_focus = FormField::default();

                info!("Feedback {} stored as {}", record.id, record.sentiment);
                self.state.add_log(
                    LogLevel::Info,
                    &format!(
                        "New {} feedback from {} classified {}",
                        record.department,
                        display_employee(&record),
                        record.sentiment
                    ),
                );

                // Every view, not just the active one, must reflect the new entry.
                self.invalidate(&DataCategory::ALL);
                self.state.raise_notice(NoticeLevel::Success, SUCCESS_NOTICE);
            }
            Err(err) => {
                warn!("Error submitting feedback: {}", err);
                self.state
                    .add_log(LogLevel::Error, &format!("Error submitting feedback: {}", err));
                self.state.raise_notice(NoticeLevel::Failure, FAILURE_NOTICE);
            }
        }
    }
}

fn display_employee(record: &FeedbackRecord) -> &str {
    match record.employee_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => "anonymous employee",
    }
}
