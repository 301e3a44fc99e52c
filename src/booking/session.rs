//! A booking form session and its in-flight submission.
//!
//! The submission task only holds a weak reference to its session. Dropping the
//! session (expiry, explicit delete) aborts whatever is still pending, so a
//! visitor who leaves mid-submit does not leave work running.

use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::pricing::responses::QuoteResponse;
use crate::pricing::{BookingParameters, PricingConfig};

use super::controller::{BookingFormController, FormError, FormState};
use super::models::{Confirmation, ContactDetails, FieldEdit};
use super::submission::BookingSubmitter;

/// Aborts the task when dropped
#[derive(Debug)]
struct PendingSubmission(JoinHandle<()>);

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// One visitor's booking form.
#[derive(Debug)]
pub struct BookingSession {
    id: Uuid,
    controller: Mutex<BookingFormController>,
    pending: Mutex<Option<PendingSubmission>>,
}

impl BookingSession {
    pub fn new(id: Uuid, config: Arc<PricingConfig>) -> Self {
        Self {
            id,
            controller: Mutex::new(BookingFormController::new(config)),
            pending: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run `f` against the controller while holding its lock
    pub async fn with_controller<T>(&self, f: impl FnOnce(&mut BookingFormController) -> T) -> T {
        let mut controller = self.controller.lock().await;
        f(&mut controller)
    }

    pub async fn apply(&self, edits: Vec<FieldEdit>) -> Result<(), FormError> {
        let mut controller = self.controller.lock().await;
        for edit in edits {
            controller.apply(edit)?;
        }
        Ok(())
    }

    /// Freeze the form and send it in the background.
    ///
    /// Returns as soon as the form is in Submitting; the outcome lands in the
    /// controller when the submitter finishes.
    pub async fn submit(
        self: &Arc<Self>,
        submitter: Arc<dyn BookingSubmitter>,
    ) -> Result<(), FormError> {
        // Held until the handle is stored so cancel() and reset() see the task
        let mut pending = self.pending.lock().await;
        let request = self.controller.lock().await.begin_submission()?;
        info!(
            session = %self.id,
            total_due = %request.quote.total_due,
            "Booking submission started"
        );

        let session: Weak<Self> = Arc::downgrade(self);
        let id = self.id;
        let handle = tokio::spawn(async move {
            let outcome = submitter.submit(&request).await;

            let Some(session) = session.upgrade() else {
                debug!(session = %id, "Session gone before submission finished");
                return;
            };
            match &outcome {
                Ok(confirmation) => {
                    info!(session = %id, reference = %confirmation.reference, "Booking submitted")
                }
                Err(e) => warn!(session = %id, "Booking submission failed: {}", e),
            }
            let mut controller = session.controller.lock().await;
            if let Err(e) = controller.finish_submission(outcome) {
                debug!(session = %id, "Submission outcome ignored: {}", e);
            }
        });

        *pending = Some(PendingSubmission(handle));
        Ok(())
    }

    /// Abort an in-flight submission. Returns true if one was stopped.
    pub async fn cancel(&self) -> bool {
        let Some(pending) = self.pending.lock().await.take() else {
            return false;
        };
        let finished = pending.0.is_finished();
        drop(pending);

        let cancelled = !finished && self.controller.lock().await.cancel_submission().is_ok();
        if cancelled {
            info!(session = %self.id, "Booking submission cancelled");
        }
        cancelled
    }

    /// Cancel anything pending and blank the form.
    pub async fn reset(&self) -> Result<(), FormError> {
        self.cancel().await;
        self.controller.lock().await.reset()
    }

    pub async fn view(&self) -> SessionView {
        let controller = self.controller.lock().await;
        SessionView::new(self.id, &controller)
    }
}

/// Everything a presentation layer needs to draw the form
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    #[serde(skip)]
    pub state: FormState,
    #[serde(rename = "state")]
    pub state_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
    pub parameters: BookingParameters,
    pub contact: ContactDetails,
    pub quote: QuoteResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_error: Option<String>,
    pub missing_fields: Vec<&'static str>,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl SessionView {
    pub fn new(id: Uuid, controller: &BookingFormController) -> Self {
        Self {
            session_id: id,
            state: controller.state().clone(),
            state_name: controller.state().name(),
            confirmation: match controller.state() {
                FormState::Submitted(confirmation) => Some(confirmation.clone()),
                _ => None,
            },
            parameters: controller.params().clone(),
            contact: controller.contact().clone(),
            quote: QuoteResponse::from_breakdown(controller.quote(), controller.config()),
            date_error: controller.date_error(),
            animal_error: controller.animal_error().map(ToString::to_string),
            missing_fields: controller.missing_fields(),
            can_submit: controller.can_submit(),
            banner: controller.banner().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::models::BookingRequest;
    use crate::booking::submission::{SimulatedSubmitter, SubmissionError};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct FailingSubmitter;

    /// Confirms after `delay` and records that it got that far
    struct TrackingSubmitter {
        delay: Duration,
        completed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl BookingSubmitter for TrackingSubmitter {
        async fn submit(&self, request: &BookingRequest) -> Result<Confirmation, SubmissionError> {
            tokio::time::sleep(self.delay).await;
            self.completed.store(true, Ordering::SeqCst);
            Ok(Confirmation::for_request(request))
        }
    }

    fn tracking() -> (Arc<dyn BookingSubmitter>, Arc<AtomicBool>) {
        let completed = Arc::new(AtomicBool::new(false));
        let submitter = TrackingSubmitter {
            delay: Duration::from_millis(1500),
            completed: Arc::clone(&completed),
        };
        (Arc::new(submitter), completed)
    }

    #[async_trait]
    impl BookingSubmitter for FailingSubmitter {
        async fn submit(&self, _request: &BookingRequest) -> Result<Confirmation, SubmissionError> {
            Err(SubmissionError::Transient("HTTP 502".to_string()))
        }
    }

    fn edits() -> Vec<FieldEdit> {
        vec![
            FieldEdit::Name("Pat Outfitter".to_string()),
            FieldEdit::Email("pat@example.com".to_string()),
            FieldEdit::Phone("406-555-0199".to_string()),
            FieldEdit::StartDate(NaiveDate::from_ymd_opt(2025, 8, 10)),
            FieldEdit::EndDate(NaiveDate::from_ymd_opt(2025, 8, 12)),
        ]
    }

    async fn ready_session() -> Arc<BookingSession> {
        let session = Arc::new(BookingSession::new(
            Uuid::new_v4(),
            Arc::new(PricingConfig::default()),
        ));
        session.apply(edits()).await.unwrap();
        session
    }

    fn simulated() -> Arc<dyn BookingSubmitter> {
        Arc::new(SimulatedSubmitter::new(Duration::from_millis(1500)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_then_confirmed_after_delay() {
        let session = ready_session().await;
        session.submit(simulated()).await.unwrap();
        assert_eq!(session.view().await.state, FormState::Submitting);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let view = session.view().await;
        match view.state {
            FormState::Submitted(confirmation) => assert_eq!(confirmation.first_name, "Pat"),
            other => panic!("expected submitted, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_rejected_while_submitting() {
        let session = ready_session().await;
        session.submit(simulated()).await.unwrap();
        let result = session.apply(vec![FieldEdit::AnimalCount(5)]).await;
        assert_eq!(result, Err(FormError::NotEditable("submitting")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_to_editing() {
        let session = ready_session().await;
        session.submit(simulated()).await.unwrap();
        assert!(session.cancel().await);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let view = session.view().await;
        assert_eq!(view.state, FormState::Editing);
        assert_eq!(view.contact.name, "Pat Outfitter");
        assert!(!session.cancel().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_returns_to_editing_with_banner() {
        let session = ready_session().await;
        session.submit(Arc::new(FailingSubmitter)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let view = session.view().await;
        assert_eq!(view.state, FormState::Editing);
        assert!(view.banner.unwrap().contains("HTTP 502"));
        assert_eq!(view.parameters.end_date, NaiveDate::from_ymd_opt(2025, 8, 12));
        assert!(view.can_submit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_aborts_submission() {
        let session = ready_session().await;
        let (submitter, completed) = tracking();
        session.submit(submitter).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(session);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_runs_to_completion_while_session_lives() {
        let session = ready_session().await;
        let (submitter, completed) = tracking();
        session.submit(submitter).await.unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(completed.load(Ordering::SeqCst));
        assert!(matches!(session.view().await.state, FormState::Submitted(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_submitter() {
        let session = ready_session().await;
        let (submitter, completed) = tracking();
        session.submit(submitter).await.unwrap();
        assert!(session.cancel().await);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!completed.load(Ordering::SeqCst));
        assert_eq!(session.view().await.state, FormState::Editing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_right_after_submit_finds_task() {
        let session = ready_session().await;
        let (submitter, completed) = tracking();
        let (submitted, cancelled) = tokio::join!(session.submit(submitter), session.cancel());
        submitted.unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        if cancelled {
            assert!(!completed.load(Ordering::SeqCst));
            assert_eq!(session.view().await.state, FormState::Editing);
        } else {
            // cancel() ran before submit() began
            assert!(completed.load(Ordering::SeqCst));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_and_blanks() {
        let session = ready_session().await;
        session.submit(simulated()).await.unwrap();
        session.reset().await.unwrap();

        let view = session.view().await;
        assert_eq!(view.state, FormState::Editing);
        assert_eq!(view.parameters, BookingParameters::default());
        assert!(!view.quote.available);
    }

    #[tokio::test]
    async fn test_view_serializes_state_tag() {
        let session = ready_session().await;
        let json = serde_json::to_value(session.view().await).unwrap();
        assert_eq!(json["state"], "editing");
        assert_eq!(json["can_submit"], true);
        assert_eq!(json["quote"]["breakdown"]["trip_days"], 3);
        assert!(json.get("banner").is_none());
    }
}
