//! The client-side intake flow
//!
//! `Idle → Collecting → Uploading → SubmittingRecord → Success`, with any
//! failure landing in `Failed` until the notice is dismissed. Submitting is a
//! sequential two-phase operation: the record is only sent once the photo
//! upload succeeded, and nothing is rolled back if the record then fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use gemquote_core::models::QueueEstimate;

use crate::controller::{IntakeController, Subscription};
use crate::error::{OrchestratorError, TransportError};
use crate::estimator::{EtaEstimator, QueueEstimator};
use crate::form::{IntakeForm, SubmitBlocker};
use crate::transport::IntakeTransport;

/// The only failure text a visitor ever sees.
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again in a minute.";

/// Shown in place of a figure that is unavailable.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    Collecting,
    Uploading,
    SubmittingRecord,
    Success {
        record_id: String,
        photo_url: String,
        queue_position: Option<u32>,
        eta_hours: u32,
    },
    Failed {
        notice: &'static str,
    },
    Closed,
}

impl IntakeState {
    pub fn name(&self) -> &'static str {
        match self {
            IntakeState::Idle => "idle",
            IntakeState::Collecting => "collecting",
            IntakeState::Uploading => "uploading",
            IntakeState::SubmittingRecord => "submitting_record",
            IntakeState::Success { .. } => "success",
            IntakeState::Failed { .. } => "failed",
            IntakeState::Closed => "closed",
        }
    }

    /// A request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, IntakeState::Uploading | IntakeState::SubmittingRecord)
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Upload,
    Record,
}

fn failed(phase: Phase, error: TransportError) -> IntakeState {
    tracing::warn!(error = %error, phase = ?phase, status = ?error.status(), "Intake failed");
    IntakeState::Failed {
        notice: FAILURE_NOTICE,
    }
}

/// Owns the state while a submit is outstanding. If the submit is dropped
/// before it settles, the flow fails instead of staying in flight.
struct InFlight<'a> {
    state: &'a mut IntakeState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut IntakeState) -> Self {
        *state = IntakeState::Uploading;
        InFlight {
            state,
            settled: false,
        }
    }

    fn advance(&mut self, next: IntakeState) {
        *self.state = next;
    }

    fn settle(mut self, outcome: IntakeState) {
        *self.state = outcome;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(state = self.state.name(), "Submit abandoned while in flight");
            *self.state = IntakeState::Failed {
                notice: FAILURE_NOTICE,
            };
        }
    }
}

pub struct IntakeOrchestrator {
    transport: Arc<dyn IntakeTransport>,
    queue: Arc<dyn QueueEstimator>,
    eta: Arc<dyn EtaEstimator>,
    user_agent: Option<String>,
    state: IntakeState,
    form: IntakeForm,
    queue_estimate: Option<QueueEstimate>,
    open_requested: Arc<AtomicBool>,
}

impl IntakeOrchestrator {
    pub fn new(
        transport: Arc<dyn IntakeTransport>,
        queue: Arc<dyn QueueEstimator>,
        eta: Arc<dyn EtaEstimator>,
    ) -> Self {
        IntakeOrchestrator {
            transport,
            queue,
            eta,
            user_agent: None,
            state: IntakeState::Idle,
            form: IntakeForm::default(),
            queue_estimate: None,
            open_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sent as `userAgent` with every record.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    /// The form is editable only while collecting.
    pub fn form_mut(&mut self) -> Result<&mut IntakeForm, OrchestratorError> {
        match self.state {
            IntakeState::Collecting => Ok(&mut self.form),
            ref state if state.is_in_flight() => Err(OrchestratorError::InFlight),
            ref state => Err(OrchestratorError::NotCollecting(state.name())),
        }
    }

    /// Today's simulated queue figures, read when the intake opened.
    pub fn queue_estimate(&self) -> Option<QueueEstimate> {
        self.queue_estimate
    }

    /// Make this orchestrator the owner of the intake: open requests sent
    /// through `controller` are applied on the next [`poll_open_request`](Self::poll_open_request).
    pub fn subscribe(&self, controller: &dyn IntakeController) -> Subscription {
        let requested = self.open_requested.clone();
        controller.on_open(Box::new(move || requested.store(true, Ordering::SeqCst)))
    }

    /// Apply a pending open request. Returns whether one was pending.
    pub fn poll_open_request(&mut self) -> bool {
        if self.open_requested.swap(false, Ordering::SeqCst) {
            self.open();
            true
        } else {
            false
        }
    }

    /// Start collecting a fresh form. No effect while the intake is already open.
    pub fn open(&mut self) -> &IntakeState {
        if matches!(self.state, IntakeState::Idle | IntakeState::Closed) {
            self.form = IntakeForm::default();
            self.queue_estimate = self.queue.get_or_create(Utc::now().date_naive());
            self.state = IntakeState::Collecting;
            tracing::debug!(queue = ?self.queue_estimate, "Intake opened");
        }
        &self.state
    }

    /// Close the intake, discarding the form. Refused while a request is outstanding.
    pub fn close(&mut self) -> Result<(), OrchestratorError> {
        if self.state.is_in_flight() {
            return Err(OrchestratorError::InFlight);
        }
        self.form = IntakeForm::default();
        self.state = IntakeState::Closed;
        Ok(())
    }

    /// Acknowledge the failure notice and return to the form, values intact.
    pub fn dismiss_notice(&mut self) {
        if matches!(self.state, IntakeState::Failed { .. }) {
            self.state = IntakeState::Collecting;
        }
    }

    /// Whether submit is currently available, and if not, why.
    pub fn can_submit(&self) -> Result<(), OrchestratorError> {
        match &self.state {
            IntakeState::Collecting => {}
            state if state.is_in_flight() => return Err(OrchestratorError::InFlight),
            state => return Err(OrchestratorError::NotCollecting(state.name())),
        }
        match self.form.blocker() {
            Some(blocker) => Err(OrchestratorError::Blocked(blocker)),
            None => Ok(()),
        }
    }

    /// Upload the photo, then record the submission.
    ///
    /// Transport failures are not errors of this call: they move the flow to
    /// `Failed` and are reported through the returned state. `Err` means the
    /// submit was refused before anything was sent. Dropping the returned
    /// future before it completes also leaves the flow in `Failed`.
    pub async fn submit(&mut self) -> Result<&IntakeState, OrchestratorError> {
        self.can_submit()?;
        let Some(photo) = self.form.photo.as_ref() else {
            return Err(OrchestratorError::Blocked(SubmitBlocker::MissingPhoto));
        };

        let mut flight = InFlight::begin(&mut self.state);
        let uploaded = match self.transport.upload_photo(photo).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                flight.settle(failed(Phase::Upload, e));
                return Ok(&self.state);
            }
        };

        flight.advance(IntakeState::SubmittingRecord);
        let payload = self
            .form
            .to_payload(&uploaded.url, self.user_agent.as_deref());
        let submitted = match self.transport.submit_record(&payload).await {
            Ok(submitted) => submitted,
            Err(e) => {
                // The uploaded photo stays where it is.
                tracing::warn!(pathname = %uploaded.pathname, "Photo orphaned by failed record");
                flight.settle(failed(Phase::Record, e));
                return Ok(&self.state);
            }
        };

        let queue_position = self
            .queue_estimate
            .or_else(|| self.queue.get_or_create(Utc::now().date_naive()))
            .map(|estimate| estimate.next);
        let eta_hours = self.eta.eta_hours();

        tracing::info!(
            record_id = %submitted.id,
            queue_position = ?queue_position,
            eta_hours,
            "Intake submitted"
        );

        flight.settle(IntakeState::Success {
            record_id: submitted.id,
            photo_url: uploaded.url,
            queue_position,
            eta_hours,
        });
        Ok(&self.state)
    }

    /// The blocking notice, while one is showing.
    pub fn notice(&self) -> Option<&'static str> {
        match self.state {
            IntakeState::Failed { notice } => Some(notice),
            _ => None,
        }
    }

    /// "You’re #7 in today’s beta. ETA ≈ 15h." once submitted.
    pub fn confirmation(&self) -> Option<String> {
        match &self.state {
            IntakeState::Success {
                queue_position,
                eta_hours,
                ..
            } => {
                let position = queue_position
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string());
                Some(format!(
                    "You’re #{} in today’s beta. ETA ≈ {}h.",
                    position, eta_hours
                ))
            }
            _ => None,
        }
    }

    /// Slots left today, or a placeholder when the estimate is unavailable.
    pub fn slots_left_display(&self) -> String {
        self.queue_estimate
            .map(|estimate| estimate.left.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SharedIntakeController;
    use crate::form::PhotoFile;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use gemquote_core::models::{Channel, SubmissionPayload, SubmitResponse, UploadResponse};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTransport {
        fail_upload: bool,
        fail_submit: bool,
        hang_upload: bool,
        hang_submit: bool,
        calls: Mutex<Vec<&'static str>>,
        payloads: Mutex<Vec<SubmissionPayload>>,
    }

    impl FakeTransport {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IntakeTransport for FakeTransport {
        async fn upload_photo(&self, photo: &PhotoFile) -> Result<UploadResponse, TransportError> {
            self.calls.lock().unwrap().push("upload");
            if self.hang_upload {
                std::future::pending::<()>().await;
            }
            if self.fail_upload {
                return Err(TransportError::Status {
                    status: 500,
                    message: "Upload failed".to_string(),
                });
            }
            Ok(UploadResponse {
                url: format!("https://blobs.test/uploads/abc-{}", photo.filename),
                pathname: format!("uploads/abc-{}", photo.filename),
            })
        }

        async fn submit_record(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<SubmitResponse, TransportError> {
            self.calls.lock().unwrap().push("submit");
            self.payloads.lock().unwrap().push(payload.clone());
            if self.hang_submit {
                std::future::pending::<()>().await;
            }
            if self.fail_submit {
                return Err(TransportError::Status {
                    status: 500,
                    message: "Submit failed".to_string(),
                });
            }
            Ok(SubmitResponse {
                ok: true,
                id: "submissions/2026-10-18-abc.json".to_string(),
            })
        }
    }

    struct FixedQueue(Option<QueueEstimate>);

    impl QueueEstimator for FixedQueue {
        fn get_or_create(&self, _date: NaiveDate) -> Option<QueueEstimate> {
            self.0
        }

        fn daily_limit(&self) -> u32 {
            30
        }
    }

    struct FixedEta(u32);

    impl EtaEstimator for FixedEta {
        fn eta_hours(&self) -> u32 {
            self.0
        }
    }

    fn orchestrator(transport: Arc<FakeTransport>, queue: Option<QueueEstimate>) -> IntakeOrchestrator {
        IntakeOrchestrator::new(transport, Arc::new(FixedQueue(queue)), Arc::new(FixedEta(15)))
            .with_user_agent("gemquote-tests")
    }

    fn fill(orchestrator: &mut IntakeOrchestrator) {
        let form = orchestrator.form_mut().unwrap();
        form.photo = Some(PhotoFile::new("ring.jpg", Some("image/jpeg".to_string()), vec![1; 16]));
        form.email = "maker@example.com".to_string();
        form.channel = Some(Channel::Etsy);
        form.hours = Some(1.5);
    }

    #[tokio::test]
    async fn happy_path_uploads_then_records() {
        let transport = Arc::new(FakeTransport::default());
        let mut intake = orchestrator(transport.clone(), Some(QueueEstimate::new(7, 30)));

        intake.open();
        assert_eq!(intake.slots_left_display(), "23");
        fill(&mut intake);

        let state = intake.submit().await.unwrap().clone();
        assert_eq!(transport.calls(), vec!["upload", "submit"]);
        assert_eq!(
            state,
            IntakeState::Success {
                record_id: "submissions/2026-10-18-abc.json".to_string(),
                photo_url: "https://blobs.test/uploads/abc-ring.jpg".to_string(),
                queue_position: Some(7),
                eta_hours: 15,
            }
        );
        assert_eq!(
            intake.confirmation().as_deref(),
            Some("You’re #7 in today’s beta. ETA ≈ 15h.")
        );

        let payloads = transport.payloads.lock().unwrap();
        assert_eq!(
            payloads[0].photo_url.as_deref(),
            Some("https://blobs.test/uploads/abc-ring.jpg")
        );
        assert_eq!(payloads[0].user_agent.as_deref(), Some("gemquote-tests"));
        assert_eq!(payloads[0].channel.as_deref(), Some("Etsy"));
    }

    #[tokio::test]
    async fn upload_failure_never_sends_the_record() {
        let transport = Arc::new(FakeTransport {
            fail_upload: true,
            ..Default::default()
        });
        let mut intake = orchestrator(transport.clone(), None);
        intake.open();
        fill(&mut intake);

        let state = intake.submit().await.unwrap().clone();

        assert_eq!(transport.calls(), vec!["upload"]);
        assert_eq!(state, IntakeState::Failed { notice: FAILURE_NOTICE });
        assert_eq!(intake.notice(), Some(FAILURE_NOTICE));
    }

    #[tokio::test]
    async fn record_failure_fails_and_retry_runs_both_phases() {
        let transport = Arc::new(FakeTransport {
            fail_submit: true,
            ..Default::default()
        });
        let mut intake = orchestrator(transport.clone(), None);
        intake.open();
        fill(&mut intake);

        intake.submit().await.unwrap();
        assert_eq!(intake.state().name(), "failed");

        intake.dismiss_notice();
        assert_eq!(intake.state(), &IntakeState::Collecting);
        assert_eq!(intake.form().email, "maker@example.com");

        intake.submit().await.unwrap();
        assert_eq!(transport.calls(), vec!["upload", "submit", "upload", "submit"]);
    }

    #[tokio::test]
    async fn abandoned_submit_leaves_intake_usable() {
        for (hang_upload, hang_submit) in [(true, false), (false, true)] {
            let transport = Arc::new(FakeTransport {
                hang_upload,
                hang_submit,
                ..Default::default()
            });
            let mut intake = orchestrator(transport, None);
            intake.open();
            fill(&mut intake);

            let timed_out =
                tokio::time::timeout(std::time::Duration::from_millis(50), intake.submit()).await;
            assert!(timed_out.is_err());

            assert_eq!(intake.state(), &IntakeState::Failed { notice: FAILURE_NOTICE });
            intake.dismiss_notice();
            assert_eq!(intake.form().email, "maker@example.com");

            intake.close().unwrap();
            intake.open();
            assert_eq!(intake.state(), &IntakeState::Collecting);
        }
    }

    #[tokio::test]
    async fn incomplete_form_is_refused_before_any_request() {
        let transport = Arc::new(FakeTransport::default());
        let mut intake = orchestrator(transport.clone(), None);

        assert_eq!(
            intake.submit().await.unwrap_err(),
            OrchestratorError::NotCollecting("idle")
        );

        intake.open();
        intake.form_mut().unwrap().email = "maker@example.com".to_string();
        assert_eq!(
            intake.submit().await.unwrap_err(),
            OrchestratorError::Blocked(SubmitBlocker::MissingPhoto)
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_estimate_renders_placeholder() {
        let transport = Arc::new(FakeTransport::default());
        let mut intake = orchestrator(transport, None);
        intake.open();
        assert_eq!(intake.slots_left_display(), PLACEHOLDER);
        fill(&mut intake);

        intake.submit().await.unwrap();
        assert_eq!(
            intake.confirmation().as_deref(),
            Some("You’re #— in today’s beta. ETA ≈ 15h.")
        );
    }

    #[test]
    fn close_resets_and_reopen_starts_fresh() {
        let mut intake = orchestrator(Arc::new(FakeTransport::default()), None);
        intake.open();
        intake.form_mut().unwrap().email = "maker@example.com".to_string();

        intake.close().unwrap();
        assert_eq!(intake.state(), &IntakeState::Closed);
        assert!(intake.form_mut().is_err());

        intake.open();
        assert_eq!(intake.form().email, "");
    }

    #[test]
    fn controller_requests_open_the_intake() {
        let controller = SharedIntakeController::new();
        let mut intake = orchestrator(Arc::new(FakeTransport::default()), None);
        let _subscription = intake.subscribe(&controller);

        assert!(!intake.poll_open_request());
        controller.open();
        assert!(intake.poll_open_request());
        assert_eq!(intake.state(), &IntakeState::Collecting);
    }
}
