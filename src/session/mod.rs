//! Drives one form submission end to end: payload build, request, render,
//! with the busy flag held for the duration and released on every exit path.


use crate::client::PredictClient;
use crate::form::FormData;
use crate::payload::build_payload;
use crate::render::render_outcome;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A prediction is already in flight")]
    Busy,
}

/// Observer for the submission lifecycle. Plays the role the DOM plays in a
/// browser: `submit_started` is the "Predicting…" indicator, and
/// `submit_finished` always fires with the final line, success or not.
pub trait StatusSink: Send + Sync {
    fn submit_started(&self);
    fn submit_finished(&self, rendered: &str);
}

/// No-op sink for callers that only want the returned text.
pub struct SilentSink;

impl StatusSink for SilentSink {
    fn submit_started(&self) {}
    fn submit_finished(&self, _rendered: &str) {}
}

pub struct PredictionSession {
    client: PredictClient,
    inflight: Semaphore,
}

impl PredictionSession {
    pub fn new(client: PredictClient) -> Self {
        Self {
            client,
            // One submission in flight at a time; a second submit while the
            // permit is held is refused rather than queued.
            inflight: Semaphore::new(1),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inflight.available_permits() == 0
    }

    /// Submits one form. Request failures do not propagate: every outcome,
    /// including network and backend errors, comes back as the rendered
    /// line. The only error is an overlapping submission.
    pub async fn submit(
        &self,
        form: &FormData,
        sink: &dyn StatusSink,
    ) -> Result<String, SessionError> {
        let permit = self
            .inflight
            .try_acquire()
            .map_err(|_| SessionError::Busy)?;

        sink.submit_started();
        let payload = build_payload(form);
        let outcome = self.client.predict(&payload).await;
        let rendered = render_outcome(&outcome);

        info!(ok = outcome.is_ok(), "Submission finished");
        sink.submit_finished(&rendered);
        drop(permit);
        Ok(rendered)
    }
}
