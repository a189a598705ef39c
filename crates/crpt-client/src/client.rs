//! SubmissionClient: rate-limited document registration.
//!
//! This client owns:
//! - The permit pool and the admission gate in front of it
//! - The replenish cycle (started on construction, stopped on shutdown)
//! - The transport used for the single registration call
//!
//! Each submission goes through `Created → AwaitingAdmission`, then either
//! `Rejected` or `Admitted → Completed → PermitPending → PermitReleased`.

use std::sync::Arc;

use tracing::Instrument;

use crate::admission::AdmissionGate;
use crate::config::ClientConfig;
use crate::document::{Document, SubmissionRequest};
use crate::error::{BuildError, SubmitError};
use crate::permit::PermitPool;
use crate::replenish::ReplenishCycle;
use crate::transport::{HttpTransport, Transport};

/// Raw result of a registration call: status code plus unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: String,
}

impl SubmissionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Snapshot of the permit pool for callers to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub capacity: usize,
    pub available: usize,
    /// Admitted permits whose delayed release has not fired yet.
    pub pending_releases: usize,
}

pub struct SubmissionClient {
    gate: AdmissionGate,
    cycle: ReplenishCycle,
    transport: Arc<dyn Transport>,
}

impl SubmissionClient {
    /// Create a client posting to `config.endpoint` over HTTPS.
    ///
    /// Must be called from within a tokio runtime, which drives the replenish
    /// cycle and the delayed releases.
    pub fn new(config: ClientConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let transport = HttpTransport::new(config.endpoint.clone(), config.request_timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, BuildError> {
        config.validate()?;
        let handle = tokio::runtime::Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let pool = Arc::new(PermitPool::new(config.request_limit));
        let cycle = ReplenishCycle::start(&handle, Arc::clone(&pool), config.time_unit);
        let gate = AdmissionGate::new(pool, config.admission_timeout, config.release_delay);

        tracing::debug!(
            request_limit = config.request_limit,
            time_unit = ?config.time_unit,
            release_delay = ?config.release_delay,
            "Submission client started"
        );

        Ok(Self {
            gate,
            cycle,
            transport,
        })
    }

    /// Submit a signed document.
    ///
    /// Waits at most the admission timeout for a permit. Once admitted, the
    /// permit is returned one release delay after it was taken, whatever the
    /// outcome of the call.
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResponse, SubmitError> {
        if self.cycle.is_stopped() {
            return Err(SubmitError::ShutDown);
        }

        let submission_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "submit",
            %submission_id,
            doc_id = %request.document().doc_id
        );

        async {
            let permit = self.gate.admit().await?;
            let result = self.perform(request).await;
            // Schedules the delayed release; unwinding drops it just the same.
            drop(permit);

            match &result {
                Ok(response) => tracing::info!(
                    status = response.status,
                    body = %response.body,
                    "Document submitted"
                ),
                Err(e) => tracing::warn!(error = %e, "Document submission failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Submit `document` signed with `signature`.
    pub async fn create_document(
        &self,
        document: &Document,
        signature: &str,
    ) -> Result<SubmissionResponse, SubmitError> {
        self.submit(&SubmissionRequest::new(document.clone(), signature))
            .await
    }

    async fn perform(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResponse, SubmitError> {
        let body = serde_json::to_vec(request.document())?;
        let response = self
            .transport
            .post_document(body, request.signature())
            .await?;

        if !response.is_success() {
            return Err(SubmitError::Remote {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let pool = self.gate.pool();
        PoolSnapshot {
            capacity: pool.capacity(),
            available: pool.available(),
            pending_releases: self.gate.pending_releases(),
        }
    }

    /// Stop the replenish cycle. Safe to call more than once.
    ///
    /// Delayed releases already scheduled still fire. New submissions are
    /// refused with [`SubmitError::ShutDown`].
    pub fn shutdown(&self) {
        if self.cycle.stop() {
            tracing::info!("Submission client shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.cycle.is_stopped()
    }
}
