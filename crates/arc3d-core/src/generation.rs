//! AI model generation: the service contract and a tracker that polls
//! submitted jobs and drops finished models onto the canvas.

use crate::editor::Editor;
use crate::shapes::ElementId;
use crate::storage::BoxFuture;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Unknown job: {0}")]
    UnknownJob(String),
    #[error("Generation service error: {0}")]
    Service(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Look requested for a generated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStyle {
    #[default]
    Realistic,
    Stylized,
    LowPoly,
}

/// Identifiers of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    /// Our id for the job.
    pub job_id: String,
    /// The provider's id, used for polling.
    pub external_job_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JobStatus {
    Pending,
    Running { progress: u8 },
    Succeeded { model_url: String },
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded { .. } | JobStatus::Failed { .. })
    }
}

/// A text-to-3D provider.
pub trait GenerationService: Send + Sync {
    fn submit_job(&self, prompt: &str, style: GenerationStyle) -> BoxFuture<'_, GenerationResult<JobHandle>>;

    fn poll_status(&self, external_job_id: &str) -> BoxFuture<'_, GenerationResult<JobStatus>>;
}

/// A job waiting for its model.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingJob {
    pub handle: JobHandle,
    pub prompt: String,
    /// Where the finished model lands.
    pub origin: Point,
    pub progress: u8,
}

/// Terminal job transitions seen by [`GenerationTracker::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Completed { job_id: String, element_id: ElementId },
    Failed { job_id: String, reason: String },
}

/// Submits jobs and polls the pending ones.
pub struct GenerationTracker<G: GenerationService> {
    service: Arc<G>,
    pending: Vec<PendingJob>,
}

impl<G: GenerationService> GenerationTracker<G> {
    pub fn new(service: Arc<G>) -> Self {
        Self {
            service,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[PendingJob] {
        &self.pending
    }

    /// Submit a prompt; the finished model is placed at `origin`.
    pub async fn submit(&mut self, prompt: &str, style: GenerationStyle, origin: Point) -> GenerationResult<JobHandle> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        let handle = self.service.submit_job(prompt, style).await?;
        log::info!("Submitted generation job {} ({})", handle.job_id, handle.external_job_id);
        self.pending.push(PendingJob {
            handle: handle.clone(),
            prompt: prompt.to_string(),
            origin,
            progress: 0,
        });
        Ok(handle)
    }

    /// Poll every pending job once. Finished models are inserted into the
    /// editor as assets; failed jobs are dropped. A job whose poll errors
    /// stays pending for the next round.
    pub async fn poll(&mut self, editor: &mut Editor) -> Vec<GenerationEvent> {
        let mut events = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut job in std::mem::take(&mut self.pending) {
            let status = match self.service.poll_status(&job.handle.external_job_id).await {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("Polling job {} failed: {}", job.handle.job_id, e);
                    still_pending.push(job);
                    continue;
                }
            };
            match status {
                JobStatus::Pending => still_pending.push(job),
                JobStatus::Running { progress } => {
                    job.progress = progress.min(100);
                    still_pending.push(job);
                }
                JobStatus::Succeeded { model_url } => match editor.insert_asset(model_url, job.origin) {
                    Ok(element_id) => {
                        log::info!("Generation job {} finished as {}", job.handle.job_id, element_id);
                        events.push(GenerationEvent::Completed {
                            job_id: job.handle.job_id,
                            element_id,
                        });
                    }
                    Err(e) => events.push(GenerationEvent::Failed {
                        job_id: job.handle.job_id,
                        reason: e.to_string(),
                    }),
                },
                JobStatus::Failed { reason } => {
                    log::warn!("Generation job {} failed: {}", job.handle.job_id, reason);
                    events.push(GenerationEvent::Failed {
                        job_id: job.handle.job_id,
                        reason,
                    });
                }
            }
        }

        self.pending = still_pending;
        events
    }
}
