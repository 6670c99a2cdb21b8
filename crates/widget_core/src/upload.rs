//! Upload workflow: a pure reducer over [`UploadState`] plus the async driver
//! that fetches the policy, submits the file and feeds results back as events.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{
    domain::{Video, VideoState},
    error::ErrorReason,
    protocol::UploadPolicy,
};
use tracing::{debug, info, warn};

use crate::{navigation::Route, video_cache::VideoUpdater, UploadBackend, UploadFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    PolicyReady(UploadPolicy),
    PolicyError,
    Uploading,
    UploadError,
    Success,
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::PolicyError | UploadState::UploadError | UploadState::Success
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    PolicyReceived(UploadPolicy),
    PolicyFailed,
    FileSelected,
    StorageAccepted,
    StorageFailed,
}

/// Coarse status exposed to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Unset,
    PolicyError,
    Uploading,
    UploadError,
    Success,
}

impl From<&UploadState> for UploadStatus {
    fn from(state: &UploadState) -> Self {
        match state {
            UploadState::Idle | UploadState::PolicyReady(_) => UploadStatus::Unset,
            UploadState::PolicyError => UploadStatus::PolicyError,
            UploadState::Uploading => UploadStatus::Uploading,
            UploadState::UploadError => UploadStatus::UploadError,
            UploadState::Success => UploadStatus::Success,
        }
    }
}

/// What the form screen renders for a given workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormView {
    UploadForm,
    /// Dashboard rendered in place with its "uploading" indicator on.
    UploadingDashboard,
    Redirect(Route),
}

impl From<&UploadState> for FormView {
    fn from(state: &UploadState) -> Self {
        match state {
            UploadState::Idle | UploadState::PolicyReady(_) => FormView::UploadForm,
            UploadState::Uploading => FormView::UploadingDashboard,
            UploadState::PolicyError => FormView::Redirect(Route::Error(ErrorReason::Policy)),
            UploadState::UploadError => FormView::Redirect(Route::Error(ErrorReason::Upload)),
            UploadState::Success => FormView::Redirect(Route::Dashboard),
        }
    }
}

/// All transitions of the upload workflow. Events that do not apply to the
/// current state leave it unchanged; a fresh policy replaces an unused one.
pub fn reduce(state: UploadState, event: UploadEvent) -> UploadState {
    match (state, event) {
        (UploadState::Idle | UploadState::PolicyReady(_), UploadEvent::PolicyReceived(policy)) => {
            UploadState::PolicyReady(policy)
        }
        (UploadState::Idle | UploadState::PolicyReady(_), UploadEvent::PolicyFailed) => {
            UploadState::PolicyError
        }
        (UploadState::PolicyReady(_), UploadEvent::FileSelected) => UploadState::Uploading,
        (UploadState::Uploading, UploadEvent::StorageAccepted) => UploadState::Success,
        (UploadState::Uploading, UploadEvent::StorageFailed) => UploadState::UploadError,
        (state, _) => state,
    }
}

/// Shared flag cleared when the owning view goes away.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UploadWorkflow {
    backend: Arc<dyn UploadBackend>,
    updater: Arc<dyn VideoUpdater>,
    video: Video,
    state: UploadState,
    liveness: Liveness,
}

impl UploadWorkflow {
    pub fn new(
        backend: Arc<dyn UploadBackend>,
        updater: Arc<dyn VideoUpdater>,
        video: Video,
    ) -> Self {
        Self {
            backend,
            updater,
            video,
            state: UploadState::Idle,
            liveness: Liveness::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn status(&self) -> UploadStatus {
        UploadStatus::from(&self.state)
    }

    pub fn view(&self) -> FormView {
        FormView::from(&self.state)
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    /// Handle that can unmount this workflow from elsewhere, e.g. while a
    /// request is in flight.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn unmount(&self) {
        self.liveness.unmount();
    }

    fn apply(&mut self, event: UploadEvent) {
        let previous = UploadStatus::from(&self.state);
        let state = std::mem::replace(&mut self.state, UploadState::Idle);
        self.state = reduce(state, event);
        debug!(
            video_id = %self.video.id,
            from = ?previous,
            to = ?self.status(),
            "upload workflow transition"
        );
    }

    pub async fn acquire_policy(&mut self) -> UploadStatus {
        if !self.liveness.is_alive() {
            debug!(video_id = %self.video.id, "workflow unmounted; skipping policy request");
            return self.status();
        }
        if !matches!(self.state, UploadState::Idle | UploadState::PolicyReady(_)) {
            warn!(video_id = %self.video.id, status = ?self.status(), "policy request ignored in current state");
            return self.status();
        }

        let result = self.backend.fetch_upload_policy(self.video.id).await;
        if !self.liveness.is_alive() {
            debug!(video_id = %self.video.id, "discarding policy for unmounted workflow");
            return self.status();
        }

        match result {
            Ok(policy) => self.apply(UploadEvent::PolicyReceived(policy)),
            Err(error) => {
                warn!(video_id = %self.video.id, %error, "upload policy unavailable");
                self.apply(UploadEvent::PolicyFailed);
            }
        }
        self.status()
    }

    /// Uploads `file` with the policy acquired earlier. Selections made while
    /// no policy is ready, an upload is running, or the workflow has ended are
    /// ignored.
    pub async fn select_file(&mut self, file: UploadFile) -> UploadStatus {
        if !self.liveness.is_alive() {
            debug!(video_id = %self.video.id, "workflow unmounted; ignoring file selection");
            return self.status();
        }
        let UploadState::PolicyReady(policy) = &self.state else {
            warn!(
                video_id = %self.video.id,
                status = ?self.status(),
                file = %file.name,
                "ignoring file selection without a ready policy"
            );
            return self.status();
        };
        let policy = policy.clone();

        self.apply(UploadEvent::FileSelected);
        info!(video_id = %self.video.id, file = %file.name, "uploading video file");
        let result = self.backend.submit_to_storage(&policy, file).await;
        drop(policy);

        if !self.liveness.is_alive() {
            debug!(video_id = %self.video.id, "discarding upload result for unmounted workflow");
            return self.status();
        }

        match result {
            Ok(()) => {
                self.video = self.video.with_state(VideoState::Processing);
                self.updater.update_video(self.video.clone());
                self.apply(UploadEvent::StorageAccepted);
                info!(video_id = %self.video.id, "upload complete; video is processing");
            }
            Err(error) => {
                warn!(video_id = %self.video.id, %error, "video upload failed");
                self.apply(UploadEvent::StorageFailed);
            }
        }
        self.status()
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
