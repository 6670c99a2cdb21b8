use std::sync::{Arc, RwLock};

use shared::domain::Video;
use tracing::debug;

/// Receives the new video record after a local action changed it.
pub trait VideoUpdater: Send + Sync {
    fn update_video(&self, video: Video);
}

impl<F> VideoUpdater for F
where
    F: Fn(Video) + Send + Sync,
{
    fn update_video(&self, video: Video) {
        self(video)
    }
}

/// Locally cached copy of the backend video, shared between views.
#[derive(Debug, Clone)]
pub struct VideoCache {
    inner: Arc<RwLock<Video>>,
}

impl VideoCache {
    pub fn new(video: Video) -> Self {
        Self {
            inner: Arc::new(RwLock::new(video)),
        }
    }

    pub fn get(&self) -> Video {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl VideoUpdater for VideoCache {
    fn update_video(&self, video: Video) {
        debug!(video_id = %video.id, state = ?video.state, "video cache updated");
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = video;
    }
}
