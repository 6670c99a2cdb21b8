//! "Use subtitles as transcripts" option shown on the dashboard.

use shared::domain::{TimedTextMode, TimedTextTrack, Video};
use tracing::{info, warn};

use crate::{error::ClientError, video_cache::VideoUpdater, VideoApi};

/// Offered only when there is a subtitle to reuse and no real transcript yet.
pub fn transcript_option_available(tracks: &[TimedTextTrack]) -> bool {
    let has_subtitle = tracks
        .iter()
        .any(|track| track.mode == TimedTextMode::Subtitle);
    let has_transcript = tracks
        .iter()
        .any(|track| track.mode == TimedTextMode::Transcript);
    has_subtitle && !has_transcript
}

/// Sends the whole video with the flag changed and hands the server's answer
/// to `updater`. The cached video is left untouched on failure.
pub async fn set_use_subtitle_as_transcript(
    api: &dyn VideoApi,
    updater: &dyn VideoUpdater,
    video: &Video,
    enabled: bool,
) -> Result<Video, ClientError> {
    let requested = Video {
        should_use_subtitle_as_transcript: enabled,
        ..video.clone()
    };

    match api.update_video(&requested).await {
        Ok(updated) => {
            info!(video_id = %updated.id, enabled, "transcript option saved");
            updater.update_video(updated.clone());
            Ok(updated)
        }
        Err(error) => {
            warn!(video_id = %video.id, %error, "failed to save transcript option");
            Err(error)
        }
    }
}

#[cfg(test)]
#[path = "tests/transcript_tests.rs"]
mod tests;
