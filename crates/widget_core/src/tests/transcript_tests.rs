use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::domain::{TimedTextTrackId, TrackUploadState, VideoId, VideoState};
use uuid::Uuid;

use super::*;
use crate::video_cache::VideoCache;

fn track(mode: TimedTextMode) -> TimedTextTrack {
    TimedTextTrack {
        id: TimedTextTrackId(Uuid::new_v4()),
        is_ready_to_show: true,
        language: "fr".to_string(),
        mode,
        upload_state: TrackUploadState::Ready,
    }
}

struct RecordingVideoApi {
    fail: bool,
    requests: Mutex<Vec<Video>>,
}

impl RecordingVideoApi {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VideoApi for RecordingVideoApi {
    async fn update_video(&self, video: &Video) -> Result<Video, ClientError> {
        self.requests.lock().expect("requests").push(video.clone());
        if self.fail {
            return Err(ClientError::VideoUpdateFailure {
                video_id: video.id,
                message: "500 Internal Server Error".to_string(),
            });
        }
        Ok(video.clone())
    }
}

#[test]
fn hidden_without_tracks() {
    assert!(!transcript_option_available(&[]));
}

#[test]
fn hidden_when_a_transcript_already_exists() {
    assert!(!transcript_option_available(&[
        track(TimedTextMode::Transcript),
        track(TimedTextMode::Subtitle),
    ]));
}

#[test]
fn hidden_with_only_closed_captions() {
    assert!(!transcript_option_available(&[track(
        TimedTextMode::ClosedCaptioning
    )]));
}

#[test]
fn shown_with_a_subtitle_and_no_transcript() {
    assert!(transcript_option_available(&[
        track(TimedTextMode::Subtitle),
        track(TimedTextMode::ClosedCaptioning),
    ]));
}

#[tokio::test]
async fn toggling_sends_full_video_and_updates_cache() {
    let mut video = Video::new(VideoId(Uuid::new_v4()), VideoState::Ready);
    video.timed_text_tracks = vec![track(TimedTextMode::Subtitle)];
    let cache = VideoCache::new(video.clone());
    let api = RecordingVideoApi::new(false);

    let updated = set_use_subtitle_as_transcript(&api, &cache, &video, true)
        .await
        .expect("update");

    assert!(updated.should_use_subtitle_as_transcript);
    assert!(cache.get().should_use_subtitle_as_transcript);
    let requests = api.requests.lock().expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        Video {
            should_use_subtitle_as_transcript: true,
            ..video
        }
    );
}

#[tokio::test]
async fn failed_toggle_keeps_cached_video() {
    let video = Video::new(VideoId(Uuid::new_v4()), VideoState::Ready);
    let cache = VideoCache::new(video.clone());
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();
    let updater = move |_video: Video| {
        *counter.lock().expect("counter") += 1;
    };

    let err = set_use_subtitle_as_transcript(&RecordingVideoApi::new(true), &updater, &video, true)
        .await
        .expect_err("must fail");

    assert!(err.error_reason().is_none());
    assert_eq!(*calls.lock().expect("calls"), 0);
    assert!(!cache.get().should_use_subtitle_as_transcript);
}

#[tokio::test]
async fn missing_video_api_reports_update_failure() {
    let video = Video::new(VideoId(Uuid::new_v4()), VideoState::Ready);
    let cache = VideoCache::new(video.clone());

    let err = set_use_subtitle_as_transcript(&crate::MissingVideoApi, &cache, &video, true)
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::VideoUpdateFailure { .. }));
    assert_eq!(cache.get(), video);
}
