use super::*;

use std::sync::Mutex;

use async_trait::async_trait;
use shared::domain::{
    LtiRole, TimedTextMode, TimedTextTrack, TimedTextTrackId, TrackUploadState, Video, VideoId,
    VideoState,
};
use widget_core::{ClientError, MissingUploadBackend, MissingVideoApi};

/// Answers every update with the video it was sent.
#[derive(Default)]
struct EchoVideoApi {
    updates: Mutex<Vec<Video>>,
}

#[async_trait]
impl VideoApi for EchoVideoApi {
    async fn update_video(&self, video: &Video) -> Result<Video, ClientError> {
        self.updates.lock().expect("updates").push(video.clone());
        Ok(video.clone())
    }
}

async fn run(session: &SessionContext, actions: WidgetActions) -> WidgetReport {
    run_widget(
        session,
        Arc::new(MissingUploadBackend),
        Arc::new(MissingVideoApi),
        actions,
    )
    .await
    .expect("run")
}

fn with_subtitle(mut session: SessionContext) -> SessionContext {
    if let Some(video) = session.video.as_mut() {
        video.timed_text_tracks.push(TimedTextTrack {
            id: TimedTextTrackId("142a5e1b-a5f3-4a4e-8ad5-6ef2b9e8b7c1".parse().expect("uuid")),
            is_ready_to_show: true,
            language: "fr".into(),
            mode: TimedTextMode::Subtitle,
            upload_state: TrackUploadState::Ready,
        });
    }
    session
}

fn session(role: LtiRole, state: VideoState) -> SessionContext {
    SessionContext {
        role,
        video: Some(Video::new(
            VideoId("5cffe85a-1829-4000-a6ca-a45d4647dc0d".parse().expect("uuid")),
            state,
        )),
    }
}

#[tokio::test]
async fn lti_error_session_lands_on_error_view() {
    let session = SessionContext {
        role: LtiRole::Error,
        video: None,
    };
    let report = run(&session, WidgetActions::default()).await;
    assert_eq!(report.route, "/errors/lti");
    assert!(report.chat.is_none());
    assert!(report.video_state.is_none());
}

#[tokio::test]
async fn instructor_without_file_stays_on_form() {
    let report = run(
        &session(LtiRole::Instructor, VideoState::Pending),
        WidgetActions::default(),
    )
    .await;
    assert_eq!(report.route, "/form");
    assert_eq!(report.history, vec!["/form".to_string()]);
}

#[tokio::test]
async fn unavailable_policy_redirects_to_policy_error() {
    let report = run(
        &session(LtiRole::Instructor, VideoState::Pending),
        WidgetActions {
            file: Some(PathBuf::from("lecture.mp4")),
            ..WidgetActions::default()
        },
    )
    .await;
    assert_eq!(report.route, "/errors/policy");
    assert_eq!(report.history, vec!["/form".to_string(), "/errors/policy".to_string()]);
    assert_eq!(report.video_state, Some(VideoState::Pending));
}

#[tokio::test]
async fn student_with_ready_video_gets_player_and_chat() {
    let mut session = session(LtiRole::Student, VideoState::Ready);
    if let Some(video) = session.video.as_mut() {
        video.xmpp = Some(XmppCredentials {
            bosh_url: "https://xmpp-server.com/http-bind".into(),
            conference_url: "870c467b@conference.xmpp-server.com".into(),
            prebind_url: "https://xmpp-server.com/http-pre-bind".into(),
            jid: "xmpp-server.com".into(),
        });
    }

    let report = run(&session, WidgetActions::default()).await;

    assert_eq!(report.route, "/player");
    let chat = report.chat.expect("chat");
    assert_eq!(chat.container, "#converse-container");
    assert_eq!(chat.xmpp.jid, "xmpp-server.com");
    assert!(!report.transcript_option);
}

#[tokio::test]
async fn instructor_saves_transcript_option_when_offered() {
    let session = with_subtitle(session(LtiRole::Instructor, VideoState::Processing));
    let video_api = Arc::new(EchoVideoApi::default());

    let report = run_widget(
        &session,
        Arc::new(MissingUploadBackend),
        video_api.clone(),
        WidgetActions {
            use_subtitle_as_transcript: Some(true),
            ..WidgetActions::default()
        },
    )
    .await
    .expect("run");

    assert_eq!(report.route, "/dashboard");
    assert!(report.transcript_option);
    assert_eq!(report.use_subtitle_as_transcript, Some(true));
    let updates = video_api.updates.lock().expect("updates");
    assert_eq!(updates.len(), 1);
    assert!(updates[0].should_use_subtitle_as_transcript);
}

#[tokio::test]
async fn failed_transcript_save_keeps_previous_value() {
    let session = with_subtitle(session(LtiRole::Instructor, VideoState::Processing));
    let report = run(
        &session,
        WidgetActions {
            use_subtitle_as_transcript: Some(true),
            ..WidgetActions::default()
        },
    )
    .await;

    assert!(report.transcript_option);
    assert_eq!(report.use_subtitle_as_transcript, Some(false));
}

#[tokio::test]
async fn transcript_option_is_not_saved_without_a_subtitle() {
    let video_api = Arc::new(EchoVideoApi::default());
    let report = run_widget(
        &session(LtiRole::Instructor, VideoState::Processing),
        Arc::new(MissingUploadBackend),
        video_api.clone(),
        WidgetActions {
            use_subtitle_as_transcript: Some(true),
            ..WidgetActions::default()
        },
    )
    .await
    .expect("run");

    assert!(!report.transcript_option);
    assert_eq!(report.use_subtitle_as_transcript, Some(false));
    assert!(video_api.updates.lock().expect("updates").is_empty());
}
