use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(VideoId);
id_newtype!(TimedTextTrackId);

/// Lifecycle of a video on the backend.
///
/// Values the backend may add later deserialize to `Unknown`, which every
/// consumer treats as "not ready".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    Pending,
    Processing,
    Error,
    Ready,
    #[serde(other)]
    Unknown,
}

impl VideoState {
    pub fn is_ready(self) -> bool {
        self == VideoState::Ready
    }
}

/// Role handed over by the LTI launch. `Error` means the launch itself failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LtiRole {
    Instructor,
    Student,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimedTextMode {
    Subtitle,
    Transcript,
    ClosedCaptioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackUploadState {
    Pending,
    Processing,
    Error,
    Ready,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedTextTrack {
    pub id: TimedTextTrackId,
    pub is_ready_to_show: bool,
    pub language: String,
    pub mode: TimedTextMode,
    pub upload_state: TrackUploadState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmppCredentials {
    pub bosh_url: String,
    pub conference_url: String,
    pub prebind_url: String,
    pub jid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: VideoState,
    #[serde(default)]
    pub should_use_subtitle_as_transcript: bool,
    #[serde(default)]
    pub timed_text_tracks: Vec<TimedTextTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmpp: Option<XmppCredentials>,
}

impl Video {
    pub fn new(id: VideoId, state: VideoState) -> Self {
        Self {
            id,
            title: None,
            description: None,
            state,
            should_use_subtitle_as_transcript: false,
            timed_text_tracks: Vec::new(),
            xmpp: None,
        }
    }

    /// Copy of this video with a different lifecycle state.
    pub fn with_state(&self, state: VideoState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

/// Context produced once by the LTI launch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub role: LtiRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
}
