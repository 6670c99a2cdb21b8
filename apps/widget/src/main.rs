use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use shared::domain::{LtiRole, SessionContext, XmppCredentials};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use widget_core::{
    chat::chat_mount,
    navigation::{History, Navigator, Redirect, Route},
    router::RedirectOnLoad,
    transcript::{set_use_subtitle_as_transcript, transcript_option_available},
    upload::{FormView, UploadWorkflow},
    video_cache::VideoCache,
    UploadBackend, UploadFile, VideoApi, VideoApiClient,
};

mod config;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Args {
    /// JSON session document handed over by the LTI launch.
    #[arg(long)]
    session: PathBuf,
    /// Video file to upload when the launch lands on the upload form.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    api_endpoint: Option<String>,
    #[arg(long)]
    jwt: Option<String>,
    /// Saves the "use subtitles as transcripts" option when the dashboard offers it.
    #[arg(long)]
    use_subtitle_as_transcript: Option<bool>,
}

/// What the launch asks the widget to do besides routing.
#[derive(Debug, Default)]
struct WidgetActions {
    file: Option<PathBuf>,
    use_subtitle_as_transcript: Option<bool>,
}

#[derive(Debug, Serialize)]
struct WidgetReport {
    route: String,
    history: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat: Option<ChatReport>,
    transcript_option: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_subtitle_as_transcript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_state: Option<shared::domain::VideoState>,
}

#[derive(Debug, Serialize)]
struct ChatReport {
    container: &'static str,
    xmpp: XmppCredentials,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(api_endpoint) = args.api_endpoint {
        settings.api_endpoint = api_endpoint;
    }
    if let Some(jwt) = args.jwt {
        settings.jwt = Some(jwt);
    }

    let raw = tokio::fs::read_to_string(&args.session)
        .await
        .with_context(|| format!("failed to read session document '{}'", args.session.display()))?;
    let session: SessionContext =
        serde_json::from_str(&raw).context("session document is not a valid LTI session")?;

    let client = build_client(&settings)?;
    let actions = WidgetActions {
        file: args.file,
        use_subtitle_as_transcript: args.use_subtitle_as_transcript,
    };
    let report = run_widget(&session, client.clone(), client, actions).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_client(settings: &Settings) -> Result<Arc<VideoApiClient>> {
    let client = VideoApiClient::new(&settings.api_endpoint, settings.jwt.clone())
        .context("invalid api endpoint")?
        .with_storage_scheme(settings.storage_scheme.clone());
    Ok(Arc::new(client))
}

/// Mounts the entry router and, when it lands on the upload form with a file
/// at hand, runs the upload workflow to its end. Instructors may then save the
/// transcript option.
async fn run_widget(
    session: &SessionContext,
    backend: Arc<dyn UploadBackend>,
    video_api: Arc<dyn VideoApi>,
    actions: WidgetActions,
) -> Result<WidgetReport> {
    let mut history = History::default();
    let route = RedirectOnLoad::new()
        .mount(session, &mut history)
        .context("entry redirect already issued")?;

    let cache = session.video.clone().map(VideoCache::new);

    if let (Route::Form, Some(cache), Some(path)) = (route, &cache, actions.file) {
        let mut workflow = UploadWorkflow::new(backend, Arc::new(cache.clone()), cache.get());
        workflow.acquire_policy().await;

        if let FormView::UploadForm = workflow.view() {
            match UploadFile::from_path(&path).await {
                Ok(file) => {
                    workflow.select_file(file).await;
                }
                Err(error) => {
                    warn!(%error, "could not read the selected file");
                    if let Some(reason) = error.error_reason() {
                        history.navigate(Redirect::push(Route::Error(reason)));
                    }
                }
            }
        }

        if workflow.state().is_terminal() {
            if let FormView::Redirect(next) = workflow.view() {
                history.navigate(Redirect::push(next));
            }
        }
        workflow.unmount();
    }

    if let (LtiRole::Instructor, Some(cache), Some(enabled)) =
        (session.role, &cache, actions.use_subtitle_as_transcript)
    {
        let video = cache.get();
        if transcript_option_available(&video.timed_text_tracks) {
            if let Err(error) =
                set_use_subtitle_as_transcript(video_api.as_ref(), cache, &video, enabled).await
            {
                warn!(%error, "transcript option left unchanged");
            }
        } else {
            warn!(video_id = %video.id, "transcript option is not offered for this video");
        }
    }

    let video = cache.as_ref().map(VideoCache::get);
    let current = history.current().unwrap_or(route);
    info!(route = %current, "widget settled");

    Ok(WidgetReport {
        route: current.path(),
        history: history.entries().iter().map(Route::path).collect(),
        chat: video.as_ref().and_then(chat_mount).map(|mount| ChatReport {
            container: mount.container,
            xmpp: mount.xmpp,
        }),
        transcript_option: video
            .as_ref()
            .is_some_and(|video| transcript_option_available(&video.timed_text_tracks)),
        use_subtitle_as_transcript: video
            .as_ref()
            .map(|video| video.should_use_subtitle_as_transcript),
        video_state: video.map(|video| video.state),
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
