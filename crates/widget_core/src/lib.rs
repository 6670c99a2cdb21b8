use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use shared::{
    domain::{Video, VideoId},
    protocol::UploadPolicy,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod chat;
pub mod error;
pub mod navigation;
pub mod router;
pub mod transcript;
pub mod upload;
pub mod video_cache;

pub use error::ClientError;

pub const DEFAULT_STORAGE_SCHEME: &str = "https";
const OCTET_STREAM: &str = "application/octet-stream";

/// A file picked by the user, fully buffered for a single multi-part submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        Ok(Self::new(name, content_type, bytes))
    }
}

/// Text fields of the storage POST, in the order the storage backend checks them.
/// The file part always goes after these.
pub fn storage_form_fields(policy: &UploadPolicy, content_type: &str) -> [(&'static str, String); 8] {
    [
        ("key", policy.key.clone()),
        ("acl", policy.acl.clone()),
        ("Content-Type", content_type.to_string()),
        ("X-Amz-Credential", policy.x_amz_credential.clone()),
        ("X-Amz-Algorithm", policy.x_amz_algorithm.clone()),
        ("X-Amz-Date", policy.x_amz_date.clone()),
        ("Policy", policy.policy.clone()),
        ("X-Amz-Signature", policy.x_amz_signature.clone()),
    ]
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn fetch_upload_policy(&self, video_id: VideoId) -> Result<UploadPolicy, ClientError>;
    async fn submit_to_storage(
        &self,
        policy: &UploadPolicy,
        file: UploadFile,
    ) -> Result<(), ClientError>;
}

#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn update_video(&self, video: &Video) -> Result<Video, ClientError>;
}

pub struct MissingUploadBackend;

#[async_trait]
impl UploadBackend for MissingUploadBackend {
    async fn fetch_upload_policy(&self, video_id: VideoId) -> Result<UploadPolicy, ClientError> {
        Err(ClientError::AuthFailure {
            video_id,
            message: "upload backend is unavailable".to_string(),
        })
    }

    async fn submit_to_storage(
        &self,
        _policy: &UploadPolicy,
        _file: UploadFile,
    ) -> Result<(), ClientError> {
        Err(ClientError::StorageSubmitFailure {
            status: None,
            message: "upload backend is unavailable".to_string(),
        })
    }
}

pub struct MissingVideoApi;

#[async_trait]
impl VideoApi for MissingVideoApi {
    async fn update_video(&self, video: &Video) -> Result<Video, ClientError> {
        Err(ClientError::VideoUpdateFailure {
            video_id: video.id,
            message: "video api is unavailable".to_string(),
        })
    }
}

/// HTTP client for the video backend and the object storage it delegates uploads to.
#[derive(Debug, Clone)]
pub struct VideoApiClient {
    http: Client,
    api_endpoint: Url,
    jwt: Option<String>,
    storage_scheme: String,
}

impl VideoApiClient {
    pub fn new(api_endpoint: &str, jwt: Option<String>) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            api_endpoint: normalize_api_endpoint(api_endpoint)?,
            jwt,
            storage_scheme: DEFAULT_STORAGE_SCHEME.to_string(),
        })
    }

    pub fn with_storage_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.storage_scheme = scheme.into();
        self
    }

    pub fn upload_policy_url(&self, video_id: VideoId) -> Result<Url, ClientError> {
        self.join_api(&format!("videos/{video_id}/upload-policy/"))
    }

    pub fn video_url(&self, video_id: VideoId) -> Result<Url, ClientError> {
        self.join_api(&format!("videos/{video_id}/"))
    }

    pub fn storage_url(&self, policy: &UploadPolicy) -> Result<Url, ClientError> {
        let raw = format!(
            "{}://{}/{}",
            self.storage_scheme, policy.s3_endpoint, policy.bucket
        );
        Url::parse(&raw).map_err(|e| ClientError::InvalidEndpoint {
            url: raw,
            message: e.to_string(),
        })
    }

    fn join_api(&self, path: &str) -> Result<Url, ClientError> {
        self.api_endpoint
            .join(path)
            .map_err(|e| ClientError::InvalidEndpoint {
                url: format!("{}{path}", self.api_endpoint),
                message: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(jwt) => request.bearer_auth(jwt),
            None => request,
        }
    }
}

fn normalize_api_endpoint(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_slash = format!("{trimmed}/");
    Url::parse(&with_slash).map_err(|e| ClientError::InvalidEndpoint {
        url: raw.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl UploadBackend for VideoApiClient {
    async fn fetch_upload_policy(&self, video_id: VideoId) -> Result<UploadPolicy, ClientError> {
        let url = self.upload_policy_url(video_id)?;
        let auth_failure = |e: reqwest::Error| ClientError::AuthFailure {
            video_id,
            message: e.to_string(),
        };

        debug!(%video_id, %url, "requesting upload policy");
        let policy: UploadPolicy = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(auth_failure)?
            .error_for_status()
            .map_err(auth_failure)?
            .json()
            .await
            .map_err(auth_failure)?;
        info!(%video_id, bucket = %policy.bucket, "upload policy acquired");
        Ok(policy)
    }

    async fn submit_to_storage(
        &self,
        policy: &UploadPolicy,
        file: UploadFile,
    ) -> Result<(), ClientError> {
        let url = self.storage_url(policy)?;
        debug!(%url, file = %file.name, size_bytes = file.bytes.len(), "submitting file to storage");

        let mut form = Form::new();
        for (name, value) in storage_form_fields(policy, &file.content_type) {
            form = form.text(name, value);
        }
        let mut part = Part::bytes(file.bytes).file_name(file.name);
        // Unrecognised files come with an empty type; the part then goes untyped.
        if !file.content_type.is_empty() {
            part = part
                .mime_str(&file.content_type)
                .map_err(|e| ClientError::StorageSubmitFailure {
                    status: None,
                    message: format!("invalid content type '{}': {e}", file.content_type),
                })?;
        }
        form = form.part("file", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::StorageSubmitFailure {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "storage rejected upload");
            return Err(ClientError::StorageSubmitFailure {
                status: Some(status.as_u16()),
                message: format!("storage answered {status}"),
            });
        }
        info!(key = %policy.key, "storage accepted upload");
        Ok(())
    }
}

#[async_trait]
impl VideoApi for VideoApiClient {
    async fn update_video(&self, video: &Video) -> Result<Video, ClientError> {
        let video_id = video.id;
        let url = self.video_url(video_id)?;
        let update_failure = |e: reqwest::Error| ClientError::VideoUpdateFailure {
            video_id,
            message: e.to_string(),
        };

        let updated: Video = self
            .authorized(self.http.put(url))
            .json(video)
            .send()
            .await
            .map_err(update_failure)?
            .error_for_status()
            .map_err(update_failure)?
            .json()
            .await
            .map_err(update_failure)?;
        debug!(%video_id, "video updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
