use serde::{Deserialize, Serialize};

/// Signed, single-use authorization for one direct upload to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub acl: String,
    pub bucket: String,
    pub key: String,
    pub policy: String,
    pub s3_endpoint: String,
    pub x_amz_algorithm: String,
    pub x_amz_credential: String,
    pub x_amz_date: String,
    pub x_amz_signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_amz_expires: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}
