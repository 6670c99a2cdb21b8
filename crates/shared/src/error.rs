use serde::{Deserialize, Serialize};

/// Reason code carried by the error view route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorReason {
    Lti,
    Policy,
    Upload,
    NotFound,
}

impl ErrorReason {
    pub fn code(self) -> &'static str {
        match self {
            ErrorReason::Lti => "lti",
            ErrorReason::Policy => "policy",
            ErrorReason::Upload => "upload",
            ErrorReason::NotFound => "notFound",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
