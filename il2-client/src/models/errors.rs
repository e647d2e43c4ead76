use serde::{Deserialize, Serialize};
use std::fmt;

/// RFC 7807 problem details returned by the node on 4xx/5xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ErrorDetails {
    /// Build from an error response body.
    ///
    /// A body that is not a problem-details object becomes `detail`, and the
    /// HTTP status fills in a missing `status`.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorDetails>(body) {
            Ok(mut details) => {
                details.status.get_or_insert(status);
                details
            }
            Err(_) => ErrorDetails {
                status: Some(status),
                detail: (!body.trim().is_empty()).then(|| body.to_string()),
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "[{}] ", status)?;
        }
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(f, "{}: {}", title, detail),
            (Some(text), None) | (None, Some(text)) => f.write_str(text),
            (None, None) => f.write_str("no details"),
        }
    }
}
