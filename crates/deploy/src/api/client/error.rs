use reqwest::StatusCode;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(Url),
    #[error("invalid credential value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("request rejected ({0}): {1}")]
    Rejected(StatusCode, String),
    #[error("authentication rejected ({0}): {1}")]
    Unauthorized(StatusCode, String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Status code of a non-success or rejected response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus(status, _)
            | ApiError::Rejected(status, _)
            | ApiError::Unauthorized(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(..))
            || matches!(
                self.status(),
                Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
            )
    }

    pub fn is_not_found(&self) -> bool {
        !self.is_unauthorized() && self.status() == Some(StatusCode::NOT_FOUND)
    }
}
