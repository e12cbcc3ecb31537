//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 response from the API
    #[error("API error (status {status})")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Invalid client-side configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response that does not match the expected envelope shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A credential or token could not be encoded as a header
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// A project-scoped call was made before `set_project`
    #[error("no project selected")]
    NoProject,
}

impl ClientError {
    /// The HTTP status of a remote rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_carry_their_status() {
        let err = ClientError::Api {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(ClientError::NoProject.status(), None);
    }
}
