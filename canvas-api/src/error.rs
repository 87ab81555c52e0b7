use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong talking to the LMS.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the LMS rejected the credential (HTTP 401)")]
    Auth,

    #[error("request for `{path}` failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("LMS responded to `{path}` with {status}")]
    Status { path: String, status: StatusCode },

    #[error("could not decode LMS response for `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The two categories a caller has to react to differently: re-authenticate, or offer a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Network,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth => ErrorKind::Auth,
            Self::Network { .. }
            | Self::Status { .. }
            | Self::Decode { .. }
            | Self::InvalidUrl { .. } => ErrorKind::Network,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    pub(crate) fn status(path: &str, status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Auth
        } else {
            Self::Status {
                path: path.to_owned(),
                status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_an_auth_error() {
        let err = ApiError::status("/courses", StatusCode::UNAUTHORIZED);
        assert!(err.is_auth());
    }

    #[test]
    fn other_statuses_are_network_errors() {
        for status in [
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::BAD_GATEWAY,
        ] {
            let err = ApiError::status("/courses", status);
            assert_eq!(err.kind(), ErrorKind::Network, "{status}");
        }
    }
}
