use axum::http::StatusCode;

use crate::ai::ServiceError;

/// Error shape every handler returns: a status plus a user-facing message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{err:#}"))
    }
}

/// Hosted-service failures surface as a bad gateway; local index problems
/// stay internal.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match err {
            ServiceError::Transport(_) | ServiceError::Api { .. } | ServiceError::BadResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            ServiceError::Index(_) | ServiceError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::ai::ServiceError;

    use super::ApiError;

    #[test]
    fn test_service_failures_map_to_bad_gateway() {
        let error = ApiError::from(ServiceError::Api {
            status: 429,
            message: "slow down".into(),
        });
        assert_eq!(error.status, StatusCode::BAD_GATEWAY);
        assert!(error.message.contains("slow down"));
    }

    #[test]
    fn test_index_failures_stay_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error = ApiError::from(ServiceError::Index(io));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
