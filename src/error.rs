use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error taxonomy shared by every handler. Anything outside of it is logged
/// server-side and surfaces as a bare 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid code")]
    InvalidCode,
    #[error("code expired")]
    CodeExpired,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Upstream(&'static str),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidCode | Self::CodeExpired => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // A unique-index violation is how the store reports a duplicate email;
        // the check-then-insert race resolves here instead of in handlers.
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("already exists");
            }
        }
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn assert_error(error: ApiError, expected_status: StatusCode, expected_kind: &str) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], expected_kind);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        assert_error(
            ApiError::Validation("bad input".into()),
            StatusCode::BAD_REQUEST,
            "VALIDATION",
        )
        .await;
    }

    #[tokio::test]
    async fn invalid_code_maps_to_400() {
        assert_error(ApiError::InvalidCode, StatusCode::BAD_REQUEST, "INVALID_CODE").await;
    }

    #[tokio::test]
    async fn code_expired_maps_to_400() {
        assert_error(ApiError::CodeExpired, StatusCode::BAD_REQUEST, "CODE_EXPIRED").await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        assert_error(ApiError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
    }

    #[tokio::test]
    async fn forbidden_maps_to_403() {
        assert_error(
            ApiError::Forbidden("admin access required"),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
        )
        .await;
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        assert_error(ApiError::NotFound("hotel"), StatusCode::NOT_FOUND, "NOT_FOUND").await;
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        assert_error(
            ApiError::Conflict("email already registered"),
            StatusCode::CONFLICT,
            "CONFLICT",
        )
        .await;
    }

    #[tokio::test]
    async fn upstream_maps_to_502() {
        assert_error(
            ApiError::Upstream("weather provider unavailable"),
            StatusCode::BAD_GATEWAY,
            "UPSTREAM",
        )
        .await;
    }

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "database error"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[tokio::test]
    async fn unique_violation_maps_to_409_conflict() {
        let err: ApiError = sqlx::Error::Database(Box::new(FakeDbError { unique: true })).into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_error(err, StatusCode::CONFLICT, "CONFLICT").await;
    }

    #[tokio::test]
    async fn other_database_errors_map_to_500() {
        let err: ApiError = sqlx::Error::Database(Box::new(FakeDbError { unique: false })).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_error(err, StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL").await;
    }

    #[tokio::test]
    async fn non_database_sqlx_errors_map_to_500() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn internal_maps_to_500_without_detail() {
        let resp = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // The client must never see the underlying error text.
        assert_eq!(json["message"], "internal error");
    }
}
