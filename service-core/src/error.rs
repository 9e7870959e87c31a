use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// Well-formed JSON whose shape does not match the expected body.
    #[error("Unprocessable request body: {0}")]
    UnprocessableBody(String),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Too many requests: {0}")]
    TooManyRequests(String, Option<u64>),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    /// An upstream provider call failed. The first field is the message shown
    /// to the client; the cause stays server-side.
    #[error("{0}: {1}")]
    UpstreamError(String, anyhow::Error),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::UnprocessableBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooManyRequests(..) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalError(_)
            | AppError::UpstreamError(..)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::UnprocessableBody(err.body_text()),
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest(anyhow::anyhow!("Request body must be JSON"))
            }
            other => AppError::BadRequest(anyhow::anyhow!(
                "Malformed JSON body: {}",
                other.body_text()
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let status = self.status_code();
        let (error_message, details, retry_after) = match self {
            AppError::ValidationError(err) => {
                ("Validation error".to_string(), Some(err.to_string()), None)
            }
            AppError::BadRequest(err) => (err.to_string(), None, None),
            AppError::UnprocessableBody(msg) => {
                ("Invalid request body".to_string(), Some(msg), None)
            }
            AppError::NotFound(err) => (err.to_string(), None, None),
            AppError::TooManyRequests(msg, retry) => (msg, None, retry),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                ("Internal server error".to_string(), None, None)
            }
            AppError::UpstreamError(msg, err) => {
                tracing::error!(error = %err, "{}", msg);
                (msg, None, None)
            }
            AppError::BadGateway(msg) => (format!("Bad Gateway: {}", msg), None, None),
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                ("Configuration error".to_string(), None, None)
            }
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_error_hides_cause() {
        let err = AppError::UpstreamError(
            "Failed to fetch stock data".to_string(),
            anyhow::anyhow!("connection refused to 10.0.0.1"),
        );
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(res).await;
        assert_eq!(body["error"], "Failed to fetch stock data");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn too_many_requests_sets_retry_after() {
        let res = AppError::TooManyRequests("slow down".to_string(), Some(7)).into_response();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()[axum::http::header::RETRY_AFTER], "7");
    }

    #[test]
    fn bad_request_and_not_found_status() {
        assert_eq!(
            AppError::BadRequest(anyhow::anyhow!("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(anyhow::anyhow!("x")).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn json_rejections_use_error_envelope() {
        use axum::{Router, body::Body, http::Request, routing::post};
        use tower::ServiceExt;

        #[derive(Debug, serde::Deserialize)]
        struct SignupBody {
            #[allow(dead_code)]
            email: String,
        }

        async fn handler(
            payload: Result<Json<SignupBody>, JsonRejection>,
        ) -> Result<StatusCode, AppError> {
            payload?;
            Ok(StatusCode::OK)
        }

        let app = Router::new().route("/", post(handler));
        let send = |content_type: Option<&str>, body: &'static str| {
            let mut builder = Request::builder().method("POST").uri("/");
            if let Some(ct) = content_type {
                builder = builder.header("content-type", ct);
            }
            app.clone().oneshot(builder.body(Body::from(body)).unwrap())
        };

        let res = send(None, "").await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "Request body must be JSON");

        let res = send(Some("application/json"), "{").await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());

        let res = send(Some("application/json"), r#"{"email": 123}"#).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(res).await;
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["details"].is_string());
    }
}
