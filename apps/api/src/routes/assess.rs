use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::assessment::Assessment;
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentFormat};
use crate::state::AppState;

/// Multipart field carrying the uploaded CV.
const CV_FIELD: &str = "cv";

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub assessment_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub assessment: Assessment,
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/assess
pub async fn assess_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AssessResponse>, AppError> {
    let upload = read_cv_field(&mut multipart, state.config.max_upload_bytes).await?;
    let format = DocumentFormat::from_filename(&upload.filename)?;

    // Extraction and annotation are CPU-bound; keep them off the executor.
    let assessor = state.assessor.clone();
    let assessment = tokio::task::spawn_blocking(move || -> Result<Assessment, AppError> {
        let text = extract_text(&upload.bytes, format)?;
        Ok(assessor.assess(&text)?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in assessment: {e}")))??;

    let response = AssessResponse {
        assessment_id: Uuid::new_v4(),
        assessed_at: Utc::now(),
        assessment,
    };

    info!(
        assessment_id = %response.assessment_id,
        %format,
        rating = %response.assessment.rating,
        score = response.assessment.score,
        "CV assessed"
    );

    Ok(Json(response))
}

async fn read_cv_field(multipart: &mut Multipart, limit: usize) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "malformed multipart body"))?
    {
        if field.name() != Some(CV_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("field '{CV_FIELD}' must be a file upload")))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit, "failed to read upload"))?;
        return Ok(Upload { filename, bytes });
    }

    Err(AppError::Validation(format!(
        "missing multipart field '{CV_FIELD}'"
    )))
}

/// Body-limit breaches surface as multipart read errors; axum tags them 413.
fn multipart_error(err: MultipartError, limit: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("upload exceeds the {limit}-byte limit"))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::annotation::{AnnotatedDocument, AnnotationError, Annotator, LexiconAnnotator};
    use crate::assessment::Assessor;
    use crate::config::Config;
    use crate::criteria::ScoringConfig;
    use crate::matching::PatternRuleSet;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "merit-test-boundary";

    struct UnavailableAnnotator;

    impl Annotator for UnavailableAnnotator {
        fn annotate(&self, _text: &str) -> Result<AnnotatedDocument, AnnotationError> {
            Err(AnnotationError::Failed("backend offline".to_string()))
        }
    }

    fn state_with(annotator: Arc<dyn Annotator>, config: Config) -> AppState {
        AppState {
            config,
            assessor: Arc::new(Assessor::new(
                annotator,
                PatternRuleSet::standard(),
                ScoringConfig::default(),
            )),
        }
    }

    fn default_state() -> AppState {
        state_with(Arc::new(LexiconAnnotator::new()), Config::default())
    }

    fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
            None => format!("form-data; name=\"{field}\""),
        };
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(state: AppState, body: Vec<u8>) -> Response {
        build_router(state)
            .oneshot(
                Request::post("/api/v1/assess")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .expect("route executes")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn test_txt_upload_is_assessed() {
        let cv = "Awarded the Best Paper Award from IEEE. Member of ACM.";
        let response = upload(
            default_state(),
            multipart_body("cv", Some("resume.txt"), cv.as_bytes()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert!(payload["assessment_id"].is_string());
        assert!(payload["assessed_at"].is_string());

        let criteria = payload["criteria"].as_array().unwrap();
        assert_eq!(criteria.len(), 8);
        assert_eq!(criteria[0]["criterion"], "awards");
        assert_eq!(criteria[0]["satisfied"], true);
        assert_eq!(criteria[0]["evidence"][0], "Award from IEEE");
        assert_eq!(criteria[4]["criterion"], "membership");
        assert_eq!(criteria[4]["evidence"][0], "Member of ACM");
        assert_eq!(criteria[1]["assessable"], false);

        let score = payload["score"].as_f64().unwrap();
        assert!((score - 0.35).abs() < 1e-9);
        assert_eq!(payload["rating"], "low");
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let response = upload(
            default_state(),
            multipart_body("cv", Some("resume.odt"), b"Member of ACM"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let response = upload(
            default_state(),
            multipart_body("cv", Some("resume.txt"), &[0xc3, 0x28, 0xff]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "INVALID_DOCUMENT");
    }

    #[tokio::test]
    async fn test_missing_cv_field() {
        let response = upload(
            default_state(),
            multipart_body("resume", Some("resume.txt"), b"Member of ACM"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cv_field_without_filename() {
        let response = upload(default_state(), multipart_body("cv", None, b"Member of ACM")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_annotator_failure_is_processing_error() {
        let state = state_with(Arc::new(UnavailableAnnotator), Config::default());
        let response = upload(state, multipart_body("cv", Some("cv.txt"), b"Member of ACM")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "PROCESSING_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let config = Config {
            max_upload_bytes: 256,
            ..Config::default()
        };
        let state = state_with(Arc::new(LexiconAnnotator::new()), config);
        let cv = "Member of ACM. ".repeat(100);
        let response = upload(state, multipart_body("cv", Some("cv.txt"), cv.as_bytes())).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(
            payload["error"]["message"],
            "upload exceeds the 256-byte limit"
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(default_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["service"], "merit-assessor");
    }
}
