//! Salary service client: the single point of entry for all HTTP calls to the
//! remote prediction backend.
//!
//! No other module builds requests against the service directly; the
//! `PredictionClient` talks to it only through the `SalaryApi` trait.

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::form::PredictionRequest;

/// Hosted prediction service. Free-tier hosting, so the first request after
/// idling can take several seconds (cold start).
pub const DEFAULT_BASE_URL: &str = "https://backend-salary-predicter.onrender.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct AverageSalaryRequest<'a> {
    #[serde(rename = "Job Title")]
    job_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct JobTitlesResponse {
    job_titles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_salary: f64,
}

#[derive(Debug, Deserialize)]
struct AverageSalaryResponse {
    average_salary: f64,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

/// The three operations the remote service exposes.
#[async_trait]
pub trait SalaryApi: Send + Sync {
    /// GET /job-titles
    async fn job_titles(&self) -> Result<Vec<String>, ApiError>;

    /// POST /predict, returning `predicted_salary`.
    async fn predict(&self, request: &PredictionRequest) -> Result<f64, ApiError>;

    /// POST /average-salary, returning `average_salary`.
    async fn average_salary(&self, job_title: &str) -> Result<f64, ApiError>;
}

/// reqwest-backed implementation of `SalaryApi`.
///
/// No request timeout is configured here; the connectivity probe bounds its
/// own call and the prediction calls use the transport defaults.
#[derive(Clone)]
pub struct HttpSalaryApi {
    client: Client,
    base_url: String,
}

impl HttpSalaryApi {
    /// `base_url` must not end with a slash (see `config::normalize_base_url`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SalaryApi for HttpSalaryApi {
    async fn job_titles(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/job-titles"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let body: JobTitlesResponse = read_json(response).await?;
        Ok(body.job_titles.unwrap_or_default())
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<f64, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/predict"))
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let body: PredictResponse = read_json(response).await?;
        debug!("Prediction succeeded: predicted_salary={}", body.predicted_salary);
        Ok(body.predicted_salary)
    }

    async fn average_salary(&self, job_title: &str) -> Result<f64, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/average-salary"))
            .header(header::ACCEPT, "application/json")
            .json(&AverageSalaryRequest { job_title })
            .send()
            .await?;

        let body: AverageSalaryResponse = read_json(response).await?;
        Ok(body.average_salary)
    }
}

/// Reads the body and decodes it, turning non-2xx statuses into
/// `ApiError::Status` with the service's `error` field when it sent one.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ServiceError>(&body)
            .map(|e| e.error)
            .ok();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::{Education, Gender};
    use axum::{http::StatusCode, response::IntoResponse, routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn sample_request() -> PredictionRequest {
        PredictionRequest {
            experience: 5.0,
            education: Education::Masters,
            job_title: "Data Analyst".to_string(),
            gender: Gender::Male,
            age: 30.0,
        }
    }

    #[tokio::test]
    async fn test_job_titles_parses_list() {
        let router = Router::new().route(
            "/job-titles",
            get(|| async { Json(json!({ "job_titles": ["Data Analyst", "Software Engineer"] })) }),
        );
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        let titles = api.job_titles().await.unwrap();
        assert_eq!(titles, vec!["Data Analyst", "Software Engineer"]);
    }

    #[tokio::test]
    async fn test_job_titles_missing_or_null_reads_as_empty() {
        let router = Router::new()
            .route("/job-titles", get(|| async { Json(json!({ "job_titles": null })) }));
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();
        assert!(api.job_titles().await.unwrap().is_empty());

        let router = Router::new().route("/job-titles", get(|| async { Json(json!({})) }));
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();
        assert!(api.job_titles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_titles_malformed_body_is_parse_error() {
        let router = Router::new().route("/job-titles", get(|| async { "<html>waking up</html>" }));
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        assert!(matches!(api.job_titles().await, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_predict_sends_service_field_names() {
        let router = Router::new().route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                let expected = json!({
                    "Years of Experience": 5.0,
                    "Education Level": "Master's",
                    "Job Title": "Data Analyst",
                    "Gender": "Male",
                    "Age": 30.0
                });
                if body == expected {
                    Json(json!({ "predicted_salary": 123456.5 })).into_response()
                } else {
                    (StatusCode::BAD_REQUEST, Json(json!({ "error": "unexpected body" })))
                        .into_response()
                }
            }),
        );
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        let salary = api.predict(&sample_request()).await.unwrap();
        assert_eq!(salary, 123456.5);
    }

    #[tokio::test]
    async fn test_predict_surfaces_service_error_message() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid Job Title." })),
                )
            }),
        );
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        match api.predict(&sample_request()).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Invalid Job Title."));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_has_no_message() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::BAD_GATEWAY, "Bad Gateway") }),
        );
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        match api.predict(&sample_request()).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert!(message.is_none());
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_average_salary_posts_job_title() {
        let router = Router::new().route(
            "/average-salary",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "Job Title": "Data Analyst" }));
                Json(json!({ "average_salary": 95000.0 }))
            }),
        );
        let api = HttpSalaryApi::new(spawn_stub(router).await).unwrap();

        assert_eq!(api.average_salary("Data Analyst").await.unwrap(), 95000.0);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpSalaryApi::new(format!("http://{addr}")).unwrap();
        assert!(matches!(api.job_titles().await, Err(ApiError::Http(_))));
    }
}
