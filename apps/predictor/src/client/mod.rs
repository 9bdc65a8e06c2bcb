//! PredictionClient: owns the connection to the salary service for one
//! session and everything derived from it.
//!
//! State held here (connectivity, the job-title cache, the last prediction
//! and its market comparison) is scoped to the session that owns the client.
//! Presentation code reads it through accessors and never mutates it.

pub mod suggestions;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api_client::SalaryApi;
use crate::errors::{ComparisonFetchError, ConnectivityError, PredictionError};
use crate::models::form::FormInput;

/// Upper bound on the job-title probe. Long enough to ride out a cold start
/// on the hosted service, short enough to tell the user something useful.
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub predicted_salary: f64,
}

/// Market average for the submitted job title next to the prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonData {
    pub actual: f64,
    pub predicted: f64,
}

pub struct PredictionClient {
    api: Arc<dyn SalaryApi>,
    state: ConnectivityState,
    job_titles: Vec<String>,
    last_error: Option<String>,
    prediction: Option<PredictionResult>,
    comparison: Option<ComparisonData>,
}

impl PredictionClient {
    /// Starts in `Checking`; call `check_connectivity` to resolve it.
    pub fn new(api: Arc<dyn SalaryApi>) -> Self {
        Self {
            api,
            state: ConnectivityState::Checking,
            job_titles: Vec::new(),
            last_error: None,
            prediction: None,
            comparison: None,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn job_titles(&self) -> &[String] {
        &self.job_titles
    }

    /// The inline error currently shown to the user, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn prediction(&self) -> Option<PredictionResult> {
        self.prediction
    }

    pub fn comparison(&self) -> Option<ComparisonData> {
        self.comparison
    }

    pub fn can_submit(&self) -> bool {
        self.state == ConnectivityState::Connected
    }

    pub fn suggest_job_titles(&self, typed: &str, limit: usize) -> Vec<&str> {
        suggestions::suggest(&self.job_titles, typed, limit)
    }

    /// Status line shown under the job-title field.
    pub fn job_titles_status(&self) -> String {
        match (self.state, self.job_titles.len()) {
            (ConnectivityState::Connected, 0) => "Loading job titles...".to_string(),
            (ConnectivityState::Connected, n) => format!("{n} job titles loaded"),
            _ => "Connect to the prediction service to load job titles".to_string(),
        }
    }

    /// Probes the service by listing job titles, bounded by `CONNECTIVITY_TIMEOUT`.
    ///
    /// On success the job-title cache is replaced. On failure the cache keeps
    /// whatever the last successful probe stored.
    pub async fn check_connectivity(&mut self) -> ConnectivityState {
        self.state = ConnectivityState::Checking;
        self.last_error = None;
        info!("Checking prediction service connectivity");

        match self.fetch_job_titles().await {
            Ok(titles) => {
                info!("Connected to prediction service ({} job titles)", titles.len());
                self.job_titles = titles;
                self.state = ConnectivityState::Connected;
            }
            Err(e) => {
                warn!("Prediction service unavailable: {e}");
                self.last_error = Some(e.user_message().to_string());
                self.state = ConnectivityState::Disconnected;
            }
        }

        self.state
    }

    /// Manual reconnect. Only acts while disconnected.
    pub async fn retry(&mut self) -> ConnectivityState {
        if self.state != ConnectivityState::Disconnected {
            debug!("Retry ignored in state {:?}", self.state);
            return self.state;
        }
        self.check_connectivity().await
    }

    /// Validates the form, requests a prediction, then makes a best-effort
    /// lookup of the market average for the same job title.
    ///
    /// Rejected without any network call when not connected or when the form
    /// fails validation. Each attempt replaces the last error; a validation
    /// failure keeps the previous result on screen. The previous result and
    /// comparison are cleared before the request goes out. A failed average
    /// lookup is logged and leaves the prediction in place.
    pub async fn submit(&mut self, input: &FormInput) -> Result<PredictionResult, PredictionError> {
        if !self.can_submit() {
            return Err(PredictionError::NotConnected);
        }

        self.last_error = None;
        let request = match input.to_request() {
            Ok(request) => request,
            Err(e) => {
                let err = PredictionError::from(e);
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        self.prediction = None;
        self.comparison = None;

        debug!("Submitting prediction request: {:?}", request);
        let predicted_salary = match self.api.predict(&request).await {
            Ok(salary) => salary,
            Err(e) => {
                let err = PredictionError::from(e);
                warn!("Prediction failed: {err:?}");
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        let result = PredictionResult { predicted_salary };
        self.prediction = Some(result);

        match self.fetch_comparison(&request.job_title, predicted_salary).await {
            Ok(comparison) => self.comparison = Some(comparison),
            Err(e) => warn!("{e}"),
        }

        Ok(result)
    }

    async fn fetch_job_titles(&self) -> Result<Vec<String>, ConnectivityError> {
        match tokio::time::timeout(CONNECTIVITY_TIMEOUT, self.api.job_titles()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ConnectivityError::Timeout(CONNECTIVITY_TIMEOUT)),
        }
    }

    async fn fetch_comparison(
        &self,
        job_title: &str,
        predicted: f64,
    ) -> Result<ComparisonData, ComparisonFetchError> {
        let actual = self
            .api
            .average_salary(job_title)
            .await
            .map_err(|source| ComparisonFetchError {
                job_title: job_title.to_string(),
                source,
            })?;

        Ok(ComparisonData { actual, predicted })
    }
}
