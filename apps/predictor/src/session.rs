//! Interactive terminal session: reads the form line by line, drives the
//! `PredictionClient` and renders its state.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::client::{ConnectivityState, PredictionClient};
use crate::display::comparison_chart::render_chart;
use crate::display::result_view::render_result;
use crate::models::form::{
    Education, FormInput, Gender, AGE_FIELD, AGE_MAX, AGE_MIN, EXPERIENCE_FIELD, EXPERIENCE_MAX,
    EXPERIENCE_MIN, EXPERIENCE_STEP,
};

const MAX_SUGGESTIONS: usize = 5;

pub struct Session<R, W> {
    client: PredictionClient,
    base_url: String,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(client: PredictionClient, base_url: impl Into<String>, input: R, out: W) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            lines: input.lines(),
            out,
        }
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Employee Salary Predictor")?;
        writeln!(self.out, "Backend: {}", self.base_url)?;
        self.render_status()?;
        self.client.check_connectivity().await;

        loop {
            self.render_status()?;
            let keep_going = match self.client.state() {
                ConnectivityState::Connected => self.form_round().await?,
                _ => self.offer_retry().await?,
            };
            if !keep_going {
                break;
            }
        }

        writeln!(self.out, "Goodbye.")?;
        Ok(())
    }

    fn render_status(&mut self) -> Result<()> {
        match self.client.state() {
            ConnectivityState::Checking => writeln!(
                self.out,
                "Connecting to the prediction service... This may take a moment if the \
                 service is starting up (cold start)."
            )?,
            ConnectivityState::Connected => {
                writeln!(self.out, "[connected] Prediction service connected")?
            }
            ConnectivityState::Disconnected => {
                writeln!(self.out, "[disconnected] Prediction service disconnected")?
            }
        }
        // Submission errors are printed by `form_round` as they happen.
        if self.client.state() != ConnectivityState::Connected {
            if let Some(err) = self.client.last_error() {
                writeln!(self.out, "Error: {err}")?;
            }
        }
        Ok(())
    }

    async fn offer_retry(&mut self) -> Result<bool> {
        writeln!(
            self.out,
            "Prediction service unavailable. Wait a moment, then retry to reconnect."
        )?;
        let Some(answer) = self.prompt("[r]etry or [q]uit").await? else {
            return Ok(false);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(false);
        }

        writeln!(self.out, "Reconnecting...")?;
        self.client.retry().await;
        Ok(true)
    }

    /// Collects one form, submits it and shows the outcome. Returns `false`
    /// when the user is done.
    async fn form_round(&mut self) -> Result<bool> {
        let Some(form) = self.read_form().await? else {
            return Ok(false);
        };

        if self.client.can_submit() && form.to_request().is_ok() {
            writeln!(self.out, "Predicting...")?;
        }
        match self.client.submit(&form).await {
            Ok(_) => {
                if let Some(result) = self.client.prediction() {
                    write!(self.out, "{}", render_result(&result))?;
                }
                if let Some(comparison) = self.client.comparison() {
                    write!(self.out, "{}", render_chart(&comparison))?;
                }
            }
            Err(e) => {
                debug!("Submission rejected: {e:?}");
                writeln!(self.out, "Error: {e}")?;
            }
        }

        let Some(again) = self.prompt("Predict another salary? [Y/n]").await? else {
            return Ok(false);
        };
        Ok(!again.eq_ignore_ascii_case("n"))
    }

    async fn read_form(&mut self) -> Result<Option<FormInput>> {
        let mut form = FormInput::default();

        let label = format!(
            "{EXPERIENCE_FIELD} ({EXPERIENCE_MIN}-{EXPERIENCE_MAX}, steps of {EXPERIENCE_STEP})"
        );
        let Some(experience) = self.prompt(&label).await? else {
            return Ok(None);
        };
        form.experience = experience;

        let Some(age) = self.prompt(&format!("{AGE_FIELD} ({AGE_MIN}-{AGE_MAX})")).await? else {
            return Ok(None);
        };
        form.age = age;

        let options = Education::ALL.map(|e| e.as_str()).join(" / ");
        let Some(education) = self.prompt(&format!("Education Level ({options})")).await? else {
            return Ok(None);
        };
        form.education = education;

        writeln!(self.out, "{}", self.client.job_titles_status())?;
        let Some(job_title) = self.prompt("Job Title (e.g. Software Engineer)").await? else {
            return Ok(None);
        };
        self.show_suggestions(&job_title)?;
        form.job_title = job_title;

        let options = Gender::ALL.map(|g| g.as_str()).join(" / ");
        let Some(gender) = self.prompt(&format!("Gender ({options})")).await? else {
            return Ok(None);
        };
        form.gender = gender;

        Ok(Some(form))
    }

    /// Lists close matches when the typed title is not one the service knows.
    /// The service resolves near-misses itself, so this is informational.
    fn show_suggestions(&mut self, typed: &str) -> Result<()> {
        let known = self
            .client
            .job_titles()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(typed));
        if known {
            return Ok(());
        }

        let matches = self.client.suggest_job_titles(typed, MAX_SUGGESTIONS);
        if !matches.is_empty() {
            writeln!(self.out, "Close matches: {}", matches.join(", "))?;
        }
        Ok(())
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}
