use std::time::{Duration, Instant};

use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page as CrPage;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::FillConfig;
use crate::error::{Error, Result};
use crate::scripts::{self, ClickStatus, FieldStatus, PickStatus, TypeStatus};

/// URL prefixes of browser-internal pages scripts must not touch.
const RESTRICTED_PREFIXES: &[&str] = &["chrome://", "chrome-extension://"];

/// Whether a page at `url` is off limits. An unknown URL is treated as
/// restricted.
pub fn is_restricted_url(url: &str) -> bool {
    url.is_empty() || RESTRICTED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Result of committing one value to the page. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Text control updated; `tracked` is set when a legacy value tracker
    /// was found and synced.
    Filled { tracked: bool },
    /// Native select switched to the matching option.
    Selected,
    /// Native select had no option matching the value.
    NoMatchingOption,
    /// Custom dropdown option clicked.
    OptionPicked,
    /// Custom dropdown panel never showed a matching option.
    OptionTimedOut,
    /// No control resolved for the label.
    NotFound,
    /// The control threw while being written to; the pass moves on.
    Failed,
}

impl FillOutcome {
    pub fn is_applied(self) -> bool {
        matches!(
            self,
            FillOutcome::Filled { .. } | FillOutcome::Selected | FillOutcome::OptionPicked
        )
    }
}

/// Confirmation buttons the clicker looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ButtonChoice {
    Yes,
    No,
}

impl ButtonChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonChoice::Yes => "yes",
            ButtonChoice::No => "no",
        }
    }
}

/// Wrapper around a chromiumoxide Page exposing the fill and click actions.
pub struct Page {
    inner: CrPage,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, default_timeout: Duration) -> Self {
        Self { inner, default_timeout }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to the given URL and wait for the page to load.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tokio::time::timeout(self.default_timeout, self.inner.goto(url))
            .await
            .map_err(|_| Error::NavigationError(format!("timed out loading {url}")))?
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Replace the document with the given HTML.
    pub async fn set_content(&self, html: &str) -> Result<()> {
        self.inner
            .set_content(html)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Get the current page URL, empty when the page has none.
    pub async fn url(&self) -> Result<String> {
        Ok(self
            .inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .unwrap_or_default())
    }

    /// Fail with [`Error::RestrictedPage`] when scripts may not run here.
    pub async fn ensure_scriptable(&self) -> Result<()> {
        let url = self.url().await?;
        if is_restricted_url(&url) {
            warn!(%url, "refusing to run on restricted page");
            return Err(Error::RestrictedPage(url));
        }
        Ok(())
    }

    /// Evaluate a JavaScript expression and return the result as a string.
    pub async fn evaluate(&self, expression: &str) -> Result<String> {
        let result = self
            .inner
            .evaluate_expression(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.value() {
            Some(val) => Ok(val.to_string()),
            None => Ok(String::new()),
        }
    }

    /// Run one of the bundled scripts and decode the JSON it returns.
    async fn run_script<T: for<'de> Deserialize<'de>>(&self, js: String) -> Result<T> {
        let result = self.inner.evaluate_expression(js).await.map_err(script_error)?;
        let raw: String = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        scripts::decode(&raw)
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Resolve `label` on the page and commit `value` to the control found.
    pub async fn fill_field(&self, label: &str, value: &str, config: &FillConfig) -> Result<FillOutcome> {
        let delay_ms = config.select_change_delay.as_millis() as u64;
        let status: FieldStatus = self
            .run_script(scripts::fill_field(label, value, delay_ms)?)
            .await?;
        let outcome = match status {
            FieldStatus::Filled { tracked } => FillOutcome::Filled { tracked },
            FieldStatus::Selected => FillOutcome::Selected,
            FieldStatus::NoMatchingOption => FillOutcome::NoMatchingOption,
            FieldStatus::NotFound => FillOutcome::NotFound,
            FieldStatus::DropdownOpened => self.pick_option(value, config).await?,
            FieldStatus::Failed { message } => {
                warn!(label, %message, "field rejected value");
                FillOutcome::Failed
            }
        };
        debug!(label, ?outcome, "fill field");
        Ok(outcome)
    }

    /// Type `value` into the custom dropdown captioned `label` and click the
    /// matching option once the panel renders it.
    pub async fn fill_dropdown(&self, label: &str, value: &str, config: &FillConfig) -> Result<FillOutcome> {
        let status: TypeStatus = self
            .run_script(scripts::type_dropdown(label, value)?)
            .await?;
        let outcome = match status {
            TypeStatus::NotFound => FillOutcome::NotFound,
            TypeStatus::Typed => self.pick_option(value, config).await?,
            TypeStatus::Failed { message } => {
                warn!(label, %message, "dropdown rejected value");
                FillOutcome::Failed
            }
        };
        debug!(label, ?outcome, "fill dropdown");
        Ok(outcome)
    }

    /// Poll the dropdown panel until the option shows up or the timeout
    /// passes.
    async fn pick_option(&self, value: &str, config: &FillConfig) -> Result<FillOutcome> {
        let start = Instant::now();
        loop {
            let status: PickStatus = self.run_script(scripts::pick_option(value)?).await?;
            match status {
                PickStatus::Picked => return Ok(FillOutcome::OptionPicked),
                PickStatus::Pending if start.elapsed() < config.option_timeout => {
                    tokio::time::sleep(config.option_poll_interval).await;
                }
                PickStatus::Pending => return Ok(FillOutcome::OptionTimedOut),
            }
        }
    }

    /// Click every button labelled `choice`. Returns how many were clicked.
    ///
    /// Refuses restricted pages like a fill pass does.
    pub async fn click_buttons(&self, choice: ButtonChoice) -> Result<usize> {
        self.ensure_scriptable().await?;
        let status: ClickStatus = self
            .run_script(scripts::click_buttons(choice.as_str())?)
            .await?;
        info!(choice = choice.as_str(), clicked = status.clicked, "clicked buttons");
        Ok(status.clicked)
    }
}

/// A thrown script is a [`Error::JsError`]; anything else is the
/// connection failing and stays a [`Error::CdpError`].
fn script_error(err: CdpError) -> Error {
    match err {
        CdpError::JavascriptException(details) => Error::JsError(details.text),
        other => Error::CdpError(other),
    }
}
