//! Per-user dashboard state: navigation plus the latest analysis

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::export::{build_report, ExportFormat, ExportReport};
use crate::models::ProfileInput;
use crate::navigation::{NavSnapshot, Navigator, Phase, View};
use crate::planner::{Analysis, TaxPlanner};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    navigator: Navigator,
    analysis: Option<Analysis>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigation(&self) -> NavSnapshot {
        self.navigator.snapshot()
    }

    pub fn view(&self) -> View {
        self.navigator.view()
    }

    /// Latest successful analysis, if any
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn select(&mut self, view: View) -> Result<View> {
        self.navigator.navigate(view)
    }

    /// Validate and analyze a submission in one step
    pub fn submit(&mut self, input: &ProfileInput, planner: &TaxPlanner) -> Result<&Analysis> {
        self.begin_submission()?;
        let result = planner.intake(input);
        self.finish_submission(result)
    }

    /// Mark a submission as pending.
    ///
    /// Fails with [`crate::Error::SubmissionPending`] while another one is loading.
    pub fn begin_submission(&mut self) -> Result<()> {
        self.navigator.begin_submission().map(|_| ())
    }

    /// Record the outcome of a pending submission.
    ///
    /// On failure the previous analysis and view are kept and the error is
    /// returned unchanged.
    pub fn finish_submission(&mut self, result: Result<Analysis>) -> Result<&Analysis> {
        match result {
            Ok(analysis) => {
                self.navigator.complete_submission(true)?;
                info!(
                    view = self.navigator.view().as_str(),
                    suggestions = analysis.suggestions.len(),
                    "Profile submitted"
                );
                let analysis = self.analysis.insert(analysis);
                Ok(&*analysis)
            }
            Err(e) => {
                self.navigator.fail_submission()?;
                Err(e)
            }
        }
    }

    /// Render the current analysis for download
    pub fn export(&self, format: ExportFormat, generated_at: DateTime<Utc>) -> Result<ExportReport> {
        let analysis = self.analysis.as_ref();
        build_report(
            analysis.map(|a| &a.profile),
            analysis.map(|a| &a.derivation.summary),
            analysis.map(|a| a.suggestions.as_slice()).unwrap_or_default(),
            format,
            generated_at,
        )
    }

    /// Whether a submission is currently loading
    pub fn is_pending(&self) -> bool {
        self.navigator.phase() == Phase::Loading
    }
}
