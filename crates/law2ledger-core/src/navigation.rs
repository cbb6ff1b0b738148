//! Dashboard navigation
//!
//! Three tabs (profile, suggestions, visual) and a submission phase. Every
//! state change goes through [`transition`], which is the single table of
//! allowed moves.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Dashboard tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Profile,
    Suggestions,
    Visual,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Suggestions => "suggestions",
            Self::Visual => "visual",
        }
    }

    pub fn all() -> &'static [View] {
        &[Self::Profile, Self::Suggestions, Self::Visual]
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profile" => Ok(Self::Profile),
            "suggestions" => Ok(Self::Suggestions),
            "visual" => Ok(Self::Visual),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Submission phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

/// Input to the navigation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// User picked a tab
    Select(View),
    /// A profile submission started
    Submit,
    /// Intake succeeded; `summary_available` unlocks the visual tab
    SubmitSucceeded { summary_available: bool },
    /// Intake failed; the dashboard keeps its previous data
    SubmitFailed,
}

/// Navigation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub view: View,
    pub phase: Phase,
    profile_submitted: bool,
    summary_available: bool,
}

impl NavState {
    pub fn is_unlocked(&self, view: View) -> bool {
        match view {
            View::Profile => true,
            View::Suggestions => self.profile_submitted,
            View::Visual => self.profile_submitted && self.summary_available,
        }
    }

    pub fn unlocked(&self) -> Vec<View> {
        View::all()
            .iter()
            .copied()
            .filter(|v| self.is_unlocked(*v))
            .collect()
    }
}

/// Serializable view of the navigation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSnapshot {
    pub view: View,
    pub phase: Phase,
    pub unlocked: Vec<View>,
}

impl From<&NavState> for NavSnapshot {
    fn from(state: &NavState) -> Self {
        Self {
            view: state.view,
            phase: state.phase,
            unlocked: state.unlocked(),
        }
    }
}

/// The transition table
pub fn transition(state: &NavState, event: NavEvent) -> Result<NavState> {
    match (state.phase, event) {
        (_, NavEvent::Select(view)) if state.is_unlocked(view) => Ok(NavState { view, ..*state }),
        (_, NavEvent::Select(view)) => Err(Error::Navigation(format!(
            "the {} tab is locked until a profile has been submitted",
            view
        ))),

        (Phase::Loading, NavEvent::Submit) => Err(Error::SubmissionPending),
        (_, NavEvent::Submit) => Ok(NavState {
            phase: Phase::Loading,
            ..*state
        }),

        (Phase::Loading, NavEvent::SubmitSucceeded { summary_available }) => Ok(NavState {
            view: View::Suggestions,
            phase: Phase::Ready,
            profile_submitted: true,
            summary_available,
        }),
        (Phase::Loading, NavEvent::SubmitFailed) => Ok(NavState {
            phase: if state.profile_submitted {
                Phase::Ready
            } else {
                Phase::Idle
            },
            ..*state
        }),
        (_, NavEvent::SubmitSucceeded { .. } | NavEvent::SubmitFailed) => Err(Error::Navigation(
            "no profile submission is in progress".to_string(),
        )),
    }
}

/// Owns a [`NavState`] and applies events to it
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot::from(&self.state)
    }

    /// Apply an event; the state is unchanged when the event is rejected
    pub fn apply(&mut self, event: NavEvent) -> Result<View> {
        match transition(&self.state, event) {
            Ok(next) => {
                self.state = next;
                Ok(next.view)
            }
            Err(e) => {
                warn!(view = self.state.view.as_str(), error = %e, "Navigation rejected");
                Err(e)
            }
        }
    }

    pub fn navigate(&mut self, view: View) -> Result<View> {
        self.apply(NavEvent::Select(view))
    }

    pub fn begin_submission(&mut self) -> Result<View> {
        self.apply(NavEvent::Submit)
    }

    pub fn complete_submission(&mut self, summary_available: bool) -> Result<View> {
        self.apply(NavEvent::SubmitSucceeded { summary_available })
    }

    pub fn fail_submission(&mut self) -> Result<View> {
        self.apply(NavEvent::SubmitFailed)
    }
}
