//! Shell-level session state: dates, selected date, captures, selected
//! capture. Transitions are pure; I/O is requested through effects.

use brick_review_domain::{next_capture, CaptureKey, CaptureSummary};
use log::debug;

use crate::ApiError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub dates: Vec<String>,
    pub selected_date: Option<String>,
    pub captures: Vec<CaptureSummary>,
    pub selected_capture: Option<String>,
    pub loading_dates: bool,
    pub loading_captures: bool,
    pub error: Option<String>,
    capture_generation: u64,
}

/// Identifies one capture-list load. Only the most recent one is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureRequest {
    pub date: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Start,
    DatesLoaded(Result<Vec<String>, ApiError>),
    SelectDate(String),
    CapturesLoaded {
        request: CaptureRequest,
        result: Result<Vec<CaptureSummary>, ApiError>,
    },
    SelectCapture(String),
    AdvanceToNext,
    RefreshCaptures,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    LoadDates,
    LoadCaptures(CaptureRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<SessionEffect>,
}

impl Transition {
    fn unchanged(state: &SessionState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn reduce(&self, action: SessionAction) -> Transition {
        match action {
            SessionAction::Start => {
                let mut state = self.clone();
                state.loading_dates = true;
                Transition {
                    state,
                    effects: vec![SessionEffect::LoadDates],
                }
            }
            SessionAction::DatesLoaded(Ok(dates)) => {
                let mut state = self.clone();
                state.loading_dates = false;
                state.error = None;
                state.dates = dates;
                if state.selected_date.is_some() {
                    return Transition {
                        state,
                        effects: Vec::new(),
                    };
                }
                match state.dates.first().cloned() {
                    Some(first) => state.select_date(first),
                    None => Transition {
                        state,
                        effects: Vec::new(),
                    },
                }
            }
            SessionAction::DatesLoaded(Err(error)) => {
                let mut state = self.clone();
                state.loading_dates = false;
                state.error = Some(format!("Failed to load dates: {error}"));
                Transition {
                    state,
                    effects: Vec::new(),
                }
            }
            SessionAction::SelectDate(date) => {
                if self.selected_date.as_deref() == Some(date.as_str()) {
                    let mut state = self.clone();
                    state.selected_capture = None;
                    return Transition {
                        state,
                        effects: Vec::new(),
                    };
                }
                self.clone().select_date(date)
            }
            SessionAction::CapturesLoaded { request, result } => {
                if self.selected_date.as_deref() != Some(request.date.as_str()) {
                    debug!("dropping capture list for {}, no longer selected", request.date);
                    return Transition::unchanged(self);
                }
                if request.generation != self.capture_generation {
                    debug!(
                        "dropping capture list for {} (generation {}), a newer load is pending",
                        request.date, request.generation
                    );
                    return Transition::unchanged(self);
                }
                let date = request.date;
                let mut state = self.clone();
                state.loading_captures = false;
                match result {
                    Ok(captures) => {
                        state.error = None;
                        state.captures = captures;
                        let still_listed = state.selected_capture.as_deref().is_some_and(|id| {
                            state.captures.iter().any(|capture| capture.capture_id == id)
                        });
                        if !still_listed {
                            state.selected_capture = None;
                        }
                    }
                    Err(error) => {
                        state.error = Some(format!("Failed to load captures for {date}: {error}"));
                    }
                }
                Transition {
                    state,
                    effects: Vec::new(),
                }
            }
            SessionAction::SelectCapture(capture_id) => {
                if !self
                    .captures
                    .iter()
                    .any(|capture| capture.capture_id == capture_id)
                {
                    return Transition::unchanged(self);
                }
                let mut state = self.clone();
                state.selected_capture = Some(capture_id);
                Transition {
                    state,
                    effects: Vec::new(),
                }
            }
            SessionAction::AdvanceToNext => match self.next_capture() {
                Some(next) => {
                    let mut state = self.clone();
                    state.selected_capture = Some(next.capture_id.clone());
                    Transition {
                        state,
                        effects: Vec::new(),
                    }
                }
                None => Transition::unchanged(self),
            },
            SessionAction::RefreshCaptures => match self.selected_date.clone() {
                Some(date) => {
                    let mut state = self.clone();
                    let request = state.next_capture_request(date);
                    Transition {
                        state,
                        effects: vec![SessionEffect::LoadCaptures(request)],
                    }
                }
                None => Transition::unchanged(self),
            },
        }
    }

    fn select_date(mut self, date: String) -> Transition {
        self.selected_date = Some(date.clone());
        self.selected_capture = None;
        self.captures.clear();
        let request = self.next_capture_request(date);
        Transition {
            state: self,
            effects: vec![SessionEffect::LoadCaptures(request)],
        }
    }

    fn next_capture_request(&mut self, date: String) -> CaptureRequest {
        self.capture_generation += 1;
        self.loading_captures = true;
        CaptureRequest {
            date,
            generation: self.capture_generation,
        }
    }

    pub fn next_capture(&self) -> Option<&CaptureSummary> {
        next_capture(&self.captures, self.selected_capture.as_deref())
    }

    pub fn selected_summary(&self) -> Option<&CaptureSummary> {
        let selected = self.selected_capture.as_deref()?;
        self.captures
            .iter()
            .find(|capture| capture.capture_id == selected)
    }

    pub fn selected_key(&self) -> Option<CaptureKey> {
        let date = self.selected_date.as_deref()?;
        let capture_id = self.selected_capture.as_deref()?;
        CaptureKey::new(date, capture_id).ok()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_dates || self.loading_captures
    }
}
