use crate::error::AnalyzerError;
use crate::upload::{validate, AnalysisResult, CandidateFile};
use crate::utils::file_size::FileSizeUtils;
use derivative::Derivative;
use log::{debug, info, warn};

pub const DROP_PROMPT: &str = "Drop a ZIP with DICOM files here or choose a file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Uploading,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    #[default]
    Neutral,
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Progress,
    Result,
}

/// What the presentation layer is allowed to do to whatever draws it.
pub trait AnalyzerView {
    fn set_progress(&mut self, fraction: f32, tint: Tint);
    fn render_result(&mut self, result: &AnalysisResult);
    fn clear_result(&mut self);
    fn render_error(&mut self, message: &str);
    fn clear_error(&mut self);
    fn set_visible(&mut self, panel: Panel, visible: bool);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_selection(&mut self, text: &str);
}

/// Plain-data view the egui layer paints from.
#[derive(Derivative, Debug, Clone, PartialEq)]
#[derivative(Default)]
pub struct ViewModel {
    pub progress: f32,
    pub tint: Tint,
    pub progress_visible: bool,
    pub result_visible: bool,
    pub submit_enabled: bool,
    #[derivative(Default(value = "DROP_PROMPT.to_string()"))]
    pub selection_text: String,
    pub result_json: String,
    pub report_link: Option<String>,
    pub warnings: Vec<String>,
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn progress_label(&self) -> String {
        format!("{}%", (self.progress * 100.0).round() as u32)
    }
}

impl AnalyzerView for ViewModel {
    fn set_progress(&mut self, fraction: f32, tint: Tint) {
        self.progress = fraction.clamp(0.0, 1.0);
        self.tint = tint;
    }

    fn render_result(&mut self, result: &AnalysisResult) {
        self.result_json = result.summary_json();
        self.report_link = Some(result.report_path.clone());
        self.warnings = result.warning_lines();
    }

    fn clear_result(&mut self) {
        self.result_json.clear();
        self.report_link = None;
        self.warnings.clear();
    }

    fn render_error(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.notice = None;
    }

    fn set_visible(&mut self, panel: Panel, visible: bool) {
        match panel {
            Panel::Progress => self.progress_visible = visible,
            Panel::Result => self.result_visible = visible,
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_selection(&mut self, text: &str) {
        self.selection_text = text.to_string();
    }
}

/// Handed out by [`Presentation::begin_upload`]; events must quote its generation.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub generation: u64,
    pub file: CandidateFile,
}

/// Owns the candidate and result slots and drives the view through
/// idle, uploading and completed.
///
/// A failed upload deliberately stays in `Uploading`: only a notice is
/// raised and submission is re-enabled. Every submission and every reset
/// bumps the generation, so events from an abandoned request are dropped.
#[derive(Debug)]
pub struct Presentation<V: AnalyzerView> {
    view: V,
    state: ViewState,
    candidate: Option<CandidateFile>,
    result: Option<AnalysisResult>,
    generation: u64,
    in_flight: bool,
    last_progress: f32,
}

impl<V: AnalyzerView> Presentation<V> {
    pub fn new(mut view: V) -> Self {
        view.set_visible(Panel::Progress, false);
        view.set_visible(Panel::Result, false);
        view.set_submit_enabled(false);
        view.set_selection(DROP_PROMPT);

        Self {
            view,
            state: ViewState::Idle,
            candidate: None,
            result: None,
            generation: 0,
            in_flight: false,
            last_progress: 0.0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// A rejected pick leaves the current candidate alone.
    pub fn select(&mut self, file: CandidateFile) -> bool {
        match validate(file) {
            Ok(file) => {
                info!("Selected '{}' ({} bytes)", file.name, file.size);
                self.view.set_selection(&format!(
                    "Selected file: {} ({})",
                    file.name,
                    FileSizeUtils::format_megabytes(file.size)
                ));
                self.candidate = Some(file);
                self.view.clear_error();
                self.view.set_submit_enabled(!self.in_flight);
                true
            }
            Err(e) => {
                warn!("Rejected file ({}): {}", e.reason(), e);
                self.view.render_error(&e.to_string());
                false
            }
        }
    }

    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        if self.in_flight {
            debug!("Upload already in flight, ignoring submit");
            return None;
        }
        let file = self.candidate.clone()?;

        self.generation += 1;
        self.in_flight = true;
        self.last_progress = 0.0;
        self.state = ViewState::Uploading;

        self.view.clear_error();
        self.view.set_visible(Panel::Result, false);
        self.view.set_visible(Panel::Progress, true);
        self.view.set_progress(0.0, Tint::Neutral);
        self.view.set_submit_enabled(false);

        Some(UploadTicket {
            generation: self.generation,
            file,
        })
    }

    pub fn on_progress(&mut self, generation: u64, fraction: f32) {
        if !self.is_current(generation) {
            return;
        }

        let fraction = fraction.clamp(0.0, 1.0).max(self.last_progress);
        self.last_progress = fraction;
        self.view.set_progress(fraction, Tint::Neutral);
    }

    pub fn on_success(&mut self, generation: u64, result: AnalysisResult) {
        if !self.is_current(generation) {
            return;
        }

        let tint = if result.is_normal() {
            Tint::Good
        } else {
            Tint::Bad
        };
        self.view.set_progress(1.0, tint);
        self.view.render_result(&result);
        self.view.set_visible(Panel::Result, true);

        self.result = Some(result);
        self.state = ViewState::Completed;
        self.finish_request();
    }

    pub fn on_failure(&mut self, generation: u64, error: &AnalyzerError) {
        if !self.is_current(generation) {
            return;
        }

        warn!("Upload failed: {}", error);
        self.view.render_error(&format!("Error: {}", error));
        self.finish_request();
    }

    pub fn reset(&mut self) {
        info!("Resetting analyzer view");
        if self.in_flight {
            info!("Abandoning in-flight upload #{}", self.generation);
        }

        self.generation += 1;
        self.in_flight = false;
        self.last_progress = 0.0;
        self.state = ViewState::Idle;
        self.candidate = None;
        self.result = None;

        self.view.clear_result();
        self.view.clear_error();
        self.view.set_selection(DROP_PROMPT);
        self.view.set_submit_enabled(false);
        self.view.set_visible(Panel::Progress, false);
        self.view.set_visible(Panel::Result, false);
    }

    fn finish_request(&mut self) {
        self.in_flight = false;
        self.view.set_submit_enabled(self.candidate.is_some());
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation || !self.in_flight {
            debug!(
                "Dropping stale event from upload #{} (current #{})",
                generation, self.generation
            );
            return false;
        }
        true
    }
}
