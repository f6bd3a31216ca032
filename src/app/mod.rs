mod state;
mod ui;

use crate::upload::{AnalyzerClient, CandidateFile, UploadEvent, UploadEventKind};
use derivative::Derivative;
use eframe::{egui, App};
use log::{error, info, warn};
pub use state::{
    AnalyzerView, Panel, Presentation, Tint, UploadTicket, ViewModel, ViewState, DROP_PROMPT,
};
use std::path::Path;
use std::sync::mpsc as std_mpsc;

#[derive(Derivative)]
#[derivative(Debug)]
pub struct CtUploader {
    client: AnalyzerClient,
    presentation: Presentation<ViewModel>,
    #[derivative(Debug = "ignore")]
    event_receiver: Option<std_mpsc::Receiver<UploadEvent>>,
}

impl CtUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, client: AnalyzerClient) -> Self {
        info!(
            "Initializing CT study uploader against {}",
            client.config().api_base()
        );
        Self {
            client,
            presentation: Presentation::new(ViewModel::default()),
            event_receiver: None,
        }
    }

    pub fn pick_path(&mut self, path: &Path) {
        match CandidateFile::from_path(path) {
            Ok(file) => {
                self.presentation.select(file);
            }
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                self.presentation
                    .view_mut()
                    .render_error(&format!("Cannot read {}: {}", path.display(), e));
            }
        }
    }

    pub fn reset(&mut self) {
        self.presentation.reset();
        self.event_receiver = None;
    }

    pub fn start_upload(&mut self) {
        let Some(ticket) = self.presentation.begin_upload() else {
            return;
        };

        let (event_sender, event_receiver) = std_mpsc::channel();
        self.event_receiver = Some(event_receiver);

        let client = self.client.clone();
        info!(
            "Starting upload #{} of '{}'",
            ticket.generation, ticket.file.name
        );

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start upload runtime: {}", e);
                    event_sender
                        .send(UploadEvent {
                            generation: ticket.generation,
                            kind: UploadEventKind::Finished(Err(e.into())),
                        })
                        .unwrap_or_default();
                    return;
                }
            };

            let (progress_sender, progress_receiver) = std_mpsc::channel::<f32>();
            let forward_sender = event_sender.clone();
            let generation = ticket.generation;
            let forwarder = std::thread::spawn(move || {
                for fraction in progress_receiver {
                    forward_sender
                        .send(UploadEvent {
                            generation,
                            kind: UploadEventKind::Progress(fraction),
                        })
                        .unwrap_or_default();
                }
            });

            let outcome =
                runtime.block_on(async { client.upload(&ticket.file, Some(progress_sender)).await });

            // Dropping the runtime drops the request body and with it the
            // progress sender, which ends the forwarder.
            drop(runtime);
            forwarder.join().unwrap_or_default();
            event_sender
                .send(UploadEvent {
                    generation,
                    kind: UploadEventKind::Finished(outcome),
                })
                .unwrap_or_default();
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.first() {
            self.pick_path(path);
        }

        let Some(receiver) = &self.event_receiver else {
            return;
        };

        let mut had_updates = false;
        let mut finished = false;
        while let Ok(event) = receiver.try_recv() {
            had_updates = true;
            match event.kind {
                UploadEventKind::Progress(fraction) => {
                    self.presentation.on_progress(event.generation, fraction);
                }
                UploadEventKind::Finished(Ok(result)) => {
                    self.presentation.on_success(event.generation, result);
                    finished = true;
                }
                UploadEventKind::Finished(Err(e)) => {
                    self.presentation.on_failure(event.generation, &e);
                    finished = true;
                }
            }
        }

        if finished {
            self.event_receiver = None;
        }
        if had_updates || self.presentation.is_in_flight() {
            ctx.request_repaint();
        }
    }

    fn open_report(&mut self) {
        let Some(path) = self.presentation.view().report_link.clone() else {
            return;
        };

        match self.client.config().report_url(&path) {
            Ok(url) => {
                info!("Opening report {}", url);
                if let Err(e) = open::that(&url) {
                    error!("Failed to open report link: {}", e);
                    self.presentation
                        .view_mut()
                        .render_error(&format!("Failed to open report: {}", e));
                }
            }
            Err(e) => self.presentation.view_mut().render_error(&e.to_string()),
        }
    }
}

impl App for CtUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
