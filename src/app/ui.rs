use super::{CtUploader, Tint};
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

fn tint_color(tint: Tint) -> Color32 {
    match tint {
        Tint::Neutral => Color32::from_rgb(161, 89, 225),
        Tint::Good => Color32::from_rgb(76, 175, 80),
        Tint::Bad => Color32::from_rgb(229, 57, 53),
    }
}

impl CtUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("CT Study Analyzer");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Upload a ZIP of a DICOM series for analysis")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_dropzone(ui);
                    ui.add_space(20.0);

                    ui.vertical_centered(|ui| {
                        let submit_enabled = self.presentation.view().submit_enabled;

                        ui.horizontal(|ui| {
                            ui.add_enabled_ui(submit_enabled, |ui| {
                                let button = egui::Button::new("📤 Analyze")
                                    .min_size(egui::vec2(200.0, 40.0));
                                if ui.add(button).clicked() {
                                    self.start_upload();
                                }
                            });

                            ui.add_space(5.0);
                            if ui.button("🗑 Reset").clicked() {
                                self.reset();
                            }
                        });
                    });

                    ui.add_space(20.0);

                    if self.presentation.view().progress_visible {
                        self.render_progress(ui);
                    }

                    if self.presentation.view().result_visible {
                        ui.add_space(10.0);
                        self.render_result(ui);
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });
    }

    fn render_dropzone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

        ui.group(|ui| {
            ui.set_min_height(80.0);
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                let text = RichText::new(&self.presentation.view().selection_text);
                if hovering {
                    ui.label(text.strong());
                } else {
                    ui.label(text);
                }
                ui.add_space(8.0);

                if ui.button("📁 Choose File").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("ZIP archive", &["zip"])
                        .pick_file()
                    {
                        self.pick_path(&path);
                    }
                }
                ui.add_space(10.0);
            });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        let view = self.presentation.view();
        ui.group(|ui| {
            let progress_bar = egui::ProgressBar::new(view.progress)
                .text(view.progress_label())
                .animate(false)
                .fill(tint_color(view.tint));
            ui.add(progress_bar);
        });
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let mut open_report = false;

        ui.group(|ui| {
            let view = self.presentation.view();

            egui::Frame::none()
                .fill(ui.style().visuals.extreme_bg_color)
                .show(ui, |ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new(&view.result_json).monospace());
                    ui.add_space(8.0);
                });

            if view.report_link.is_some() {
                ui.add_space(8.0);
                if ui.link("📄 Download report").clicked() {
                    open_report = true;
                }
            }

            if !view.warnings.is_empty() {
                ui.add_space(8.0);
                ui.colored_label(tint_color(Tint::Bad), "Warnings:");
                for line in &view.warnings {
                    ui.label(line);
                }
            }
        });

        if open_report {
            self.open_report();
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!(
                    "Service: {}",
                    self.client.config().api_base()
                ))
                .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
        });

        if let Some(notice) = &self.presentation.view().notice {
            ui.add_space(5.0);
            ui.vertical_centered(|ui| {
                ui.colored_label(Color32::from_rgb(220, 50, 50), notice);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tints_are_distinct() {
        assert_eq!(tint_color(Tint::Good), Color32::from_rgb(0x4c, 0xaf, 0x50));
        assert_eq!(tint_color(Tint::Bad), Color32::from_rgb(0xe5, 0x39, 0x35));
        assert_ne!(tint_color(Tint::Neutral), tint_color(Tint::Good));
        assert_ne!(tint_color(Tint::Neutral), tint_color(Tint::Bad));
    }
}
