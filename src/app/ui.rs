use super::palette::{status_color, ACCENT, ERROR, SUCCESS};
use super::state::PanelState;
use super::UploaderApp;
use eframe::egui::{self, Align, Align2, RichText};
use share_uploader::upload::{
    overall_progress, FileKind, TaskId, TaskView, UploadCategory, UploadStatus,
};
use share_uploader::utils::file_size::FileSizeUtils;

fn kind_icon(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Image => "🖼",
        FileKind::Video => "🎬",
        FileKind::Audio => "🎵",
        FileKind::Archive => "🗜",
        FileKind::Document => "📄",
    }
}

impl UploaderApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Upload New Files");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Securely upload and manage your files")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_drop_zone(ui);

                let snapshot = self.queue.snapshot();
                if !snapshot.is_empty() {
                    ui.add_space(20.0);
                    self.render_queue(ui, &snapshot);
                }

                ui.add_space(20.0);
                self.render_settings(ui);

                ui.add_space(20.0);
                self.render_stats(ui, &snapshot);

                if let Some(error) = &self.state.error_message {
                    ui.add_space(10.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(ERROR, error);
                    });
                }
                ui.add_space(20.0);
            });
        });

        self.render_toasts(ctx);
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let limit = FileSizeUtils::format_size(self.queue.max_file_size());
        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("☁ Drop files here or click to browse").strong());
                ui.label(
                    RichText::new(format!("Support for all file types up to {} per file", limit))
                        .small(),
                );
                ui.add_space(8.0);
                if ui.button("📂 Browse Files").clicked() {
                    self.browse_files();
                }
                ui.add_space(12.0);
            });
        });
    }

    fn render_queue(&mut self, ui: &mut egui::Ui, snapshot: &[TaskView]) {
        let mut removed: Option<TaskId> = None;
        let ready = self.queue.is_batch_ready();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Upload Queue ({})", snapshot.len())).strong());
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("🗑 Clear All").clicked() {
                        self.reset_upload_state();
                    }
                    if ui
                        .add_enabled(ready, egui::Button::new("✔ Complete Upload"))
                        .clicked()
                    {
                        self.complete_upload();
                    }
                });
            });

            let progress = overall_progress(snapshot);
            ui.add(
                egui::ProgressBar::new(progress)
                    .show_percentage()
                    .fill(ACCENT),
            );
            ui.label(PanelState::get_status_text(&self.queue.stats()));
            ui.add_space(8.0);

            for task in snapshot {
                if render_task_row(ui, task) {
                    removed = Some(task.id);
                }
                ui.add_space(6.0);
            }
        });

        if let Some(id) = removed {
            self.remove_file(id);
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        let settings = self.queue.settings_mut();
        ui.group(|ui| {
            ui.label(RichText::new("🛡 Upload Settings").strong());
            ui.add_space(8.0);

            egui::ComboBox::from_label("Category")
                .selected_text(settings.category.label())
                .show_ui(ui, |ui| {
                    for category in UploadCategory::ALL {
                        ui.selectable_value(&mut settings.category, category, category.label());
                    }
                });

            ui.add_space(8.0);
            ui.label("Description (Optional)");
            ui.add(
                egui::TextEdit::multiline(&mut settings.description)
                    .hint_text("Add a description for your files...")
                    .desired_rows(3),
            );

            ui.add_space(8.0);
            ui.label("Privacy Setting");
            ui.horizontal(|ui| {
                ui.radio_value(&mut settings.private, true, "🔒 Private");
                ui.radio_value(&mut settings.private, false, "🌐 Public");
            });
        });
    }

    fn render_stats(&mut self, ui: &mut egui::Ui, snapshot: &[TaskView]) {
        let stats = self.queue.stats();
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Completed");
                ui.label(RichText::new(stats.completed_count.to_string()).strong());
            });
            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Total Files");
                ui.label(RichText::new(stats.total_files.to_string()).strong());
            });
            ui.horizontal(|ui| {
                ui.label("Total Size");
                ui.label(RichText::new(FileSizeUtils::format_size(stats.total_bytes)).strong());
            });

            if let Some(summary) = &self.state.last_summary {
                ui.separator();
                ui.colored_label(
                    SUCCESS,
                    format!(
                        "Submitted {} file(s), {} as {}",
                        summary.files.len(),
                        FileSizeUtils::format_size(summary.total_bytes),
                        summary.settings.category.label()
                    ),
                );
            }

            if !snapshot.is_empty() {
                ui.add_space(6.0);
                if ui
                    .button(if self.state.show_details {
                        "Hide Details"
                    } else {
                        "Show Details"
                    })
                    .clicked()
                {
                    self.state.show_details = !self.state.show_details;
                }
                if self.state.show_details {
                    render_details(ui, snapshot);
                }
            }
        });
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.state.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
            .show(ctx, |ui| {
                for (index, toast) in self.state.toasts.iter().enumerate() {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.horizontal(|ui| {
                            let title = RichText::new(toast.notification.title()).strong();
                            if toast.notification.is_error() {
                                ui.colored_label(ERROR, title);
                            } else {
                                ui.label(title);
                            }
                            if ui.small_button("✖").clicked() {
                                dismissed = Some(index);
                            }
                        });
                        ui.label(toast.notification.description());
                    });
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = dismissed {
            self.state.dismiss(index);
        }
    }
}

/// Draws one queue row. Returns true when its remove button was clicked.
fn render_task_row(ui: &mut egui::Ui, task: &TaskView) -> bool {
    let mut remove = false;

    egui::Frame::none()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                // a generated preview replaces the generic kind icon
                let icon = if task.preview_uri.is_some() {
                    "🖼"
                } else {
                    kind_icon(task.kind)
                };
                ui.label(RichText::new(icon).size(24.0));

                ui.vertical(|ui| {
                    ui.label(RichText::new(&task.name).strong());
                    let mime = if task.mime_type.is_empty() {
                        "Unknown type"
                    } else {
                        task.mime_type.as_str()
                    };
                    ui.label(
                        RichText::new(format!(
                            "{} • {}",
                            FileSizeUtils::format_size(task.size),
                            mime
                        ))
                        .small(),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        remove = true;
                    }
                    ui.colored_label(status_color(task.status), task.status.label());
                });
            });

            let bar = egui::ProgressBar::new(task.progress / 100.0).fill(status_color(task.status));
            ui.add(bar);
            if let Some(error) = &task.error {
                ui.colored_label(status_color(UploadStatus::Errored), error);
            }
        });

    remove
}

fn render_details(ui: &mut egui::Ui, snapshot: &[TaskView]) {
    egui::ScrollArea::vertical()
        .id_source("details")
        .max_height(200.0)
        .show(ui, |ui| {
            for task in snapshot {
                ui.horizontal(|ui| {
                    let marker = match task.status {
                        UploadStatus::Queued => "⏳",
                        UploadStatus::Uploading => "📤",
                        UploadStatus::Completed => "✅",
                        UploadStatus::Errored => "❌",
                        UploadStatus::Cancelled => "⏩",
                    };
                    ui.label(marker);
                    ui.colored_label(
                        status_color(task.status),
                        format!(
                            "{} - {:.0}% - added {}",
                            task.name,
                            task.progress,
                            task.created_at.format("%H:%M:%S")
                        ),
                    );
                });
            }
        });
}
