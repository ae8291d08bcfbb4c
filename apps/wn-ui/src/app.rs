use crate::analysis_worker::{AnalysisWorker, WorkerMessage};
use crate::views::{ConfigView, ResultsAction, ResultsPanel, UploadAction, UploadView};
use egui_file_dialog::FileDialog;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use tracing::info;
use wn_app::{
    AppError, CsvExport, Dashboard, ResultsView, SubmitOutcome, UploadSource, file_name_of,
    load_preset, save_preset,
};
use wn_client::{AnalysisBackend, ClientError, HttpAnalysisClient};

pub struct DashboardApp {
    dashboard: Dashboard,
    backend: Result<Arc<dyn AnalysisBackend>, ClientError>,
    worker: Option<AnalysisWorker>,
    file_dialog: FileDialog,
    file_dialog_action: Option<FileDialogAction>,
    last_directory: Option<PathBuf>,
    upload_view: UploadView,
    config_view: ConfigView,
    results_panel: ResultsPanel,
    status_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileDialogAction {
    OpenNetwork,
    LoadPreset,
    SavePreset,
    SaveCsv,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let backend = HttpAnalysisClient::from_env().map(|client| {
            info!(url = %client.analyze_url(), "analysis service configured");
            Arc::new(client) as Arc<dyn AnalysisBackend>
        });

        let mut dashboard = Dashboard::new();
        if let Err(e) = &backend {
            dashboard.report_error(&AppError::Client(e.clone()));
        }
        let config_view = ConfigView::new(dashboard.config());

        Self {
            dashboard,
            backend,
            worker: None,
            file_dialog: FileDialog::new(),
            file_dialog_action: None,
            last_directory: None,
            upload_view: UploadView,
            config_view,
            results_panel: ResultsPanel::default(),
            status_message: None,
        }
    }

    fn open_dialog(&mut self, action: FileDialogAction) {
        self.file_dialog_action = Some(action);
        match action {
            FileDialogAction::OpenNetwork | FileDialogAction::LoadPreset => {
                self.file_dialog.select_file()
            }
            FileDialogAction::SavePreset | FileDialogAction::SaveCsv => self.file_dialog.save_file(),
        }
    }

    fn remember_directory(&mut self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
    }

    fn open_network(&mut self, path: PathBuf) {
        self.remember_directory(&path);
        let filename = file_name_of(&path);
        self.dashboard
            .upload(UploadSource::Picker, &filename, || std::fs::read(&path));
    }

    fn accept_dropped(&mut self, file: egui::DroppedFile) {
        let egui::DroppedFile {
            path, name, bytes, ..
        } = file;
        let filename = match &path {
            Some(path) => file_name_of(path),
            None => name,
        };

        self.dashboard
            .upload(UploadSource::Drop, &filename, move || match (bytes, path) {
                (Some(bytes), _) => Ok(bytes.to_vec()),
                (None, Some(path)) => std::fs::read(path),
                (None, None) => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "dropped file has no readable contents",
                )),
            });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the first file of a multi-file drop is considered.
        if let Some(file) = dropped.into_iter().next() {
            self.accept_dropped(file);
        }
    }

    fn load_preset_from(&mut self, path: PathBuf) {
        self.remember_directory(&path);
        match load_preset(&path) {
            Ok(config) => {
                self.config_view.sync(&config);
                self.dashboard.replace_config(config);
                self.status_message = Some(format!("Loaded preset {}", path.display()));
            }
            Err(e) => self.status_message = Some(format!("Failed to load preset: {}", e)),
        }
    }

    fn save_preset_to(&mut self, path: PathBuf) {
        self.remember_directory(&path);
        self.status_message = Some(match save_preset(&path, self.dashboard.config()) {
            Ok(()) => format!("Saved preset to {}", path.display()),
            Err(e) => format!("Failed to save preset: {}", e),
        });
    }

    fn save_csv_to(&mut self, path: PathBuf) {
        let Some(received) = self.dashboard.result() else {
            return;
        };
        let export = CsvExport::from_result(&received.result);
        self.status_message = Some(match export.write_file(&path) {
            Ok(()) => format!("Saved {} to {}", export.filename, path.display()),
            Err(e) => format!("Failed to save CSV: {}", e),
        });
        self.remember_directory(&path);
    }

    fn start_analysis(&mut self, ctx: &egui::Context) {
        if self.worker.is_some() {
            return;
        }

        let backend = match &self.backend {
            Ok(backend) => Arc::clone(backend),
            Err(e) => {
                self.dashboard.report_error(&AppError::Client(e.clone()));
                return;
            }
        };

        if let SubmitOutcome::Started(pending) = self.dashboard.begin_submit() {
            self.worker = Some(AnalysisWorker::start(backend, pending, ctx.clone()));
        }
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };

        let (id, outcome) = match worker.result_rx.try_recv() {
            Ok(WorkerMessage::Finished { id, outcome }) => (id, outcome),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => (
                worker.id,
                Err(ClientError::Transport(
                    "Analysis worker stopped unexpectedly".to_string(),
                )),
            ),
        };

        self.worker = None;
        self.dashboard.complete_submit(id, outcome);
    }

    fn reset(&mut self) {
        self.worker = None;
        self.dashboard.reset();
        self.results_panel.clear();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_enabled_ui(!self.dashboard.is_in_flight(), |ui| {
                    if ui.button("Open").clicked() {
                        self.open_dialog(FileDialogAction::OpenNetwork);
                    }
                    if ui.button("Load Preset").clicked() {
                        self.open_dialog(FileDialogAction::LoadPreset);
                    }
                });
                if ui.button("Save Preset").clicked() {
                    self.open_dialog(FileDialogAction::SavePreset);
                }

                ui.separator();

                if ui
                    .add_enabled(
                        self.dashboard.uploaded_file().is_some(),
                        egui::Button::new("Upload Different File"),
                    )
                    .clicked()
                {
                    self.reset();
                }
            });
        });

        if let Some(notice) = self.dashboard.error().cloned() {
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, notice.to_string());
                    if ui.small_button("Dismiss").clicked() {
                        self.dashboard.dismiss_error();
                    }
                });
            });
        }

        if let Some(message) = self.status_message.clone() {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(message);
                    if ui.small_button("✕").clicked() {
                        self.status_message = None;
                    }
                });
            });
        }

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            match self.file_dialog_action.take() {
                Some(FileDialogAction::OpenNetwork) => self.open_network(path.to_path_buf()),
                Some(FileDialogAction::LoadPreset) => self.load_preset_from(path.to_path_buf()),
                Some(FileDialogAction::SavePreset) => self.save_preset_to(path.to_path_buf()),
                Some(FileDialogAction::SaveCsv) => self.save_csv_to(path.to_path_buf()),
                None => {}
            }
        }

        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let mut run_clicked = false;

        egui::SidePanel::left("setup")
            .default_width(320.0)
            .show(ctx, |ui| {
                let in_flight = self.dashboard.is_in_flight();
                if let Some(UploadAction::OpenPicker) = self.upload_view.show(
                    ui,
                    self.dashboard.uploaded_file(),
                    hovering,
                    !in_flight,
                ) {
                    self.open_dialog(FileDialogAction::OpenNetwork);
                }

                ui.add_space(12.0);

                let can_submit = self.dashboard.can_submit();
                if let Some(config) =
                    self.config_view
                        .show(ui, self.dashboard.config_holder(), can_submit)
                {
                    self.dashboard.replace_config(config);
                }

                ui.add_space(12.0);
                ui.add_enabled_ui(can_submit, |ui| {
                    let label = if in_flight { "Analyzing..." } else { "Run Analysis" };
                    if ui.button(label).clicked() {
                        run_clicked = true;
                    }
                });
            });

        if run_clicked {
            self.start_analysis(ctx);
        }

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.results_panel
                    .show(ui, ResultsView::of(&self.dashboard))
            })
            .inner;

        if let Some(ResultsAction::SaveCsv) = action {
            self.open_dialog(FileDialogAction::SaveCsv);
        }
    }
}
