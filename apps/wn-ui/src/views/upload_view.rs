use wn_core::{INP_EXTENSION, UploadedFile};

pub enum UploadAction {
    OpenPicker,
}

#[derive(Default)]
pub struct UploadView;

impl UploadView {
    /// Drop zone plus picker button. `hovering` is true while files are
    /// dragged over the window.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        file: Option<&UploadedFile>,
        hovering: bool,
        enabled: bool,
    ) -> Option<UploadAction> {
        let mut action = None;

        ui.heading("Network File");

        let (stroke_color, fill) = if hovering && enabled {
            (
                egui::Color32::from_rgb(59, 130, 246),
                egui::Color32::from_rgba_unmultiplied(59, 130, 246, 24),
            )
        } else {
            (ui.visuals().widgets.noninteractive.bg_stroke.color, egui::Color32::TRANSPARENT)
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .fill(fill)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    match file {
                        Some(file) => {
                            ui.label(egui::RichText::new(file.filename()).strong());
                            ui.label(format!(
                                "{} bytes, {} lines",
                                file.len(),
                                file.content().lines().count()
                            ));
                        }
                        None if hovering => {
                            ui.label("Release to load the network file");
                        }
                        None => {
                            ui.label(format!("Drop an EPANET {} file here", INP_EXTENSION));
                            ui.label("or");
                        }
                    }

                    ui.add_enabled_ui(enabled, |ui| {
                        let label = if file.is_some() {
                            "Choose Another File"
                        } else {
                            "Browse Files"
                        };
                        if ui.button(label).clicked() {
                            action = Some(UploadAction::OpenPicker);
                        }
                    });
                });
            });

        action
    }
}
