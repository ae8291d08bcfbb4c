use wn_app::{ConfigField, ConfigHolder};
use wn_core::AnalysisConfig;

/// Analysis parameter form.
///
/// Keeps the raw text of each input so partially typed numbers survive
/// between frames; every edit produces a complete replacement config.
#[derive(Default)]
pub struct ConfigView {
    texts: Vec<String>,
}

impl ConfigView {
    pub fn new(config: &AnalysisConfig) -> Self {
        let mut view = Self::default();
        view.sync(config);
        view
    }

    /// Reload the input texts after the config was replaced from outside
    /// the form (for example a loaded preset).
    pub fn sync(&mut self, config: &AnalysisConfig) {
        self.texts = ConfigField::ALL
            .iter()
            .map(|field| field.text(config))
            .collect();
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        holder: &ConfigHolder,
        enabled: bool,
    ) -> Option<AnalysisConfig> {
        if self.texts.len() != ConfigField::ALL.len() {
            self.sync(holder.current());
        }

        let mut edited: Option<ConfigHolder> = None;

        ui.heading("Configuration");
        ui.add_enabled_ui(enabled, |ui| {
            egui::Grid::new("analysis_config")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for (field, text) in ConfigField::ALL.iter().zip(self.texts.iter_mut()) {
                        ui.label(field.label());
                        let response = ui.add(
                            egui::TextEdit::singleline(text).desired_width(140.0),
                        );
                        let response = match (field.minimum(), field.step()) {
                            (Some(min), Some(step)) => {
                                response.on_hover_text(format!("Minimum {}, step {}", min, step))
                            }
                            _ => response,
                        };
                        if response.changed() {
                            let base = edited.as_ref().unwrap_or(holder);
                            let next = base.with_field_text(*field, text);
                            edited = Some(ConfigHolder::new(next));
                        }
                        ui.end_row();
                    }
                });
        });

        edited.map(|holder| holder.current().clone())
    }
}
