use std::sync::Arc;

use egui_extras::{Column, TableBuilder};
use wn_app::{
    NODE_TABLE_HEADERS, NodeRow, Overlay, OverlayState, ReceivedResult, ResultsView, StatusStyle,
    decode_image, node_rows, summary_metrics,
};

pub enum ResultsAction {
    SaveCsv,
}

struct OverlayImage {
    uri: String,
    bytes: Result<Arc<[u8]>, String>,
}

impl OverlayImage {
    fn decode(uri: String, payload: &str) -> Self {
        let bytes = decode_image(payload)
            .map(Arc::from)
            .map_err(|e| e.to_string());
        Self { uri, bytes }
    }
}

#[derive(Default)]
pub struct ResultsPanel {
    overlay: OverlayState,
    image: Option<OverlayImage>,
}

impl ResultsPanel {
    pub fn clear(&mut self) {
        self.overlay.close();
        self.image = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: ResultsView<'_>) -> Option<ResultsAction> {
        match view {
            ResultsView::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.heading("No results yet");
                    ui.label("Upload a network file and run the analysis to see the impact of closing a pipe.");
                });
                None
            }
            ResultsView::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label("Running analysis...");
                });
                None
            }
            ResultsView::Ready(received) => {
                self.overlay.follow(received);
                let action = self.show_result(ui, received);
                self.show_overlay(ui.ctx(), received);
                action
            }
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui, received: &ReceivedResult) -> Option<ResultsAction> {
        let mut action = None;
        let result = &received.result;

        ui.horizontal(|ui| {
            ui.heading("Analysis Results");
            ui.separator();
            ui.label(format!(
                "{} | pipe {} | {}",
                received.filename,
                received.pipe_to_close,
                received.received_at.format("%H:%M:%S")
            ));
        });
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            for metric in summary_metrics(result) {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.small(metric.label);
                        ui.label(egui::RichText::new(&metric.value).size(18.0).strong());
                    });
                });
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for overlay in [Overlay::PressureMaps, Overlay::ImpactMap] {
                if ui.button(overlay.button_label()).clicked() {
                    self.overlay.open(overlay);
                }
            }
            if ui.button("Download CSV").clicked() {
                action = Some(ResultsAction::SaveCsv);
            }
        });

        ui.separator();
        ui.label(format!(
            "Top Impacted Nodes ({} of {})",
            result.top_impacted_nodes.len(),
            result.all_nodes.len()
        ));
        show_node_table(ui, &node_rows(&result.top_impacted_nodes));

        action
    }

    fn show_overlay(&mut self, ctx: &egui::Context, received: &ReceivedResult) {
        let Some(overlay) = self.overlay.current() else {
            return;
        };

        let screen = ctx.screen_rect();
        let backdrop_clicked = egui::Area::new(egui::Id::new("overlay_backdrop"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(160));
                response.clicked()
            })
            .inner;

        let uri = format!("bytes://{}-{}.png", overlay.file_stem(), received.submission);
        if self.image.as_ref().is_none_or(|image| image.uri != uri) {
            self.image = Some(OverlayImage::decode(uri, overlay.payload(&received.result)));
        }

        let mut close = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        egui::Area::new(egui::Id::new("overlay_content"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let max = screen.size() * 0.85;
                    ui.set_max_size(max);
                    ui.horizontal(|ui| {
                        ui.heading(overlay.title());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("✕").clicked() {
                                close = true;
                            }
                        });
                    });
                    ui.separator();

                    match self.image.as_ref().map(|image| (&image.uri, &image.bytes)) {
                        Some((uri, Ok(bytes))) => {
                            ui.add(
                                egui::Image::from_bytes(uri.clone(), bytes.clone())
                                    .max_size(max - egui::vec2(0.0, 48.0))
                                    .shrink_to_fit(),
                            );
                        }
                        Some((_, Err(message))) => {
                            ui.colored_label(
                                egui::Color32::RED,
                                format!("Image unavailable: {}", message),
                            );
                        }
                        None => {}
                    }
                });
            });

        if close {
            self.overlay.close();
        } else if backdrop_clicked {
            self.overlay.backdrop_clicked();
        }
    }
}

fn status_color(style: StatusStyle) -> egui::Color32 {
    match style {
        StatusStyle::Ok => egui::Color32::from_rgb(22, 163, 74),
        StatusStyle::Warning => egui::Color32::from_rgb(202, 138, 4),
        StatusStyle::Severe => egui::Color32::from_rgb(234, 88, 12),
        StatusStyle::Critical => egui::Color32::from_rgb(220, 38, 38),
    }
}

fn show_node_table(ui: &mut egui::Ui, rows: &[NodeRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(140.0).at_least(80.0))
        .column(Column::initial(130.0).at_least(90.0))
        .column(Column::initial(100.0).at_least(70.0))
        .column(Column::remainder().at_least(120.0))
        .header(22.0, |mut header| {
            for title in NODE_TABLE_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(24.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.node_id);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.pressure_closed);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.drop);
                    });
                    table_row.col(|ui| {
                        ui.label(
                            egui::RichText::new(format!(" {} ", row.status))
                                .color(egui::Color32::WHITE)
                                .background_color(status_color(row.style)),
                        );
                    });
                });
            }
        });
}
