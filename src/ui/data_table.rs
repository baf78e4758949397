use crate::app::DashApp;
use crate::constants::layout::{TABLE_HEADER_HEIGHT, TABLE_ROW_HEIGHT};
use eframe::egui;
use egui_extras::{Column, TableBuilder};

/// Tab-separated rows with a header line, as pasted into spreadsheets
pub fn table_tsv(value_header: &str, rows: &[(String, String)]) -> String {
    let mut output = format!("Label\t{}\n", value_header);
    for (label, value) in rows {
        output.push_str(label);
        output.push('\t');
        output.push_str(value);
        output.push('\n');
    }
    output
}

/// Render the aggregated rows of the active chart
pub fn render_data_table_panel(app: &mut DashApp, ui: &mut egui::Ui) {
    profiling::scope!("render_data_table");

    let Some(view) = app.controller.active_view() else {
        ui.weak("No chart selected");
        return;
    };
    let value_header = app
        .controller
        .active_config()
        .map(|c| c.metric_label.clone())
        .unwrap_or_default();
    let rows = &view.scene().table;

    let mut copy = false;
    ui.horizontal(|ui| {
        ui.strong("Data");
        ui.label(format!("{} rows", rows.len()));
        if ui
            .add_enabled(!rows.is_empty(), egui::Button::new("Copy").small())
            .on_hover_text("Copy rows as tab-separated text")
            .clicked()
        {
            copy = true;
        }
    });
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().clip(true))
        .column(Column::auto().at_least(80.0))
        .header(TABLE_HEADER_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("Label");
            });
            header.col(|ui| {
                ui.strong(&value_header);
            });
        })
        .body(|body| {
            body.rows(TABLE_ROW_HEIGHT, rows.len(), |mut row| {
                let Some((label, value)) = rows.get(row.index()) else {
                    return;
                };
                row.col(|ui| {
                    ui.label(label);
                });
                row.col(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.monospace(value);
                    });
                });
            });
        });

    if copy {
        app.copy_table();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_tsv() {
        let rows = vec![
            ("VIC".to_string(), "10".to_string()),
            ("NSW".to_string(), "8".to_string()),
        ];
        assert_eq!(table_tsv("Offences", &rows), "Label\tOffences\nVIC\t10\nNSW\t8\n");
        assert_eq!(table_tsv("Fines", &[]), "Label\tFines\n");
    }
}
