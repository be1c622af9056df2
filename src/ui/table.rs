use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{VALUE_COLUMN, YEAR_COLUMN};
use crate::data::view::format_count;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Preview table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered rows, capped upstream at the preview limit: one column
/// per identifying dimension, plus year and value.
pub fn preview(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(output)) = (&state.table, &state.output) else {
        return;
    };
    if output.preview.is_empty() {
        return;
    }

    let n_columns = dataset.dim_columns.len() + 2;

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(70.0), n_columns)
        .header(20.0, |mut header| {
            for col in &dataset.dim_columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
            header.col(|ui| {
                ui.strong(YEAR_COLUMN);
            });
            header.col(|ui| {
                ui.strong(VALUE_COLUMN);
            });
        })
        .body(|body| {
            body.rows(18.0, output.preview.len(), |mut row| {
                let rec = &dataset.records[output.preview[row.index()]];
                for col in &dataset.dim_columns {
                    row.col(|ui| {
                        ui.label(rec.dim(col));
                    });
                }
                row.col(|ui| {
                    ui.label(rec.year.to_string());
                });
                row.col(|ui| {
                    ui.label(format_count(rec.value));
                });
            });
        });

    if output.matched > output.preview.len() {
        ui.small(format!(
            "{}행 중 {}행 표시",
            output.matched,
            output.preview.len()
        ));
    }
}
