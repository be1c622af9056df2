use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::options_for;
use crate::data::model::{is_single_choice, MULTI_CHOICE_LIMIT};
use crate::data::view::format_count;
use crate::state::AppState;
use crate::ui::{plot, table};

const EXPLAINER: &str = "\
추계인구는 인구총조사 결과를 바탕으로 출생, 사망, 국제 이동 등 인구 변동 요인을 \
반영하여 현재 시점의 인구를 추정한 값입니다. 실제 인구를 조사하는 것이 아니라 \
통계적 추정을 통해 인구 변화를 파악하는 방법입니다.

추계는 중위·고위·저위의 세 가지 시나리오로 나뉘며, 각각의 시나리오는 인구 변동 \
요인(출생률, 사망률, 이동률)의 미래 수준을 다르게 가정합니다.

  • 중위 시나리오: 인구가 중간 수준으로 변동한다고 가정
  • 고위 시나리오: 인구가 가장 많이 증가하는 경우
  • 저위 시나리오: 인구가 가장 적게 증가하는 경우";

// ---------------------------------------------------------------------------
// Left side panel – dataset, year, dimension filters
// ---------------------------------------------------------------------------

/// Render the settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("설정");
    ui.separator();

    // ---- Dataset selector ----
    ui.strong("데이터셋 선택");
    let labels: Vec<String> = state.registry.iter().map(|d| d.label.clone()).collect();
    let mut switch_to = None;
    egui::ComboBox::from_id_salt("dataset_select")
        .width(ui.available_width() - 16.0)
        .selected_text(state.dataset_label().to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for (i, label) in labels.iter().enumerate() {
                if ui
                    .selectable_label(state.selected_dataset == i, label)
                    .clicked()
                {
                    switch_to = Some(i);
                }
            }
        });
    if let Some(i) = switch_to {
        if i != state.selected_dataset {
            state.select_dataset(i);
        }
    }

    let Some(dataset) = state.table.clone() else {
        ui.separator();
        ui.label("데이터를 불러오지 못했습니다.");
        return;
    };

    // ---- Year slider ----
    ui.separator();
    ui.strong("연도 선택");
    if let Some((min_year, max_year)) = dataset.year_range() {
        ui.add(egui::Slider::new(&mut state.selected_year, min_year..=max_year).text("연도"));
    }
    ui.separator();

    // ---- Per-dimension filter widgets ----
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in dataset.dim_columns.clone() {
                let options = options_for(&dataset, &col);
                if options.is_empty() {
                    continue;
                }
                if is_single_choice(&col) {
                    single_choice_widget(ui, state, &col, &options);
                } else if options.len() < MULTI_CHOICE_LIMIT {
                    multi_choice_widget(ui, state, &col, &options);
                }
                // Dimensions at or above the cardinality guard get no widget
                // and stay unconstrained.
            }
        });

    // Re-run the pipeline after any widget changes.
    state.rerender();
}

fn single_choice_widget(ui: &mut Ui, state: &mut AppState, col: &str, options: &[String]) {
    let current = state
        .filters
        .get(col)
        .and_then(|v| v.first())
        .cloned()
        .unwrap_or_default();

    ui.strong(format!("{col} 선택"));
    egui::ComboBox::from_id_salt(col)
        .width(ui.available_width() - 16.0)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                if ui.selectable_label(current == *opt, opt).clicked() {
                    state.set_single_choice(col, opt.clone());
                }
            }
        });
    ui.add_space(4.0);
}

fn multi_choice_widget(ui: &mut Ui, state: &mut AppState, col: &str, options: &[String]) {
    let n_selected = state.filters.get(col).map(|v| v.len()).unwrap_or(0);
    let header_text = format!("{col} 선택  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(col)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(col, options);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(col);
                }
            });

            for opt in options {
                let mut checked = state
                    .filters
                    .get(col)
                    .map_or(false, |v| v.iter().any(|x| x == opt));
                if ui.checkbox(&mut checked, opt).changed() {
                    state.toggle_filter_value(col, opt);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_dir_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(dataset), Some(output)) = (&state.table, &state.output) {
            ui.label(format!(
                "{} rows loaded, {} matched",
                dataset.len(),
                output.matched
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – summary, chart, preview table
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("대한민국 추계인구 대시보드");
            egui::CollapsingHeader::new("추계인구란 (더보기)")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(EXPLAINER);
                });
            ui.separator();

            let Some(output) = &state.output else {
                ui.add_space(24.0);
                ui.label("File → Open data folder… 로 데이터 폴더를 선택하세요.");
                return;
            };

            // ---- Summary line ----
            let summary = &output.summary;
            let mut line = format!(
                "데이터셋: {} ｜ 연도: {}",
                summary.dataset_label, summary.year
            );
            if let Some(total) = summary.total_population {
                line.push_str(&format!(" ｜ 총인구: {}명", format_count(total)));
            }
            ui.label(RichText::new(line).strong());

            if output.matched == 0 {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("선택한 조건에 해당하는 데이터가 없습니다.")
                        .color(Color32::from_rgb(0xb5, 0x80, 0x00)),
                );
                return;
            }

            // ---- Chart ----
            if let Some(chart) = &output.chart {
                ui.add_space(8.0);
                plot::chart(ui, chart, summary.year, &summary.dataset_label);
            }

            // ---- Preview table ----
            ui.separator();
            ui.strong("데이터");
            table::preview(ui, state);

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                ui.label("데이터 출처:");
                ui.hyperlink_to("KOSIS 국가통계포털", "https://kosis.kr/index/index.do");
            });
        });
}

// ---------------------------------------------------------------------------
// Directory dialog
// ---------------------------------------------------------------------------

pub fn open_data_dir_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Select data folder")
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("data directory set to {}", dir.display());
        state.set_data_dir(dir);
    }
}
