use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{sex_color, SeriesColors};
use crate::data::model::AGE_ORDER;
use crate::data::view::{ChartSpec, PyramidSeries, RegionSeries};

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

/// Draw the chart picked by the render pass.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, year: i32, dataset_label: &str) {
    match spec {
        ChartSpec::AgePyramid { series } => age_pyramid(ui, series, year, dataset_label),
        ChartSpec::RegionalComparison { regions, series } => {
            regional_comparison(ui, regions, series, year)
        }
    }
}

/// Horizontal stacked bars per sex, one row per canonical age band.
fn age_pyramid(ui: &mut Ui, series: &[PyramidSeries], year: i32, dataset_label: &str) {
    ui.strong(format!("{year}년 {dataset_label} 인구 그래프"));

    // Stack each sex series on the ones already placed.
    let mut charts: Vec<BarChart> = Vec::new();
    for s in series {
        let bars: Vec<Bar> = s
            .bars
            .iter()
            .map(|&(rank, value)| Bar::new(rank as f64, value).width(0.85))
            .collect();
        let mut bar_chart = BarChart::new(bars)
            .name(&s.sex)
            .color(sex_color(&s.sex))
            .horizontal();
        {
            let placed: Vec<&BarChart> = charts.iter().collect();
            bar_chart = bar_chart.stack_on(&placed);
        }
        charts.push(bar_chart);
    }

    Plot::new("age_pyramid")
        .legend(Legend::default())
        .height(440.0)
        .x_axis_label("인구수")
        .y_axis_label("연령")
        .y_axis_formatter(|mark, _range| age_band_label(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for bar_chart in charts {
                plot_ui.bar_chart(bar_chart);
            }
        });
}

/// Age-band label for a tick position; blank between categories.
fn age_band_label(value: f64) -> String {
    let rank = value.round();
    if rank < 0.0 || (value - rank).abs() > 0.25 {
        return String::new();
    }
    AGE_ORDER
        .get(rank as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Grouped vertical bars per region, one colour per scenario series.
fn regional_comparison(ui: &mut Ui, regions: &[String], series: &[RegionSeries], year: i32) {
    ui.strong(format!("{year}년 시도별 인구 현황"));

    let scenario_labels: Vec<String> = series
        .iter()
        .filter_map(|s| s.scenario.clone())
        .collect();
    let colors = SeriesColors::new(&scenario_labels);

    let n_series = series.len().max(1);
    let bar_width = 0.8 / n_series as f64;

    let mut charts: Vec<BarChart> = Vec::new();
    for (series_idx, s) in series.iter().enumerate() {
        let offset = (series_idx as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;
        let bars: Vec<Bar> = s
            .values
            .iter()
            .map(|&(region_idx, value)| {
                Bar::new(region_idx as f64 + offset, value).width(bar_width * 0.95)
            })
            .collect();
        let bar_chart = match &s.scenario {
            Some(name) => BarChart::new(bars).name(name).color(colors.color_for(name)),
            None => BarChart::new(bars).name("인구").color(Color32::LIGHT_BLUE),
        };
        charts.push(bar_chart);
    }

    let region_axis = regions.to_vec();
    Plot::new("regional_comparison")
        .legend(Legend::default())
        .height(380.0)
        .y_axis_label("인구수")
        .x_axis_formatter(move |mark, _range| region_label(&region_axis, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for bar_chart in charts {
                plot_ui.bar_chart(bar_chart);
            }
        });
}

/// Region label for a tick position; blank between categories.
fn region_label(regions: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 0.25 {
        return String::new();
    }
    regions.get(idx as usize).cloned().unwrap_or_default()
}
