use std::collections::BTreeMap;

use super::filter::{filtered_indices, FilterSet};
use super::model::{
    age_rank, LongTable, AGE_COLUMN, AGE_TOTAL, REGION_COLUMN, SCENARIO_COLUMN,
};

/// Preview table row cap.
pub const PREVIEW_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// Render pass output
// ---------------------------------------------------------------------------

/// Headline figures for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dataset_label: String,
    pub year: i32,
    /// Sum of the `계` rows of the filtered view; `None` when the view is
    /// empty or contributes nothing positive.
    pub total_population: Option<f64>,
}

/// One sex series of the age pyramid: (band rank, population) pairs ordered
/// by the canonical band list.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSeries {
    pub sex: String,
    pub bars: Vec<(usize, f64)>,
}

/// One scenario series of the regional comparison: (region index,
/// population) pairs against the `regions` axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    /// `None` when the dataset has no scenario dimension.
    pub scenario: Option<String>,
    pub values: Vec<(usize, f64)>,
}

/// Chart configuration derived from which dimensions the dataset carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    AgePyramid { series: Vec<PyramidSeries> },
    RegionalComparison {
        regions: Vec<String>,
        series: Vec<RegionSeries>,
    },
}

/// Result of one render pass, ready for any binding layer to draw.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub summary: Summary,
    /// `None` when the view is empty or the dataset has neither a sex nor a
    /// region dimension.
    pub chart: Option<ChartSpec>,
    /// Row indices of the preview table, capped at [`PREVIEW_ROWS`].
    pub preview: Vec<usize>,
    /// Total matched rows before the preview cap.
    pub matched: usize,
}

// ---------------------------------------------------------------------------
// Render pass
// ---------------------------------------------------------------------------

/// Run the whole pipeline for one interaction: filter, summarise, pick and
/// configure the chart, cap the table preview. Pure; recomputed on every
/// widget change and discarded after drawing.
pub fn render_pass(
    table: &LongTable,
    dataset_label: &str,
    filters: &FilterSet,
    year: i32,
) -> RenderOutput {
    let indices = filtered_indices(table, filters, year);

    let (total, chart) = if indices.is_empty() {
        (None, None)
    } else {
        (
            total_population(table, &indices),
            select_chart(table, &indices),
        )
    };

    RenderOutput {
        summary: Summary {
            dataset_label: dataset_label.to_string(),
            year,
            total_population: total,
        },
        chart,
        preview: indices.iter().copied().take(PREVIEW_ROWS).collect(),
        matched: indices.len(),
    }
}

/// Sum of the aggregate (`계`) rows, finite values only. Only strictly
/// positive totals are reported.
fn total_population(table: &LongTable, indices: &[usize]) -> Option<f64> {
    if !table.has_column(AGE_COLUMN) {
        return None;
    }
    let sum: f64 = indices
        .iter()
        .map(|&i| &table.records[i])
        .filter(|r| r.dim(AGE_COLUMN) == AGE_TOTAL)
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .sum();
    (sum > 0.0).then_some(sum)
}

/// Pick the chart variant from the dimensions present: a sex column means an
/// age pyramid, otherwise a region column means a regional comparison,
/// otherwise table only.
fn select_chart(table: &LongTable, indices: &[usize]) -> Option<ChartSpec> {
    if let Some(sex_col) = table.sex_column() {
        Some(age_pyramid(table, indices, sex_col))
    } else if table.has_column(REGION_COLUMN) {
        Some(regional_comparison(table, indices))
    } else {
        None
    }
}

/// Age pyramid: one series per sex value, `계` rows and labels outside the
/// canonical band list excluded, bars ordered by band rank.
fn age_pyramid(table: &LongTable, indices: &[usize], sex_col: &str) -> ChartSpec {
    let mut by_sex: BTreeMap<&str, BTreeMap<usize, f64>> = BTreeMap::new();

    for &i in indices {
        let rec = &table.records[i];
        let age = rec.dim(AGE_COLUMN);
        if age == AGE_TOTAL {
            continue;
        }
        let Some(rank) = age_rank(age) else {
            continue;
        };
        if !rec.value.is_finite() {
            continue;
        }
        *by_sex
            .entry(rec.dim(sex_col))
            .or_default()
            .entry(rank)
            .or_insert(0.0) += rec.value;
    }

    // Series in the order the sex values appear in the dataset.
    let sex_order = table
        .unique_values
        .get(sex_col)
        .cloned()
        .unwrap_or_default();

    let series = sex_order
        .iter()
        .filter_map(|sex| {
            let bars = by_sex.remove(sex.as_str())?;
            Some(PyramidSeries {
                sex: sex.clone(),
                bars: bars.into_iter().collect(),
            })
        })
        .collect();

    ChartSpec::AgePyramid { series }
}

/// Regional comparison: bars per region, one series per scenario value when
/// the dataset has a scenario dimension, a single unnamed series otherwise.
fn regional_comparison(table: &LongTable, indices: &[usize]) -> ChartSpec {
    let has_scenario = table.has_column(SCENARIO_COLUMN);

    // Region axis: appearance order, restricted to regions in the view.
    let mut regions: Vec<String> = Vec::new();
    for &i in indices {
        let region = table.records[i].dim(REGION_COLUMN);
        if !region.is_empty() && !regions.iter().any(|r| r == region) {
            regions.push(region.to_string());
        }
    }

    let mut by_series: BTreeMap<Option<String>, BTreeMap<usize, f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &table.records[i];
        let Some(region_idx) = regions.iter().position(|r| r == rec.dim(REGION_COLUMN))
        else {
            continue;
        };
        if !rec.value.is_finite() {
            continue;
        }
        let key = has_scenario.then(|| rec.dim(SCENARIO_COLUMN).to_string());
        *by_series
            .entry(key)
            .or_default()
            .entry(region_idx)
            .or_insert(0.0) += rec.value;
    }

    let series = by_series
        .into_iter()
        .map(|(scenario, values)| RegionSeries {
            scenario,
            values: values.into_iter().collect(),
        })
        .collect();

    ChartSpec::RegionalComparison { regions, series }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Format a population count with thousands separators, rounded to a whole
/// number. NaN renders as an empty string (unparseable source cell).
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::super::loader::melt_reader;
    use super::*;

    const NATIONAL: &str = "\
가정별,성별,연령,2020,2021
중위,남자,계,100,101
중위,남자,0 0 4세,10,11
중위,남자,100세 이상,1,2
중위,남자,15세,5,5
중위,여자,계,110,111
중위,여자,0 0 4세,9,10
";

    const PROVINCIAL: &str = "\
시나리오별,지역,연령,2020,2021
중위,서울특별시,계,900,901
중위,부산광역시,계,300,301
저위,서울특별시,계,890,891
저위,부산광역시,계,290,291
";

    fn national() -> LongTable {
        let ids: Vec<String> = ["가정별", "성별", "연령"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        melt_reader(NATIONAL.as_bytes(), &ids).unwrap()
    }

    fn provincial() -> LongTable {
        let ids: Vec<String> = ["시나리오별", "지역", "연령"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        melt_reader(PROVINCIAL.as_bytes(), &ids).unwrap()
    }

    #[test]
    fn summary_totals_the_aggregate_rows() {
        let table = national();
        let out = render_pass(&table, "전국", &FilterSet::new(), 2021);
        assert_eq!(out.summary.dataset_label, "전국");
        assert_eq!(out.summary.year, 2021);
        assert_eq!(out.summary.total_population, Some(101.0 + 111.0));
        assert_eq!(out.matched, 6);
    }

    #[test]
    fn empty_view_skips_total_and_chart() {
        let table = national();
        let out = render_pass(&table, "전국", &FilterSet::new(), 1900);
        assert_eq!(out.matched, 0);
        assert!(out.preview.is_empty());
        assert!(out.chart.is_none());
        assert_eq!(out.summary.total_population, None);
    }

    #[test]
    fn sex_column_selects_the_age_pyramid() {
        let table = national();
        let out = render_pass(&table, "전국", &FilterSet::new(), 2020);
        let Some(ChartSpec::AgePyramid { series }) = out.chart else {
            panic!("expected age pyramid");
        };

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].sex, "남자");
        // 계 and the non-canonical "15세" label are excluded; bands are in
        // canonical order.
        assert_eq!(series[0].bars, vec![(0, 10.0), (20, 1.0)]);
        assert_eq!(series[1].sex, "여자");
        assert_eq!(series[1].bars, vec![(0, 9.0)]);
    }

    #[test]
    fn region_without_sex_selects_the_regional_comparison() {
        let table = provincial();
        let out = render_pass(&table, "시도", &FilterSet::new(), 2020);
        let Some(ChartSpec::RegionalComparison { regions, series }) = out.chart else {
            panic!("expected regional comparison");
        };

        assert_eq!(regions, vec!["서울특별시", "부산광역시"]);
        assert_eq!(series.len(), 2);
        let scenarios: Vec<Option<String>> =
            series.iter().map(|s| s.scenario.clone()).collect();
        assert!(scenarios.contains(&Some("저위".to_string())));
        assert!(scenarios.contains(&Some("중위".to_string())));

        let medium = series
            .iter()
            .find(|s| s.scenario.as_deref() == Some("중위"))
            .unwrap();
        assert_eq!(medium.values, vec![(0, 900.0), (1, 300.0)]);
    }

    #[test]
    fn no_sex_and_no_region_means_no_chart() {
        let input = "연령,2020\n계,10\n0 0 4세,4\n";
        let table = melt_reader(input.as_bytes(), &["연령".to_string()]).unwrap();
        let out = render_pass(&table, "x", &FilterSet::new(), 2020);
        assert!(out.chart.is_none());
        assert!(out.matched > 0);
    }

    #[test]
    fn preview_is_capped_at_200_rows() {
        let mut wide = String::from("구분,2020\n");
        for i in 0..250 {
            wide.push_str(&format!("항목{i},1\n"));
        }
        let table = melt_reader(wide.as_bytes(), &["구분".to_string()]).unwrap();
        let out = render_pass(&table, "x", &FilterSet::new(), 2020);
        assert_eq!(out.matched, 250);
        assert_eq!(out.preview.len(), PREVIEW_ROWS);
    }

    #[test]
    fn pyramid_ignores_nan_values() {
        let input = "성별,연령,2020\n남자,0 0 4세,abc\n남자,5 0 9세,7\n";
        let ids: Vec<String> = ["성별", "연령"].iter().map(|s| s.to_string()).collect();
        let table = melt_reader(input.as_bytes(), &ids).unwrap();
        let out = render_pass(&table, "x", &FilterSet::new(), 2020);
        let Some(ChartSpec::AgePyramid { series }) = out.chart else {
            panic!("expected age pyramid");
        };
        assert_eq!(series[0].bars, vec![(1, 7.0)]);
    }

    #[test]
    fn format_count_groups_digits() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(51_638_809.4), "51,638,809");
        assert_eq!(format_count(-1234.0), "-1,234");
        assert_eq!(format_count(f64::NAN), "");
    }
}
