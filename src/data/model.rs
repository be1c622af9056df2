use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Column-name contract of the cleaned KOSIS exports
// ---------------------------------------------------------------------------

/// Name of the year column produced by the reshape step.
pub const YEAR_COLUMN: &str = "년도";
/// Name of the value column produced by the reshape step.
pub const VALUE_COLUMN: &str = "값";

/// The age dimension, where present.
pub const AGE_COLUMN: &str = "연령";
/// Aggregate marker in the age dimension ("all ages").
pub const AGE_TOTAL: &str = "계";
/// The sex dimension appears under either of these headers depending on the
/// export.
pub const SEX_COLUMNS: [&str; 2] = ["성별", "성"];
/// The region dimension (province-level exports).
pub const REGION_COLUMN: &str = "지역";
/// The projection-scenario dimension (province-level exports).
pub const SCENARIO_COLUMN: &str = "시나리오별";

/// Dimensions rendered as a single-choice selector; everything else gets a
/// multi-select, guarded by [`MULTI_CHOICE_LIMIT`].
pub const SINGLE_CHOICE_COLUMNS: [&str; 3] = ["가정별", "시나리오별", "지역"];
/// Multi-select widgets are only offered for dimensions with fewer distinct
/// values than this.
pub const MULTI_CHOICE_LIMIT: usize = 50;

/// Canonical ordering of the five-year age bands, as spelled in the cleaned
/// exports. The space-separated digits are how the upstream cleaning step
/// writes "0–4세" etc.; the exact spelling is a data contract, not ours to
/// normalise.
pub const AGE_ORDER: [&str; 21] = [
    "0 0 4세", "5 0 9세", "10 0 14세", "15 0 19세",
    "20 0 24세", "25 0 29세", "30 0 34세", "35 0 39세",
    "40 0 44세", "45 0 49세", "50 0 54세", "55 0 59세",
    "60 0 64세", "65 0 69세", "70 0 74세", "75 0 79세",
    "80 0 84세", "85 0 89세", "90 0 94세", "95 0 99세", "100세 이상",
];

/// Position of an age-band label in [`AGE_ORDER`], or `None` for labels
/// outside the canonical list (including the `계` aggregate).
pub fn age_rank(label: &str) -> Option<usize> {
    AGE_ORDER.iter().position(|a| *a == label)
}

/// Whether a dimension is rendered as a single-choice selector.
pub fn is_single_choice(column: &str) -> bool {
    SINGLE_CHOICE_COLUMNS.iter().any(|c| *c == column)
}

// ---------------------------------------------------------------------------
// LongRecord – one row of the reshaped table
// ---------------------------------------------------------------------------

/// One melted row: the identifying-dimension values of the source row, plus
/// the year taken from the source column header and the population count from
/// the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    /// Identifying dimensions: column name → categorical value.
    pub dims: BTreeMap<String, String>,
    /// Year, parsed from the wide column header.
    pub year: i32,
    /// Population count. NaN when the source cell was not numeric; such rows
    /// are kept (only year failures drop rows) but excluded from totals.
    pub value: f64,
}

impl LongRecord {
    /// Value of an identifying dimension, empty string if absent.
    pub fn dim(&self, column: &str) -> &str {
        self.dims.get(column).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// LongTable – the complete reshaped dataset
// ---------------------------------------------------------------------------

/// The reshaped dataset with pre-computed per-column indices.
#[derive(Debug, Clone)]
pub struct LongTable {
    /// All melted rows.
    pub records: Vec<LongRecord>,
    /// Identifying columns, in the order given by the dataset descriptor.
    pub dim_columns: Vec<String>,
    /// For each identifying column, its distinct non-empty values in
    /// first-appearance order (the order the UI lists options in).
    pub unique_values: BTreeMap<String, Vec<String>>,
    /// Distinct years, ascending.
    pub years: Vec<i32>,
}

impl LongTable {
    /// Build column indices from melted records.
    pub fn from_records(records: Vec<LongRecord>, dim_columns: Vec<String>) -> Self {
        let mut unique_values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();

        for col in &dim_columns {
            unique_values.insert(col.clone(), Vec::new());
            seen.insert(col.clone(), BTreeSet::new());
        }

        for rec in &records {
            years.insert(rec.year);
            for col in &dim_columns {
                let val = rec.dim(col);
                if val.is_empty() {
                    continue;
                }
                let seen_col = seen.get_mut(col).unwrap();
                if seen_col.insert(val.to_string()) {
                    unique_values.get_mut(col).unwrap().push(val.to_string());
                }
            }
        }

        LongTable {
            records,
            dim_columns,
            unique_values,
            years: years.into_iter().collect(),
        }
    }

    /// Number of melted rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed (min, max) year, `None` for an empty table.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.years.first(), self.years.last()) {
            (Some(&min), Some(&max)) => Some((min, max)),
            _ => None,
        }
    }

    /// The sex column of this dataset, if it has one.
    pub fn sex_column(&self) -> Option<&str> {
        SEX_COLUMNS.iter().copied().find(|c| self.has_column(c))
    }

    /// Whether `name` is one of the identifying columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.dim_columns.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dims: &[(&str, &str)], year: i32, value: f64) -> LongRecord {
        LongRecord {
            dims: dims
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            year,
            value,
        }
    }

    #[test]
    fn unique_values_keep_first_appearance_order() {
        let records = vec![
            record(&[("지역", "서울특별시")], 2021, 1.0),
            record(&[("지역", "부산광역시")], 2021, 2.0),
            record(&[("지역", "서울특별시")], 2022, 3.0),
            record(&[("지역", "강원도")], 2021, 4.0),
        ];
        let table = LongTable::from_records(records, vec!["지역".to_string()]);
        assert_eq!(
            table.unique_values["지역"],
            vec!["서울특별시", "부산광역시", "강원도"]
        );
    }

    #[test]
    fn empty_cells_are_not_offered_as_values() {
        let records = vec![
            record(&[("성별", "남자")], 2021, 1.0),
            record(&[("성별", "")], 2021, 2.0),
        ];
        let table = LongTable::from_records(records, vec!["성별".to_string()]);
        assert_eq!(table.unique_values["성별"], vec!["남자"]);
    }

    #[test]
    fn year_range_spans_observed_years() {
        let records = vec![
            record(&[("연령", "계")], 2022, 1.0),
            record(&[("연령", "계")], 2020, 1.0),
            record(&[("연령", "계")], 2021, 1.0),
        ];
        let table = LongTable::from_records(records, vec!["연령".to_string()]);
        assert_eq!(table.year_range(), Some((2020, 2022)));
        assert_eq!(table.years, vec![2020, 2021, 2022]);
        assert!(LongTable::from_records(vec![], vec![]).year_range().is_none());
    }

    #[test]
    fn sex_column_matches_either_header_variant() {
        let with_long = LongTable::from_records(vec![], vec!["성별".to_string()]);
        assert_eq!(with_long.sex_column(), Some("성별"));
        let with_short = LongTable::from_records(vec![], vec!["성".to_string()]);
        assert_eq!(with_short.sex_column(), Some("성"));
        let without = LongTable::from_records(vec![], vec!["지역".to_string()]);
        assert_eq!(without.sex_column(), None);
    }

    #[test]
    fn age_rank_follows_canonical_band_order() {
        assert_eq!(age_rank("0 0 4세"), Some(0));
        assert_eq!(age_rank("100세 이상"), Some(20));
        assert!(age_rank("계").is_none());
        assert!(age_rank("15세").is_none());
    }
}
