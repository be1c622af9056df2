use std::collections::BTreeMap;

use super::model::{
    is_single_choice, LongTable, AGE_COLUMN, AGE_TOTAL, MULTI_CHOICE_LIMIT,
};

// ---------------------------------------------------------------------------
// Filter set: allowed values per identifying column
// ---------------------------------------------------------------------------

/// Per-column selection state: column name → allowed values, in selection
/// order. A missing column or an empty list means "no constraint".
pub type FilterSet = BTreeMap<String, Vec<String>>;

/// Values a column's widget offers. The `계` aggregate is never offered for
/// the age dimension; it is re-included by the pipeline instead.
pub fn options_for(table: &LongTable, column: &str) -> Vec<String> {
    let Some(values) = table.unique_values.get(column) else {
        return Vec::new();
    };
    if column == AGE_COLUMN {
        values.iter().filter(|v| *v != AGE_TOTAL).cloned().collect()
    } else {
        values.clone()
    }
}

/// Initial [`FilterSet`] for a freshly loaded table, mirroring the widget
/// defaults: single-choice dimensions and small multi-choice dimensions start
/// on their first offered value; dimensions at or above the multi-select
/// cardinality guard get no widget and stay unconstrained.
pub fn default_filters(table: &LongTable) -> FilterSet {
    let mut filters = FilterSet::new();
    for col in &table.dim_columns {
        let options = options_for(table, col);
        let Some(first) = options.first() else {
            continue;
        };
        if is_single_choice(col) || options.len() < MULTI_CHOICE_LIMIT {
            filters.insert(col.clone(), vec![first.clone()]);
        }
    }
    filters
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Indices of records passing every column filter and the year filter.
///
/// A record passes a column filter when the allowed list is empty (no
/// constraint) or contains its value. The age dimension additionally always
/// admits the `계` aggregate so the total row stays available for the
/// population summary, whatever bands are selected.
pub fn filtered_indices(table: &LongTable, filters: &FilterSet, year: i32) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if rec.year != year {
                return false;
            }
            for (col, allowed) in filters {
                if allowed.is_empty() {
                    continue;
                }
                let value = rec.dim(col);
                if col == AGE_COLUMN && value == AGE_TOTAL {
                    continue;
                }
                if !allowed.iter().any(|a| a == value) {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::loader::melt_reader;
    use super::*;

    const WIDE: &str = "\
가정별,성별,연령,2020,2021,2022
중위,남자,계,100,101,102
중위,남자,0 0 4세,10,11,12
중위,남자,5 0 9세,20,21,22
중위,여자,계,110,111,112
중위,여자,0 0 4세,9,10,11
저위,남자,계,90,91,92
";

    fn table() -> LongTable {
        let id_columns: Vec<String> = ["가정별", "성별", "연령"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        melt_reader(WIDE.as_bytes(), &id_columns).unwrap()
    }

    fn allow(pairs: &[(&str, &[&str])]) -> FilterSet {
        pairs
            .iter()
            .map(|(col, vals)| {
                (
                    col.to_string(),
                    vals.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_filter_set_at_max_year_is_the_year_slice() {
        let table = table();
        let (_, max_year) = table.year_range().unwrap();
        let indices = filtered_indices(&table, &FilterSet::new(), max_year);

        let expected: Vec<usize> = table
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.year == max_year)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(indices, expected);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn age_filter_implicitly_keeps_the_total_row() {
        let table = table();
        let filters = allow(&[
            ("가정별", &["중위"]),
            ("성별", &["남자"]),
            ("연령", &["0 0 4세"]),
        ]);
        let indices = filtered_indices(&table, &filters, 2021);

        let ages: Vec<&str> = indices
            .iter()
            .map(|&i| table.records[i].dim("연령"))
            .collect();
        assert!(ages.contains(&"계"));
        assert!(ages.contains(&"0 0 4세"));
        assert!(!ages.contains(&"5 0 9세"));
    }

    #[test]
    fn medium_male_2021_returns_each_age_plus_the_total() {
        let table = table();
        let filters = allow(&[("가정별", &["중위"]), ("성별", &["남자"])]);
        let indices = filtered_indices(&table, &filters, 2021);

        // Two specific age bands for this slice, plus the 계 row.
        assert_eq!(indices.len(), 3);
        for &i in &indices {
            let rec = &table.records[i];
            assert_eq!(rec.dim("가정별"), "중위");
            assert_eq!(rec.dim("성별"), "남자");
            assert_eq!(rec.year, 2021);
        }
    }

    #[test]
    fn year_outside_the_observed_range_yields_empty_not_error() {
        let table = table();
        assert!(filtered_indices(&table, &FilterSet::new(), 1999).is_empty());
        assert!(filtered_indices(&table, &FilterSet::new(), 2100).is_empty());
    }

    #[test]
    fn empty_allowed_list_is_no_constraint() {
        let table = table();
        let filters = allow(&[("가정별", &[])]);
        let unconstrained = filtered_indices(&table, &FilterSet::new(), 2020);
        assert_eq!(filtered_indices(&table, &filters, 2020), unconstrained);
    }

    #[test]
    fn non_age_filters_do_not_gain_the_total_marker() {
        let table = table();
        let filters = allow(&[("가정별", &["고위"])]);
        assert!(filtered_indices(&table, &filters, 2020).is_empty());
    }

    #[test]
    fn options_hide_the_age_total() {
        let table = table();
        let ages = options_for(&table, "연령");
        assert_eq!(ages, vec!["0 0 4세", "5 0 9세"]);
        assert!(options_for(&table, "지역").is_empty());
    }

    #[test]
    fn default_filters_start_on_first_offered_value() {
        let table = table();
        let filters = default_filters(&table);
        assert_eq!(filters["가정별"], vec!["중위"]);
        assert_eq!(filters["성별"], vec!["남자"]);
        // 계 is first in the data but never offered for 연령.
        assert_eq!(filters["연령"], vec!["0 0 4세"]);
    }
}
