use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use super::model::{LongRecord, LongTable};

// ---------------------------------------------------------------------------
// Reshape-and-clean: wide CSV → LongTable
// ---------------------------------------------------------------------------

/// Load a wide CSV and melt it into a [`LongTable`].
///
/// The file must be UTF-8 delimited text with a header row. Columns named in
/// `id_columns` are identifying dimensions; every other column is treated as
/// a year label. Each cell of a year column becomes one melted row. Year
/// labels that do not parse numerically are dropped together with their rows;
/// everything else about the file being unreadable or malformed is an error.
pub fn load_and_melt(path: &Path, id_columns: &[String]) -> Result<LongTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    melt_reader(file, id_columns).with_context(|| format!("reading {}", path.display()))
}

/// Melt a wide table read from any source. Entry point used by the tests.
pub fn melt_reader<R: io::Read>(reader: R, id_columns: &[String]) -> Result<LongTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut id_positions = Vec::with_capacity(id_columns.len());
    for col in id_columns {
        let pos = headers
            .iter()
            .position(|h| h == col)
            .with_context(|| format!("CSV missing identifying column '{col}'"))?;
        id_positions.push(pos);
    }

    // Every non-identifying column is a year label. A header that does not
    // coerce to a number silently drops that column's cells.
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !id_positions.contains(idx))
        .filter_map(|(idx, h)| parse_year(h).map(|y| (idx, y)))
        .collect();

    if id_positions.len() == headers.len() {
        bail!("CSV has no year columns, only identifying columns");
    }

    let mut records = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut dims = BTreeMap::new();
        for (col, &pos) in id_columns.iter().zip(&id_positions) {
            let cell = record.get(pos).unwrap_or("").trim();
            dims.insert(col.clone(), cell.to_string());
        }

        for &(pos, year) in &year_columns {
            let cell = record.get(pos).unwrap_or("");
            records.push(LongRecord {
                dims: dims.clone(),
                year,
                value: parse_count(cell),
            });
        }
    }

    Ok(LongTable::from_records(records, id_columns.to_vec()))
}

/// Numeric coercion of a year label. Accepts plain integers and the float
/// spellings some exports use ("2020.0").
fn parse_year(label: &str) -> Option<i32> {
    let label = label.trim();
    if let Ok(y) = label.parse::<i32>() {
        return Some(y);
    }
    match label.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i32),
        _ => None,
    }
}

/// Parse a population cell. Thousands separators are tolerated; anything that
/// still fails parses to NaN rather than dropping the row.
fn parse_count(cell: &str) -> f64 {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Reshape cache
// ---------------------------------------------------------------------------

/// Process-local memo of reshaped tables, keyed by file path and identifying
/// columns. No eviction; entries live for the life of the process so widget
/// interactions never re-read a file. Owned by the app state, which is the
/// single writer.
#[derive(Debug, Default)]
pub struct ReshapeCache {
    entries: BTreeMap<(PathBuf, Vec<String>), Arc<LongTable>>,
}

impl ReshapeCache {
    /// Return the melted table for `path`, reading and reshaping it on the
    /// first request only.
    pub fn load(&mut self, path: &Path, id_columns: &[String]) -> Result<Arc<LongTable>> {
        let key = (path.to_path_buf(), id_columns.to_vec());
        if let Some(table) = self.entries.get(&key) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_and_melt(path, id_columns)?);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
