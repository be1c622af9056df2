use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset registry: label → (file, identifying columns)
// ---------------------------------------------------------------------------

/// Optional registry override file inside the data directory.
pub const REGISTRY_FILE: &str = "datasets.json";

/// One selectable dataset: display label, CSV file name relative to the data
/// directory, and the ordered identifying columns of its wide layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetDescriptor {
    pub label: String,
    pub file: String,
    pub id_columns: Vec<String>,
}

impl DatasetDescriptor {
    fn new(label: &str, file: &str, id_columns: &[&str]) -> Self {
        DatasetDescriptor {
            label: label.to_string(),
            file: file.to_string(),
            id_columns: id_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Absolute path of the CSV inside `data_dir`.
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }
}

/// The built-in registry: the two cleaned KOSIS projection exports.
pub fn default_registry() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor::new(
            "성 및 연령별 추계인구 (전국)",
            "성및연령별추계인구_전국_정리됨_cleaned.csv",
            &["가정별", "성별", "연령"],
        ),
        DatasetDescriptor::new(
            "성 및 연령별 추계인구 (시도)",
            "성및연령별추계인구_시도_정리됨_cleaned.csv",
            &["시나리오별", "지역", "성별", "연령"],
        ),
    ]
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no {REGISTRY_FILE} in the data directory")]
    Missing,
    #[error("reading {REGISTRY_FILE}: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing {REGISTRY_FILE}: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{REGISTRY_FILE} lists no datasets")]
    Empty,
}

/// Load the registry override from `data_dir`. [`RegistryError::Missing`] is
/// the expected case for a directory holding just the default CSVs; callers
/// fall back to [`default_registry`] on it silently and surface every other
/// variant.
pub fn load_registry(data_dir: &Path) -> Result<Vec<DatasetDescriptor>, RegistryError> {
    let path = data_dir.join(REGISTRY_FILE);
    if !path.exists() {
        return Err(RegistryError::Missing);
    }
    let text = std::fs::read_to_string(&path)?;
    let datasets: Vec<DatasetDescriptor> = serde_json::from_str(&text)?;
    if datasets.is_empty() {
        return Err(RegistryError::Empty);
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_registry_has_the_two_projection_datasets() {
        let registry = default_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[0].id_columns, vec!["가정별", "성별", "연령"]);
        assert_eq!(
            registry[1].id_columns,
            vec!["시나리오별", "지역", "성별", "연령"]
        );
    }

    #[test]
    fn missing_override_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_registry(dir.path()),
            Err(RegistryError::Missing)
        ));
    }

    #[test]
    fn override_file_replaces_the_builtin_registry() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join(REGISTRY_FILE)).unwrap();
        f.write_all(
            r#"[{"label": "시군구 인구", "file": "sigungu.csv", "id_columns": ["지역", "연령"]}]"#.as_bytes(),
        )
        .unwrap();

        let registry = load_registry(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry[0].label, "시군구 인구");
        assert_eq!(registry[0].path_in(dir.path()), dir.path().join("sigungu.csv"));
    }

    #[test]
    fn malformed_override_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REGISTRY_FILE), b"not json").unwrap();
        assert!(matches!(
            load_registry(dir.path()),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn empty_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REGISTRY_FILE), b"[]").unwrap();
        assert!(matches!(load_registry(dir.path()), Err(RegistryError::Empty)));
    }
}
