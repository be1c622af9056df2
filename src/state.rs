use std::path::PathBuf;
use std::sync::Arc;

use crate::data::filter::{default_filters, FilterSet};
use crate::data::loader::ReshapeCache;
use crate::data::model::LongTable;
use crate::data::registry::{default_registry, load_registry, DatasetDescriptor, RegistryError};
use crate::data::view::{render_pass, RenderOutput};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory holding the CSVs (and the optional registry override).
    pub data_dir: PathBuf,

    /// Selectable datasets.
    pub registry: Vec<DatasetDescriptor>,

    /// Index into `registry` of the active dataset.
    pub selected_dataset: usize,

    /// Reshaped table of the active dataset (None until a load succeeds).
    pub table: Option<Arc<LongTable>>,

    /// Melt results memoised per (file, identifying columns).
    pub cache: ReshapeCache,

    /// Per-dimension allowed values.
    pub filters: FilterSet,

    /// Year the view is restricted to.
    pub selected_year: i32,

    /// Output of the last render pass.
    pub output: Option<RenderOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            registry: default_registry(),
            selected_dataset: 0,
            table: None,
            cache: ReshapeCache::default(),
            filters: FilterSet::default(),
            selected_year: 0,
            output: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// State pointed at `data_dir`, with the first dataset loaded (or a
    /// status message if that fails).
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let mut state = AppState::default();
        state.set_data_dir(data_dir);
        state
    }

    /// Point the app at a new data directory: reload the registry (override
    /// file or built-in) and the first dataset.
    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        self.data_dir = data_dir;
        self.registry = match load_registry(&self.data_dir) {
            Ok(registry) => registry,
            Err(RegistryError::Missing) => default_registry(),
            Err(e) => {
                log::warn!("registry override ignored: {e}");
                self.status_message = Some(format!("{e}"));
                default_registry()
            }
        };
        self.select_dataset(0);
    }

    /// Switch the active dataset: load (or re-use) its melted table, reset
    /// the filters to their widget defaults and the year to the newest one.
    pub fn select_dataset(&mut self, index: usize) {
        let Some(descriptor) = self.registry.get(index).cloned() else {
            return;
        };
        self.selected_dataset = index;

        let path = descriptor.path_in(&self.data_dir);
        match self.cache.load(&path, &descriptor.id_columns) {
            Ok(table) => {
                log::info!(
                    "loaded {} ({} rows, columns {:?})",
                    descriptor.label,
                    table.len(),
                    table.dim_columns
                );
                self.selected_year = table.year_range().map(|(_, max)| max).unwrap_or(0);
                self.filters = default_filters(&table);
                self.table = Some(table);
                self.status_message = None;
                self.rerender();
            }
            Err(e) => {
                log::error!("failed to load {}: {e:#}", descriptor.label);
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Display label of the active dataset.
    pub fn dataset_label(&self) -> &str {
        self.registry
            .get(self.selected_dataset)
            .map(|d| d.label.as_str())
            .unwrap_or("")
    }

    /// Re-run the filter-and-render pipeline against the current widget
    /// state. Called once per frame after the side panel.
    pub fn rerender(&mut self) {
        self.output = self.table.as_ref().map(|table| {
            render_pass(
                table,
                self.registry
                    .get(self.selected_dataset)
                    .map(|d| d.label.as_str())
                    .unwrap_or(""),
                &self.filters,
                self.selected_year,
            )
        });
    }

    /// Replace a single-choice dimension's selection.
    pub fn set_single_choice(&mut self, column: &str, value: String) {
        self.filters.insert(column.to_string(), vec![value]);
    }

    /// Toggle one value of a multi-choice dimension, keeping click order.
    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        let allowed = self.filters.entry(column.to_string()).or_default();
        if let Some(pos) = allowed.iter().position(|v| v == value) {
            allowed.remove(pos);
        } else {
            allowed.push(value.to_string());
        }
    }

    /// Select every offered value of a dimension.
    pub fn select_all(&mut self, column: &str, options: &[String]) {
        self.filters.insert(column.to_string(), options.to_vec());
    }

    /// Clear a dimension's selection (no constraint).
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), Vec::new());
    }
}
