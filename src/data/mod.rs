/// Data layer: registry, reshape, filtering, and the render pass.
///
/// Architecture:
/// ```text
///   registry        label → (csv file, identifying columns)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  wide CSV → melt → LongTable   (memoised per file+columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSet + year → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  summary, chart spec, preview rows
///   └──────────┘
/// ```
///
/// Nothing in here knows about egui; the UI layer draws whatever
/// [`view::render_pass`] hands back.
pub mod filter;
pub mod loader;
pub mod model;
pub mod registry;
pub mod view;
