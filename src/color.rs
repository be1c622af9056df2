use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed sex colours
// ---------------------------------------------------------------------------

/// Colour for a sex label. Both header spellings of the exports map to the
/// same fixed pair; anything else falls back to grey.
pub fn sex_color(label: &str) -> Color32 {
    match label {
        "남자" | "남" => Color32::from_rgb(0x1f, 0x77, 0xb4),
        "여자" | "여" => Color32::from_rgb(0xff, 0x69, 0xb4),
        _ => Color32::GRAY,
    }
}

// ---------------------------------------------------------------------------
// Generated palette for scenario series
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Maps scenario labels to distinct colours for the regional-comparison
/// series.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    /// Assign one palette colour per label, in the given order.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a label, grey for unknown labels.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
