use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Parameter;

// ---------------------------------------------------------------------------
// Color palette generator
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

// ---------------------------------------------------------------------------
// Marker colours per parameter
// ---------------------------------------------------------------------------

/// Marker opacity for scatter points.
pub const MARKER_ALPHA: f32 = 0.7;

/// Scatter marker colour for a parameter, translucent so overlapping points show.
pub fn marker_color(parameter: Parameter) -> Color32 {
    let palette = generate_palette(Parameter::ALL.len());
    let idx = Parameter::ALL
        .iter()
        .position(|p| *p == parameter)
        .unwrap_or(0);
    palette[idx].gamma_multiply(MARKER_ALPHA)
}
