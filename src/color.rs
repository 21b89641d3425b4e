use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use happiness_atlas::geo::Continent;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Sequential scale for indicator values
// ---------------------------------------------------------------------------

/// Dark blue → pale → dark red.
const SCALE_STOPS: [(u8, u8, u8); 8] = [
    (0x08, 0x30, 0x6b),
    (0x21, 0x71, 0xb5),
    (0x6b, 0xae, 0xd6),
    (0x9e, 0xca, 0xe1),
    (0xe5, 0xf5, 0xf9),
    (0xfc, 0xae, 0x91),
    (0xfb, 0x6a, 0x4a),
    (0xcb, 0x18, 0x1d),
];

fn stop_linear(i: usize) -> LinSrgb {
    let (r, g, b) = SCALE_STOPS[i];
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Colour for `t` in [0, 1], interpolated in linear RGB. Out-of-range input
/// is clamped.
pub fn sequential_color(t: f64) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } as f32;
    let segments = (SCALE_STOPS.len() - 1) as f32;
    let pos = t * segments;
    let lo = (pos.floor() as usize).min(SCALE_STOPS.len() - 2);
    let frac = pos - lo as f32;
    let mixed = stop_linear(lo).mix(stop_linear(lo + 1), frac);
    to_color32(Srgb::from_linear(mixed))
}

/// Position of `value` between `min` and `max`; 0 when the range is empty.
pub fn scale_position(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        0.0
    } else {
        (value - min) / range
    }
}

// ---------------------------------------------------------------------------
// Continent colours
// ---------------------------------------------------------------------------

/// Fixed colour per continent, shared by every chart.
#[derive(Debug, Clone)]
pub struct ContinentColors {
    mapping: BTreeMap<Continent, Color32>,
    default_color: Color32,
}

impl Default for ContinentColors {
    fn default() -> Self {
        let mapping = Continent::ALL
            .iter()
            .copied()
            .zip(generate_palette(Continent::ALL.len()))
            .collect();
        ContinentColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl ContinentColors {
    pub fn color_for(&self, continent: Continent) -> Color32 {
        self.mapping
            .get(&continent)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (name → colour) for the given continents.
    pub fn legend_entries<'a, I>(&self, continents: I) -> Vec<(String, Color32)>
    where
        I: IntoIterator<Item = &'a Continent>,
    {
        continents
            .into_iter()
            .map(|c| (c.to_string(), self.color_for(*c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let palette = generate_palette(7);
        assert_eq!(palette.len(), 7);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn sequential_scale_clamps() {
        assert_eq!(sequential_color(-3.0), sequential_color(0.0));
        assert_eq!(sequential_color(7.0), sequential_color(1.0));
        assert_eq!(sequential_color(f64::NAN), sequential_color(0.0));
        assert_ne!(sequential_color(0.0), sequential_color(1.0));
    }

    #[test]
    fn scale_position_handles_flat_range() {
        assert_eq!(scale_position(5.0, 5.0, 5.0), 0.0);
        assert_eq!(scale_position(7.5, 5.0, 10.0), 0.5);
    }

    #[test]
    fn every_continent_has_a_colour() {
        let colors = ContinentColors::default();
        for c in Continent::ALL {
            assert_ne!(colors.color_for(c), Color32::GRAY);
        }
    }
}
