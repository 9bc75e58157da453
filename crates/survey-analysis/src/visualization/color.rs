//! Colour scales for rendered figures.

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Colour of a cell whose coefficient is undefined.
pub const NAN_COLOR: RGBColor = RGBColor(200, 200, 200);

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> RGBColor {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn category_palette(n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| hsl_to_rgb((i as f32 / n as f32) * 360.0, 0.6, 0.55))
        .collect()
}

/// Diverging blue-white-red scale for a correlation coefficient in `[-1, 1]`.
pub fn diverging_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return NAN_COLOR;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 230.0 } else { 5.0 };
    hsl_to_rgb(hue, 0.7, 0.97 - 0.47 * r.abs())
}

/// Dark text on light cells, light text on saturated ones.
pub fn annotation_color(r: f64) -> RGBColor {
    if r.is_nan() || r.abs() < 0.6 {
        RGBColor(20, 20, 20)
    } else {
        RGBColor(250, 250, 250)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_palette_size_and_distinct() {
        let colors = category_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
        assert!(category_palette(0).is_empty());
    }

    #[test]
    fn test_diverging_scale_ends() {
        let negative = diverging_color(-1.0);
        let positive = diverging_color(1.0);
        let neutral = diverging_color(0.0);

        assert!(negative.2 > negative.0, "negative end is blue");
        assert!(positive.0 > positive.2, "positive end is red");
        assert!(neutral.0 > 240 && neutral.1 > 240 && neutral.2 > 240);
    }

    #[test]
    fn test_nan_is_grey() {
        assert_eq!(diverging_color(f64::NAN), NAN_COLOR);
    }
}
