use palette::Srgb;

use crate::error::{Error, Result};

/// 8-bit RGB pixel value.
pub type Rgb = Srgb<u8>;

/// Base hue of the waterfall ramp, in full turns (0.6 = blue/cyan).
pub const WATERFALL_HUE: f64 = 0.6;
/// Saturation of the waterfall ramp.
pub const WATERFALL_SATURATION: f64 = 1.0;

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRD: f64 = 2.0 / 3.0;

/// Map an intensity in `[0.0, 1.0]` to the waterfall colour.
///
/// Lightness follows the intensity at fixed hue and saturation, so 0.0 is
/// black and 1.0 is white with the blue ramp in between.
pub fn colorize(intensity: f64) -> Result<Rgb> {
    if !(0.0..=1.0).contains(&intensity) {
        return Err(Error::Range(intensity));
    }
    let (r, g, b) = hls_to_rgb(WATERFALL_HUE, intensity, WATERFALL_SATURATION);
    Ok(Srgb::new(to_channel(r), to_channel(g), to_channel(b)))
}

/// Like [`colorize`], but pins out-of-range values to the nearest end of the ramp.
/// NaN maps to black.
pub fn colorize_clamped(intensity: f64) -> Rgb {
    let intensity = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
    let (r, g, b) = hls_to_rgb(WATERFALL_HUE, intensity, WATERFALL_SATURATION);
    Srgb::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Standard hue/lightness/saturation to RGB conversion, all components in `[0, 1]`.
///
/// The hue is in full turns. Operation order is kept stable because the
/// truncated 8-bit output of [`colorize`] depends on the exact float results.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - (l * s) };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + ONE_THIRD),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - ONE_THIRD),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRD {
        m1 + (m2 - m1) * (TWO_THIRD - hue) * 6.0
    } else {
        m1
    }
}

#[inline]
fn to_channel(v: f64) -> u8 {
    (v * 255.0) as u8
}

/// Parse a `#RRGGBB` / `RRGGBB` hex string.
pub fn from_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Srgb::new(r, g, b))
}

/// Format a colour as `#RRGGBB`.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{Hsl, IntoColor};

    #[test]
    fn extremes_are_black_and_white() {
        assert_eq!(colorize(0.0).unwrap(), Srgb::new(0, 0, 0));
        assert_eq!(colorize(1.0).unwrap(), Srgb::new(255, 255, 255));
    }

    #[test]
    fn midpoint_is_saturated_blue() {
        assert_eq!(colorize(0.5).unwrap(), Srgb::new(0, 101, 255));
    }

    #[test]
    fn ramp_matches_reference_triples() {
        // hls_to_rgb(0.6, l, 1.0), each channel * 255 truncated
        let expected = [
            (0.1, (0, 20, 51)),
            (0.25, (0, 50, 127)),
            (0.75, (127, 178, 255)),
            (0.9, (204, 224, 254)),
        ];
        for (l, (r, g, b)) in expected {
            assert_eq!(colorize(l).unwrap(), Srgb::new(r, g, b), "intensity {l}");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(colorize(-0.01), Err(Error::Range(-0.01)));
        assert_eq!(colorize(1.5), Err(Error::Range(1.5)));
        assert!(matches!(colorize(f64::NAN), Err(Error::Range(_))));
    }

    #[test]
    fn clamped_variant_pins_to_ramp_ends() {
        assert_eq!(colorize_clamped(-3.0), colorize(0.0).unwrap());
        assert_eq!(colorize_clamped(7.0), colorize(1.0).unwrap());
        assert_eq!(colorize_clamped(f64::NAN), colorize(0.0).unwrap());
        assert_eq!(colorize_clamped(0.3), colorize(0.3).unwrap());
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hls_to_rgb(0.6, 0.25, 0.0), (0.25, 0.25, 0.25));
    }

    #[test]
    fn matches_palette_hsl_within_rounding() {
        for step in 0..=20 {
            let l = step as f64 / 20.0;
            let ours = colorize(l).unwrap();
            let hsl: Hsl<palette::encoding::Srgb, f64> =
                Hsl::new(WATERFALL_HUE * 360.0, WATERFALL_SATURATION, l);
            let theirs: Srgb<f64> = hsl.into_color();
            for (a, b) in [
                (ours.red, theirs.red),
                (ours.green, theirs.green),
                (ours.blue, theirs.blue),
            ] {
                assert!(
                    (a as f64 - b * 255.0).abs() <= 1.0,
                    "lightness {l}: {a} vs {}",
                    b * 255.0
                );
            }
        }
    }

    #[test]
    fn hex_round_trip() {
        let c = from_hex("#1A2b3C").unwrap();
        assert_eq!(c, Srgb::new(0x1A, 0x2B, 0x3C));
        assert_eq!(to_hex(c), "#1A2B3C");
        assert!(from_hex("#12345").is_none());
        assert!(from_hex("zzzzzz").is_none());
    }
}
