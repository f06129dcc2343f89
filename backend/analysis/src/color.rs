//! WCAG color science.
//!
//! Hex parsing, sRGB linearisation, relative luminance and the contrast ratio
//! defined by WCAG 2.x. Ratios always fall in `[1.0, 21.0]` and do not depend
//! on argument order.

use accessibridge_core::AccessError;
use serde::Serialize;

/// Channel value at or below which sRGB is treated as linear.
const LINEAR_THRESHOLD: f64 = 0.03928;

/// Parse a 3- or 6-digit hex color (optionally `#`-prefixed) into channels in `[0, 1]`.
pub fn hex_to_rgb(color: &str) -> Result<(f64, f64, f64), AccessError> {
    let hex = color.strip_prefix('#').unwrap_or(color);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AccessError::InvalidColorFormat(color.to_string()));
    }

    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return Err(AccessError::InvalidColorFormat(color.to_string())),
    };

    let channel = |i: usize| -> Result<f64, AccessError> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| f64::from(v) / 255.0)
            .map_err(|_| AccessError::InvalidColorFormat(color.to_string()))
    };

    Ok((channel(0)?, channel(2)?, channel(4)?))
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= LINEAR_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of linear-light weighted sRGB channels in `[0, 1]`.
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * srgb_to_linear(r) + 0.7152 * srgb_to_linear(g) + 0.0722 * srgb_to_linear(b)
}

/// WCAG contrast ratio between two hex colors.
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64, AccessError> {
    let (ar, ag, ab) = hex_to_rgb(a)?;
    let (br, bg, bb) = hex_to_rgb(b)?;
    let la = relative_luminance(ar, ag, ab);
    let lb = relative_luminance(br, bg, bb);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    Ok(((lighter + 0.05) / (darker + 0.05)).clamp(1.0, 21.0))
}

/// Pass/fail against the WCAG text contrast thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WcagCheck {
    pub ratio: f64,
    pub passes_aa: bool,
    pub passes_aa_large: bool,
    pub passes_aaa: bool,
    pub passes_aaa_large: bool,
}

impl WcagCheck {
    pub fn from_ratio(ratio: f64) -> Self {
        Self {
            ratio: (ratio * 100.0).round() / 100.0,
            passes_aa: ratio >= 4.5,
            passes_aa_large: ratio >= 3.0,
            passes_aaa: ratio >= 7.0,
            passes_aaa_large: ratio >= 4.5,
        }
    }

    /// Compute the ratio for `foreground` on `background` and check it.
    pub fn evaluate(foreground: &str, background: &str) -> Result<Self, AccessError> {
        contrast_ratio(foreground, background).map(Self::from_ratio)
    }
}
