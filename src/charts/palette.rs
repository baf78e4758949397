//! Chart colours

use egui::Color32;

/// Ten-colour categorical scheme for series and legend entries
pub const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

/// Pastel scheme for pie slices
pub const SET3: [Color32; 12] = [
    Color32::from_rgb(141, 211, 199),
    Color32::from_rgb(255, 255, 179),
    Color32::from_rgb(190, 186, 218),
    Color32::from_rgb(251, 128, 114),
    Color32::from_rgb(128, 177, 211),
    Color32::from_rgb(253, 180, 98),
    Color32::from_rgb(179, 222, 105),
    Color32::from_rgb(252, 205, 229),
    Color32::from_rgb(217, 217, 217),
    Color32::from_rgb(188, 128, 189),
    Color32::from_rgb(204, 235, 197),
    Color32::from_rgb(255, 237, 111),
];

/// Single-series fill (bars, trend line)
pub const ACCENT: Color32 = Color32::from_rgb(70, 130, 180);

/// Regions without data
pub const NO_DATA: Color32 = Color32::from_rgb(204, 204, 204);

/// Per-year total line on the grouped bar chart
pub const TOTAL: Color32 = Color32::from_rgb(220, 50, 47);

pub fn category(index: usize) -> Color32 {
    CATEGORY10[index % CATEGORY10.len()]
}

pub fn pastel(index: usize) -> Color32 {
    SET3[index % SET3.len()]
}

// Viridis sampled at nine evenly spaced stops
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Sequential colour for `t` in `0..=1`
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let mix = |c: usize| (a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac).round() as u8;
    Color32::from_rgb(mix(0), mix(1), mix(2))
}

/// Semi-transparent version of a colour for area fills
pub fn translucent(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(viridis(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn test_categorical_wraps() {
        assert_eq!(category(10), category(0));
        assert_eq!(pastel(13), pastel(1));
    }
}
