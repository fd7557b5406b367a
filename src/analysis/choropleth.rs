/// Fill color for countries without data.
pub const NO_DATA: &str = "#ccc";

/// GDP color scale for the world map. Thresholds are in raw current USD,
/// which is why the map snapshot skips the trillions normalization.
pub fn color_for(value: Option<f64>) -> &'static str {
    let Some(v) = value else { return NO_DATA };

    if v > 1e12 {
        "#00429d"
    } else if v > 5e11 {
        "#4771b2"
    } else if v > 1e11 {
        "#73a2c6"
    } else if v > 1e10 {
        "#a5d5d8"
    } else if v > 1e9 {
        "#ffffe0"
    } else if v > 1e8 {
        "#fdae61"
    } else if v > 1e7 {
        "#f46d43"
    } else if v > 1e6 {
        "#d73027"
    } else {
        "#a50026"
    }
}
