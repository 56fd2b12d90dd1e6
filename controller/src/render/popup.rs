/// Shifts a feature longitude by whole world copies until it lies within
/// 180 degrees of the cursor, so a label lands on the visually nearest copy
/// of the feature when the view is zoomed out far enough to repeat the world.
/// A non-finite cursor longitude leaves the feature longitude unchanged;
/// this runs on the host event queue and must always return.
pub fn wrap_toward_cursor(feature_lng: f64, cursor_lng: f64) -> f64 {
    if !cursor_lng.is_finite() || !feature_lng.is_finite() {
        return feature_lng;
    }
    let mut lng = feature_lng;
    while (cursor_lng - lng).abs() > 180.0 {
        lng += if cursor_lng > lng { 360.0 } else { -360.0 };
    }
    lng
}
