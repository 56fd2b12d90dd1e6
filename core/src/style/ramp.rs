use serde::{Deserialize, Serialize};

/// 8-bit RGB paint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Piecewise-linear density-to-color ramp. Monotonic in the stop keys,
/// clamped below the first and above the last stop.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRamp {
    stops: Vec<(u32, Rgb)>,
}

impl Default for DensityRamp {
    fn default() -> Self {
        Self {
            stops: vec![
                (0, Rgb::new(0xFF, 0xCC, 0xBC)),
                (50, Rgb::new(0xFF, 0x8A, 0x65)),
                (100, Rgb::new(0xFF, 0x57, 0x22)),
                (150, Rgb::new(0xE6, 0x4A, 0x19)),
                (200, Rgb::new(0xBF, 0x36, 0x0C)),
            ],
        }
    }
}

impl DensityRamp {
    pub fn stops(&self) -> &[(u32, Rgb)] {
        &self.stops
    }

    pub fn color_for(&self, density: u32) -> Rgb {
        let (first_key, first_color) = self.stops[0];
        if density <= first_key {
            return first_color;
        }
        for window in self.stops.windows(2) {
            let (low_key, low) = window[0];
            let (high_key, high) = window[1];
            if density <= high_key {
                let t = (density - low_key) as f64 / (high_key - low_key) as f64;
                return Rgb::new(
                    lerp(low.r, high.r, t),
                    lerp(low.g, high.g, t),
                    lerp(low.b, high.b, t),
                );
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

fn lerp(low: u8, high: u8, t: f64) -> u8 {
    (low as f64 + (high as f64 - low as f64) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_values_map_exactly() {
        let ramp = DensityRamp::default();
        assert_eq!(ramp.color_for(0), Rgb::new(0xFF, 0xCC, 0xBC));
        assert_eq!(ramp.color_for(100), Rgb::new(0xFF, 0x57, 0x22));
        assert_eq!(ramp.color_for(200), Rgb::new(0xBF, 0x36, 0x0C));
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let ramp = DensityRamp::default();
        // Halfway between (0, FFCCBC) and (50, FF8A65).
        assert_eq!(ramp.color_for(25), Rgb::new(255, 171, 145));
    }

    #[test]
    fn densities_above_the_last_stop_clamp() {
        let ramp = DensityRamp::default();
        assert_eq!(ramp.color_for(201), Rgb::new(0xBF, 0x36, 0x0C));
        assert_eq!(ramp.color_for(10_000), Rgb::new(0xBF, 0x36, 0x0C));
    }

    #[test]
    fn ramp_darkens_monotonically_in_red_channel() {
        let ramp = DensityRamp::default();
        let mut previous = ramp.color_for(0).r;
        for density in [10, 60, 110, 160, 210] {
            let current = ramp.color_for(density).r;
            assert!(current <= previous);
            previous = current;
        }
    }
}
