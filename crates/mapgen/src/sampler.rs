use crate::config::Config;
use crate::oracle::Oracle;
use crate::shade;
use crate::whittaker;
use planet_palette::{HintMap, PaletteLayout};

/// What a single query of [`PlanetSampler::sample`] reports about one point
/// on the sphere.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub altitude: f64,
    pub temperature: f64,
    pub rainfall: f64,
    /// Palette slot this point should be rendered with.
    pub colour: usize,
    /// Shade multiplier in `10..=255`, or `None` when shading is disabled.
    pub shade: Option<u8>,
}

/// Owns the altitude oracle, the global temperature/rainfall extrema observed
/// so far, and the palette layout used to turn a raw altitude into a colour
/// index. One instance corresponds to one planet; sampling the same `(x, y,
/// z)` twice on the same instance always returns the same [`Sample`].
pub struct PlanetSampler {
    oracle: Oracle,
    config: Config,
    layout: PaletteLayout,
    temp_min: f64,
    temp_max: f64,
    rain_min: f64,
    rain_max: f64,
}

impl PlanetSampler {
    pub fn new(seed: f64, depth: u32, config: Config, layout: PaletteLayout, hint: Option<HintMap>) -> Self {
        Self {
            oracle: Oracle::new(seed, depth, config.clone(), hint),
            config,
            layout,
            temp_min: f64::INFINITY,
            temp_max: f64::NEG_INFINITY,
            rain_min: f64::INFINITY,
            rain_max: f64::NEG_INFINITY,
        }
    }

    pub fn reset_cache(&mut self) {
        self.oracle.reset_cache();
    }

    pub fn temperature_range(&self) -> (f64, f64) {
        (self.temp_min, self.temp_max)
    }

    pub fn rainfall_range(&self) -> (f64, f64) {
        (self.rain_min, self.rain_max)
    }

    /// Samples the point `(x, y, z)` on the unit sphere (in the oracle's own
    /// coordinate frame — the caller's [projection](crate) is responsible for
    /// turning a pixel into this triple).
    pub fn sample(&mut self, x: f64, y: f64, z: f64) -> Sample {
        let descent = self.oracle.locate(x, y, z);
        let mut alt = descent.altitude;

        let sun = (1.0 - y * y).sqrt();
        let temp = if alt < 0.0 { sun / 8.0 + alt * 0.3 } else { sun / 8.0 - alt * 1.2 };

        if alt > 0.0 {
            self.temp_min = self.temp_min.min(temp);
            self.temp_max = self.temp_max.max(temp);
        }

        let y2_horse = y.abs() - 0.5;
        let mut rain = temp * 0.65 + 0.1 - 0.011 / (y2_horse * y2_horse + 0.1);
        rain += 0.03 * descent.rain_shadow;
        if rain < 0.0 {
            rain = 0.0;
        }

        if alt > 0.0 {
            self.rain_min = self.rain_min.min(rain);
            self.rain_max = self.rain_max.max(rain);
        }

        let biased_temp = temp + self.config.temperature_bias;
        let biased_rain = rain + self.config.rainfall_bias;

        if self.config.display_temperature {
            alt = temp - 0.05;
        }
        if self.config.display_rainfall {
            alt = rain - 0.02;
        }

        if self.config.non_linear {
            alt = alt * alt * alt * 300.0;
        }

        let y2 = y * y * y * y * y * y * y * y;
        let latic = self.config.latic as f64;

        let colour = if self.config.make_biomes {
            let tt = ((biased_rain * 300.0 - 9.0) as i64).clamp(0, 44) as usize;
            let rr = ((biased_temp * 300.0 + 10.0) as i64).clamp(0, 44) as usize;
            let bio = whittaker::lookup(tt, rr);
            if alt <= 0.0 {
                self.layout.sea_band_index(alt)
            } else {
                self.layout.biome_slot(bio)
            }
        } else if alt <= 0.0 {
            if self.config.latic > 0 && y2 + alt >= 1.0 - 0.02 * latic * latic {
                self.layout.highest()
            } else {
                self.layout.sea_band_index(alt)
            }
        } else {
            let mut land_alt = alt;
            if self.config.latic != 0 {
                land_alt += 0.1 * latic * y2;
            }
            self.layout.land_band_index(land_alt)
        };

        let shade = shade::evaluate(self.config.shade_mode, descent.leaf, x, y, z, self.config.shade_angle, self.config.shade_angle2);

        Sample {
            altitude: alt,
            temperature: temp,
            rainfall: rain,
            colour,
            shade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PaletteLayout {
        PaletteLayout::new(256)
    }

    #[test]
    fn repeated_sample_is_deterministic() {
        let mut s = PlanetSampler::new(0.42, 6, Config::default(), layout(), None);
        let a = s.sample(0.3, 0.2, 0.9);
        let b = s.sample(0.3, 0.2, 0.9);
        assert_eq!(a.altitude, b.altitude);
        assert_eq!(a.colour, b.colour);
    }

    #[test]
    fn colour_always_lands_in_layout_range() {
        let mut s = PlanetSampler::new(3.14, 6, Config::default(), layout(), None);
        for i in 0..40 {
            let t = i as f64 * 0.1;
            let sample = s.sample(t.sin(), (t * 1.3).cos() * 0.5, (t * 0.7).sin());
            assert!(sample.colour < layout().total_colors());
        }
    }

    #[test]
    fn shade_is_none_when_disabled() {
        let mut cfg = Config::default();
        cfg.shade_mode = crate::config::ShadeMode::Off;
        let mut s = PlanetSampler::new(1.0, 6, cfg, layout(), None);
        assert_eq!(s.sample(0.1, 0.2, 0.3).shade, None);
    }
}
