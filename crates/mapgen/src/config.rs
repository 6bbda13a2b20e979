use serde::Deserialize;
use std::{fs, path::PathBuf, sync::OnceLock};

/// Which shading evaluator `Sample::color` blends into its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadeMode {
    Off,
    Bump,
    BumpOnLand,
    Daylight,
}

/// Tunable parameters of the altitude oracle and sample pipeline, loaded from
/// YAML with a hard-coded fallback if the file is missing or malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Initial perturbation scale applied at the root tetrahedron's level.
    pub initial_altitude: f64,
    /// Displacement falloff applied per subdivision level (`dd1`).
    pub displacement_falloff: f64,
    /// Exponent controlling how strongly displacement shrinks with edge
    /// length (`POWA`).
    pub displacement_power: f64,
    /// Additional falloff blended in past `matchSize` (`dd2`).
    pub deep_falloff: f64,
    /// Exponent paired with `deep_falloff` (`POW`).
    pub deep_power: f64,
    /// Hard ceiling on recursion depth, independent of the depth the caller
    /// asks for (`3*log2(scale*Height)+6`); the smaller of the two is used.
    pub max_depth: u32,
    /// Whether altitude is passed through a non-linear cube-ish rescaling
    /// before classification (stretches oceans, compresses peaks).
    pub non_linear: bool,
    /// Latitude-cooling strength (`latic`). `0` disables latitude effects;
    /// a strictly positive value also raises icecaps at the poles, while any
    /// nonzero value (including negative) biases land altitude by latitude.
    pub latic: i32,
    /// Global rainfall bias added before biome classification.
    pub rainfall_bias: f64,
    /// Global temperature bias added before biome classification.
    pub temperature_bias: f64,
    /// Whether the sample pipeline classifies into Whittaker biome letters
    /// (true) or a plain altitude ramp (false).
    pub make_biomes: bool,
    /// Edge length (in tetrahedron-space) below which a hint map, if present,
    /// stops being consulted and pure procedural displacement takes over.
    pub match_size: f64,
    /// Light-direction angle (radians) used by `Bump`/`BumpOnLand` shading.
    pub shade_angle: f64,
    /// Secondary light-direction angle (radians) used by `Daylight` shading.
    pub shade_angle2: f64,
    /// Which shading evaluator to blend in.
    pub shade_mode: ShadeMode,
    /// Display temperature in place of altitude (diagnostic output mode).
    pub display_temperature: bool,
    /// Display rainfall in place of altitude (diagnostic output mode).
    pub display_rainfall: bool,
}

impl Config {
    /// Applies the reference implementation's "wrinkly" terrain toggle:
    /// halves the displacement falloff and fixes the displacement power at
    /// 0.75. Idempotent — calling it twice leaves the config unchanged after
    /// the first call, since both fields are set to absolute values rather
    /// than scaled relative to their current state.
    pub fn with_wrinkly(mut self, wrinkly: bool) -> Self {
        if wrinkly {
            self.displacement_falloff = self.default_displacement_falloff_wrinkly();
            self.displacement_power = 0.75;
        }
        self
    }

    fn default_displacement_falloff_wrinkly(&self) -> f64 {
        Self::default().displacement_falloff / 2.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_altitude: -0.02,
            displacement_falloff: 0.45,
            displacement_power: 1.0,
            deep_falloff: 0.035,
            deep_power: 0.47,
            max_depth: 60,
            non_linear: false,
            latic: 0,
            rainfall_bias: 0.0,
            temperature_bias: 0.0,
            make_biomes: false,
            match_size: 0.1,
            shade_angle: 150.0_f64.to_radians(),
            shade_angle2: 20.0_f64.to_radians(),
            shade_mode: ShadeMode::BumpOnLand,
            display_temperature: false,
            display_rainfall: false,
        }
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PLANETGEN_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../planetgen.yaml")
}

fn load_config() -> Config {
    let path = config_path();
    match fs::read_to_string(&path) {
        Ok(raw) => match serde_yaml::from_str::<Config>(&raw) {
            Ok(config) => config,
            Err(err) => {
                eprintln!(
                    "Failed to parse config at '{}': {err}. Falling back to defaults.",
                    path.display()
                );
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// The process-wide configuration singleton, loaded lazily on first use.
pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(load_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrinkly_is_idempotent() {
        let once = Config::default().with_wrinkly(true);
        let twice = once.clone().with_wrinkly(true);
        assert_abs_diff_eq!(once.displacement_falloff, twice.displacement_falloff, epsilon = 1e-12);
        assert_eq!(once.displacement_power, twice.displacement_power);
    }

    #[test]
    fn wrinkly_false_leaves_defaults_untouched() {
        let plain = Config::default();
        let untouched = Config::default().with_wrinkly(false);
        assert_abs_diff_eq!(plain.displacement_falloff, untouched.displacement_falloff, epsilon = 1e-12);
        assert_eq!(plain.displacement_power, untouched.displacement_power);
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(cfg.max_depth > 0);
        assert!(cfg.match_size > 0.0);
    }
}
