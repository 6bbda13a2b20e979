mod cli;

use std::path::Path;

use cli::{parse_cli, ProjectionKind};
use planet_engine::{config, PlanetSampler};
use planet_palette::{HintGrid, HintMap, Palette};
use planet_render::{render_to_image, Equirectangular, Orthographic, Projection, Stereographic};

const HINT_MAP_WIDTH: usize = 48;
const HINT_MAP_HEIGHT: usize = 24;

fn main() {
    let options = parse_cli().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    if let Err(err) = run(options) {
        eprintln!("planetgen: {err}");
        std::process::exit(1);
    }
}

fn run(options: cli::CliOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config().clone();
    cfg.shade_mode = options.shade_mode;
    cfg.make_biomes = options.biomes;
    let cfg = cfg.with_wrinkly(options.wrinkly);

    let hint_map = options
        .hint_map
        .as_deref()
        .map(load_hint_map)
        .transpose()?;

    let total_colors = 256;
    let palette = if cfg.make_biomes {
        Palette::default_biome_ramp(total_colors)
    } else {
        Palette::default_altitude_ramp(total_colors)
    };
    let layout = palette.layout();

    let depth = (3 * log2_floor(options.scale * options.height as f64) + 6).min(cfg.max_depth);
    let mut sampler = PlanetSampler::new(options.seed, depth, cfg, layout, hint_map);

    let projection: Box<dyn Projection> = match options.projection {
        ProjectionKind::Equirectangular => Box::new(Equirectangular::new(options.center_latitude, options.center_longitude)),
        ProjectionKind::Orthographic => Box::new(Orthographic::new(options.center_latitude, options.center_longitude, options.scale)),
        ProjectionKind::Stereographic => Box::new(Stereographic::new(options.center_latitude, options.center_longitude, options.scale)),
    };

    render_to_image(options.width, options.height, projection.as_ref(), &mut sampler, &palette, Path::new(&options.out_path))?;

    println!("Wrote {}", options.out_path);
    let (temp_min, temp_max) = sampler.temperature_range();
    let (rain_min, rain_max) = sampler.rainfall_range();
    println!("temperature range: {temp_min:.3}..{temp_max:.3}");
    println!("rainfall range: {rain_min:.3}..{rain_max:.3}");

    Ok(())
}

fn load_hint_map(path: &str) -> Result<HintMap, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let grid = HintGrid::parse(&text)?;
    Ok(HintMap::from_grid_upsampled(&grid, HINT_MAP_WIDTH, HINT_MAP_HEIGHT))
}

/// Reproduces the reference implementation's `3*log2(scale*Height)+6` depth
/// formula, using a floor-based integer log2 rather than `f64::log2` so the
/// result matches the original's `(int)` truncation of a C `log()` call.
fn log2_floor(value: f64) -> u32 {
    if value <= 1.0 {
        return 0;
    }
    value.log2().floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_floor_matches_known_values() {
        assert_eq!(log2_floor(1.0), 0);
        assert_eq!(log2_floor(256.0), 8);
        assert_eq!(log2_floor(400.0), 8);
        assert_eq!(log2_floor(0.5), 0);
    }
}
