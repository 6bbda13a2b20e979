use planet_engine::ShadeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Equirectangular,
    Orthographic,
    Stereographic,
}

pub struct CliOptions {
    pub seed: f64,
    pub width: u32,
    pub height: u32,
    pub projection: ProjectionKind,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub scale: f64,
    pub shade_mode: ShadeMode,
    pub wrinkly: bool,
    pub biomes: bool,
    pub hint_map: Option<String>,
    pub out_path: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            seed: 0.123,
            width: 800,
            height: 400,
            projection: ProjectionKind::Equirectangular,
            center_latitude: 0.0,
            center_longitude: 0.0,
            scale: 1.0,
            shade_mode: ShadeMode::BumpOnLand,
            wrinkly: false,
            biomes: true,
            hint_map: None,
            out_path: "out/planet.png".to_string(),
        }
    }
}

pub fn parse_cli() -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut seed_given = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" | "-s" => {
                let value = next_value(&mut args, &arg)?;
                options.seed = parse_f64(&arg, &value)?;
                seed_given = true;
            }
            "--width" | "-w" => options.width = parse_u32(&arg, &next_value(&mut args, &arg)?)?,
            "--height" | "-h" => options.height = parse_u32(&arg, &next_value(&mut args, &arg)?)?,
            "--projection" | "-p" => options.projection = parse_projection(&next_value(&mut args, &arg)?)?,
            "--center-lat" => options.center_latitude = parse_f64(&arg, &next_value(&mut args, &arg)?)?.to_radians(),
            "--center-lon" => options.center_longitude = parse_f64(&arg, &next_value(&mut args, &arg)?)?.to_radians(),
            "--scale" => options.scale = parse_f64(&arg, &next_value(&mut args, &arg)?)?,
            "--shade" => options.shade_mode = parse_shade(&next_value(&mut args, &arg)?)?,
            "--wrinkly" => options.wrinkly = true,
            "--no-biomes" => options.biomes = false,
            "--hint-map" => options.hint_map = Some(next_value(&mut args, &arg)?),
            "--out" | "-o" => options.out_path = next_value(&mut args, &arg)?,
            "--help" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument '{arg}'. Use --help to see supported options.")),
        }
    }

    if !seed_given {
        options.seed = random_seed();
    }

    Ok(options)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("Expected a value after '{flag}'."))
}

fn parse_f64(flag: &str, value: &str) -> Result<f64, String> {
    value.parse().map_err(|_| format!("Invalid value '{value}' for '{flag}': expected a number."))
}

fn parse_u32(flag: &str, value: &str) -> Result<u32, String> {
    value.parse().map_err(|_| format!("Invalid value '{value}' for '{flag}': expected a positive integer."))
}

fn parse_projection(value: &str) -> Result<ProjectionKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "equirectangular" | "equi" => Ok(ProjectionKind::Equirectangular),
        "orthographic" | "ortho" => Ok(ProjectionKind::Orthographic),
        "stereographic" | "stereo" => Ok(ProjectionKind::Stereographic),
        _ => Err(format!("Unknown projection '{value}'. Use one of: equirectangular, orthographic, stereographic.")),
    }
}

fn parse_shade(value: &str) -> Result<ShadeMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "off" => Ok(ShadeMode::Off),
        "bump" => Ok(ShadeMode::Bump),
        "bump-on-land" => Ok(ShadeMode::BumpOnLand),
        "daylight" => Ok(ShadeMode::Daylight),
        _ => Err(format!("Unknown shade mode '{value}'. Use one of: off, bump, bump-on-land, daylight.")),
    }
}

fn random_seed() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let nanos = now.as_nanos() as u64;
    let pid = std::process::id() as u64;
    let mut z = nanos ^ pid.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z ^= z >> 33;
    z = z.wrapping_mul(0xff51_afd7_ed55_8ccd);
    z ^= z >> 33;
    (z % 1_000_000) as f64 / 1000.0
}

fn print_usage() {
    println!("Usage: planetgen [options]");
    println!();
    println!("Options:");
    println!("  -s, --seed <f64>          Master seed (default: random)");
    println!("  -w, --width <u32>         Output width in pixels (default: 800)");
    println!("  -h, --height <u32>        Output height in pixels (default: 400)");
    println!("  -p, --projection <name>   equirectangular | orthographic | stereographic");
    println!("      --center-lat <deg>    View center latitude in degrees");
    println!("      --center-lon <deg>    View center longitude in degrees");
    println!("      --scale <f64>         Zoom factor for orthographic/stereographic");
    println!("      --shade <mode>        off | bump | bump-on-land | daylight");
    println!("      --wrinkly             Shorter, sharper displacement falloff");
    println!("      --no-biomes           Use the plain altitude ramp instead of biome colours");
    println!("      --hint-map <path>     ASCII altitude hint grid to bias large-scale terrain");
    println!("  -o, --out <path>          Output PNG path (default: out/planet.png)");
}
