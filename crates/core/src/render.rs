use std::{fs::create_dir_all, path::Path};

use image::{ImageBuffer, Rgb};
use planet_engine::PlanetSampler;
use planet_palette::{Palette, BACK};

use crate::projection::Projection;

/// Renders one full frame: every pixel is projected to a point on the
/// sphere (or marked background), sampled, and written through `palette`.
/// Shading is applied as a per-pixel multiplier on top of the palette color,
/// matching the reference implementation's separate shade buffer.
pub fn render_to_image(
    width: u32,
    height: u32,
    projection: &dyn Projection,
    sampler: &mut PlanetSampler,
    palette: &Palette,
    out_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if width == 0 || height == 0 {
        return Err("width and height must both be nonzero".into());
    }

    let mut img = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(width, height);
    sampler.reset_cache();

    for j in 0..height {
        for i in 0..width {
            let (colour, shade) = match projection.project(i, j, width, height) {
                Some((x, y, z)) => {
                    let sample = sampler.sample(x, y, z);
                    (sample.colour, sample.shade.unwrap_or(255))
                }
                None => (BACK, 255),
            };
            let (r, g, b) = palette.get(colour);
            img.put_pixel(i, j, apply_shade(Rgb([r, g, b]), shade));
        }
        sampler.reset_cache();
    }

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    img.save(out_path)?;
    Ok(())
}

fn apply_shade(rgb: Rgb<u8>, shade: u8) -> Rgb<u8> {
    let factor = shade as f32 / 255.0;
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    Rgb([scale(rgb.0[0]), scale(rgb.0[1]), scale(rgb.0[2])])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_of_255_is_identity() {
        assert_eq!(apply_shade(Rgb([10, 20, 30]), 255), Rgb([10, 20, 30]));
    }

    #[test]
    fn shade_of_zero_is_black() {
        assert_eq!(apply_shade(Rgb([10, 20, 30]), 0), Rgb([0, 0, 0]));
    }
}
