use crate::config::ShadeMode;
use crate::vertex::Tetrahedron;

/// Estimates a surface normal from the altitudes of a leaf tetrahedron's four
/// corners, then blends it with a configured light direction to produce a
/// shade value in `10..=255`. `None` means shading is disabled entirely,
/// distinct from a computed-but-fully-lit value. `shade_angle`/`shade_angle2`
/// are radians (the reference implementation stores degrees and converts at
/// each use site; here the conversion has already happened once, in
/// [`crate::config::Config`]).
pub fn evaluate(mode: ShadeMode, leaf: Tetrahedron, x: f64, y: f64, z: f64, shade_angle: f64, shade_angle2: f64) -> Option<u8> {
    match mode {
        ShadeMode::Off => None,
        ShadeMode::Bump | ShadeMode::BumpOnLand => Some(bump(mode, leaf, x, y, z, shade_angle)),
        ShadeMode::Daylight => Some(daylight(leaf, x, y, z, shade_angle, shade_angle2)),
    }
}

fn bump(mode: ShadeMode, leaf: Tetrahedron, x: f64, y: f64, z: f64, shade_angle: f64) -> u8 {
    let (a, b, c, d) = (leaf.a, leaf.b, leaf.c, leaf.d);

    let cx = 0.25 * (a.x + b.x + c.x + d.x);
    let x1 = a.h * (cx - a.x) + b.h * (cx - b.x) + c.h * (cx - c.x) + d.h * (cx - d.x);
    let cy = 0.25 * (a.y + b.y + c.y + d.y);
    let y1 = a.h * (cy - a.y) + b.h * (cy - b.y) + c.h * (cy - c.y) + d.h * (cy - d.y);
    let cz = 0.25 * (a.z + b.z + c.z + d.z);
    let z1 = a.h * (cz - a.z) + b.h * (cz - b.z) + c.h * (cz - c.z) + d.h * (cz - d.z);

    let mut l1 = (x1 * x1 + y1 * y1 + z1 * z1).sqrt();
    if l1 == 0.0 {
        l1 = 1.0;
    }
    let mut tmp = (1.0 - y * y).sqrt();
    if tmp < 0.0001 {
        tmp = 0.0001;
    }
    let y2 = -x * y / tmp * x1 + tmp * y1 - z * y / tmp * z1;
    let z2 = -z / tmp * x1 + x / tmp * z1;

    let mut shade = ((-shade_angle.sin() * y2 - shade_angle.cos() * z2) / l1 * 48.0 + 128.0) as i32;
    shade = shade.clamp(10, 255);

    let total_h = a.h + b.h + c.h + d.h;
    if mode == ShadeMode::BumpOnLand && total_h < 0.0 {
        shade = 150;
    }
    shade as u8
}

fn daylight(leaf: Tetrahedron, x: f64, y: f64, z: f64, shade_angle: f64, shade_angle2: f64) -> u8 {
    let (a, b, c, d) = (leaf.a, leaf.b, leaf.c, leaf.d);
    let total_h = a.h + b.h + c.h + d.h;

    let (mut x1, mut y1, mut z1) = if total_h <= 0.0 {
        (x, y, z)
    } else {
        let cx = 0.25 * (a.x + b.x + c.x + d.x);
        let mut nx = a.h * (cx - a.x) + b.h * (cx - b.x) + c.h * (cx - c.x) + d.h * (cx - d.x);
        let cy = 0.25 * (a.y + b.y + c.y + d.y);
        let mut ny = a.h * (cy - a.y) + b.h * (cy - b.y) + c.h * (cy - c.y) + d.h * (cy - d.y);
        let cz = 0.25 * (a.z + b.z + c.z + d.z);
        let mut nz = a.h * (cz - a.z) + b.h * (cz - b.z) + c.h * (cz - c.z) + d.h * (cz - d.z);
        let l1 = 5.0 * (nx * nx + ny * ny + nz * nz).sqrt();
        nx += x * l1;
        ny += y * l1;
        nz += z * l1;
        (nx, ny, nz)
    };

    let mut l1 = (x1 * x1 + y1 * y1 + z1 * z1).sqrt();
    if l1 == 0.0 {
        l1 = 1.0;
        x1 = 0.0;
        y1 = 0.0;
        z1 = 0.0;
    }

    let x2 = (shade_angle - 0.5 * std::f64::consts::PI).cos() * shade_angle2.cos();
    let y2 = -shade_angle2.sin();
    let z2 = -(shade_angle - 0.5 * std::f64::consts::PI).sin() * shade_angle2.cos();

    let shade = ((x1 * x2 + y1 * y2 + z1 * z2) / l1 * 170.0 + 10.0) as i32;
    shade.clamp(10, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    fn flat_leaf(h: f64) -> Tetrahedron {
        Tetrahedron::new(
            Vertex::new(1.0, 0.0, 0.0, 0.0, h, 0.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0, h, 0.0),
            Vertex::new(0.0, 0.0, 1.0, 0.0, h, 0.0),
            Vertex::new(-1.0, 0.0, 0.0, 0.0, h, 0.0),
        )
    }

    #[test]
    fn off_mode_produces_no_shade_value() {
        let leaf = flat_leaf(0.5);
        assert_eq!(evaluate(ShadeMode::Off, leaf, 0.3, 0.3, 0.3, 1.0, 1.0), None);
    }

    #[test]
    fn bump_on_land_darkens_sea_tetrahedra() {
        let leaf = flat_leaf(-1.0);
        let shade = evaluate(ShadeMode::BumpOnLand, leaf, 0.3, 0.3, 0.3, 150.0_f64.to_radians(), 0.0);
        assert_eq!(shade, Some(150));
    }

    #[test]
    fn shade_values_stay_within_byte_range() {
        let leaf = flat_leaf(0.8);
        for mode in [ShadeMode::Bump, ShadeMode::BumpOnLand, ShadeMode::Daylight] {
            let shade = evaluate(mode, leaf, 0.2, 0.4, 0.1, 150.0_f64.to_radians(), 20.0_f64.to_radians()).unwrap();
            assert!((10..=255).contains(&shade));
        }
    }
}
