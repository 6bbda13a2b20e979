use crate::config::Config;
use crate::hash::rand2;
use crate::vertex::{dist2, Tetrahedron, Vertex};
use planet_palette::HintMap;

/// Result of descending the tetrahedral tree to locate `(x, y, z)`: the
/// altitude at that point, the leaf tetrahedron it landed in (used by the
/// shading evaluator), and the rain-shadow value accumulated along the path.
#[derive(Debug, Clone, Copy)]
pub struct Descent {
    pub altitude: f64,
    pub leaf: Tetrahedron,
    pub rain_shadow: f64,
}

/// Recursive longest-edge subdivision oracle. Owns the root tetrahedron
/// derived from a master seed and a one-slot cache of the tetrahedron
/// enclosing the most recent query at the snapshot depth, so that spatially
/// coherent scans (successive pixels of a raster) usually resolve in a few
/// levels instead of redescending from the root every time.
pub struct Oracle {
    root: Tetrahedron,
    depth: u32,
    config: Config,
    hint: Option<HintMap>,
    cache: Option<Tetrahedron>,
}

/// Depth at which the current tetrahedron is snapshotted into the cache,
/// matching the reference implementation's fixed `level == 11` checkpoint.
const CACHE_LEVEL: u32 = 11;

impl Oracle {
    pub fn new(seed: f64, depth: u32, config: Config, hint: Option<HintMap>) -> Self {
        let r1 = rand2(seed, seed);
        let r2 = rand2(r1, r1);
        let r3 = rand2(r1, r2);
        let r4 = rand2(r2, r3);
        let m = config.initial_altitude;

        let root = Tetrahedron::new(
            Vertex::new(-3f64.sqrt() - 0.20, -3f64.sqrt() - 0.22, -3f64.sqrt() - 0.23, r1, m, 0.0),
            Vertex::new(-3f64.sqrt() - 0.19, 3f64.sqrt() + 0.18, 3f64.sqrt() + 0.17, r2, m, 0.0),
            Vertex::new(3f64.sqrt() + 0.21, -3f64.sqrt() - 0.24, 3f64.sqrt() + 0.15, r3, m, 0.0),
            Vertex::new(3f64.sqrt() + 0.24, 3f64.sqrt() + 0.22, -3f64.sqrt() - 0.25, r4, m, 0.0),
        );

        Self {
            root,
            depth,
            config,
            hint,
            cache: None,
        }
    }

    /// Drops the cached tetrahedron, forcing the next query to redescend
    /// from the root. Useful when switching to an unrelated part of the
    /// sphere (e.g. starting a new scanline far from the last one).
    pub fn reset_cache(&mut self) {
        self.cache = None;
    }

    /// Locates `(x, y, z)` — a point on or near the unit sphere — and
    /// returns its altitude, enclosing leaf tetrahedron, and rain shadow.
    pub fn locate(&mut self, x: f64, y: f64, z: f64) -> Descent {
        if let Some(cached) = self.cache {
            if point_inside(cached, x, y, z) {
                return self.descend(cached, x, y, z, CACHE_LEVEL);
            }
        }
        self.descend(self.root, x, y, z, self.depth)
    }

    fn descend(&mut self, tet: Tetrahedron, x: f64, y: f64, z: f64, level: u32) -> Descent {
        if level == 0 {
            let (a, b, c, d) = (tet.a, tet.b, tet.c, tet.d);
            return Descent {
                altitude: 0.25 * (a.h + b.h + c.h + d.h),
                leaf: tet,
                rain_shadow: 0.25 * (a.shadow + b.shadow + c.shadow + d.shadow),
            };
        }

        let rotated = tet.with_longest_edge_as_ab();
        let (a, b, c, d) = (rotated.a, rotated.b, rotated.c, rotated.d);

        if level == CACHE_LEVEL {
            self.cache = Some(rotated);
        }

        let mut lab = dist2(a, b);

        let e_seed = rand2(a.s, b.s);
        let es1 = rand2(e_seed, e_seed);
        let es2 = 0.5 + 0.1 * rand2(es1, es1);
        let es3 = 1.0 - es2;

        let (ex, ey, ez) = if a.s < b.s {
            (es2 * a.x + es3 * b.x, es2 * a.y + es3 * b.y, es2 * a.z + es3 * b.z)
        } else if a.s > b.s {
            (es3 * a.x + es2 * b.x, es3 * a.y + es2 * b.y, es3 * a.z + es2 * b.z)
        } else {
            (0.5 * (a.x + b.x), 0.5 * (a.y + b.y), 0.5 * (a.z + b.z))
        };

        let eh = if let Some(hint) = self.hint.as_ref().filter(|_| lab > self.config.match_size) {
            let l = (ex * ex + ey * ey + ez * ez).sqrt();
            let yy = (ey / l).asin() * (hint.height() as f64 - 1.0) / std::f64::consts::PI + (hint.height() as f64 - 1.0) / 2.0;
            let xx = ex.atan2(ez) * (hint.width() as f64 - 1.0) / 2.0 / std::f64::consts::PI + (hint.width() as f64 - 1.0) / 2.0;
            hint.altitude_at_nearest(xx, yy)
        } else {
            if lab > 1.0 {
                lab = lab.sqrt();
            }
            0.5 * (a.h + b.h)
                + e_seed * self.config.displacement_falloff * (a.h - b.h).abs().powf(self.config.displacement_power)
                + es1 * self.config.deep_falloff * lab.powf(self.config.deep_power)
        };

        let e_shadow = if eh <= 0.0 || !(self.config.make_biomes || self.config.display_rainfall) {
            0.0
        } else {
            let mx = 0.5 * (a.x + b.x);
            let x1 = a.h * (mx - a.x) + b.h * (mx - b.x);
            let my = 0.5 * (a.y + b.y);
            let y1 = a.h * (my - a.y) + b.h * (my - b.y);
            let mz = 0.5 * (a.z + b.z);
            let z1 = a.h * (mz - a.z) + b.h * (mz - b.z);
            let mut l1 = (x1 * x1 + y1 * y1 + z1 * z1).sqrt();
            if l1 == 0.0 {
                l1 = 1.0;
            }
            let mut tmp = (1.0 - y * y).sqrt();
            if tmp < 0.0001 {
                tmp = 0.0001;
            }
            let z2 = -z / tmp * x1 + x / tmp * z1;
            if lab > 0.04 {
                (a.shadow + b.shadow - self.config.shade_angle.cos() * z2 / l1) / 3.0
            } else {
                (a.shadow + b.shadow) / 2.0
            }
        };

        let e = Vertex::new(ex, ey, ez, e_seed, eh, e_shadow);

        let eax = a.x - e.x;
        let eay = a.y - e.y;
        let eaz = a.z - e.z;
        let ecx = c.x - e.x;
        let ecy = c.y - e.y;
        let ecz = c.z - e.z;
        let edx = d.x - e.x;
        let edy = d.y - e.y;
        let edz = d.z - e.z;
        let epx = x - e.x;
        let epy = y - e.y;
        let epz = z - e.z;

        let triple_a = eax * ecy * edz + eay * ecz * edx + eaz * ecx * edy - eaz * ecy * edx - eay * ecx * edz - eax * ecz * edy;
        let triple_p = epx * ecy * edz + epy * ecz * edx + epz * ecx * edy - epz * ecy * edx - epy * ecx * edz - epx * ecz * edy;

        if triple_a * triple_p > 0.0 {
            self.descend(Tetrahedron::new(c, d, a, e), x, y, z, level - 1)
        } else {
            self.descend(Tetrahedron::new(c, d, b, e), x, y, z, level - 1)
        }
    }
}

/// Tests whether `(x, y, z)` lies inside tetrahedron `t`, via the same
/// four same-side scalar-triple-product tests the reference implementation
/// uses to validate its cache before reusing it.
fn point_inside(t: Tetrahedron, x: f64, y: f64, z: f64) -> bool {
    let (a, b, c, d) = (t.a, t.b, t.c, t.d);

    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acy = c.y - a.y;
    let acz = c.z - a.z;
    let adx = d.x - a.x;
    let ady = d.y - a.y;
    let adz = d.z - a.z;
    let apx = x - a.x;
    let apy = y - a.y;
    let apz = z - a.z;

    let same_side_abc = (adx * aby * acz + ady * abz * acx + adz * abx * acy - adz * aby * acx - ady * abx * acz - adx * abz * acy)
        * (apx * aby * acz + apy * abz * acx + apz * abx * acy - apz * aby * acx - apy * abx * acz - apx * abz * acy)
        > 0.0;
    if !same_side_abc {
        return false;
    }

    let same_side_abd = (acx * aby * adz + acy * abz * adx + acz * abx * ady - acz * aby * adx - acy * abx * adz - acx * abz * ady)
        * (apx * aby * adz + apy * abz * adx + apz * abx * ady - apz * aby * adx - apy * abx * adz - apx * abz * ady)
        > 0.0;
    if !same_side_abd {
        return false;
    }

    let same_side_acd = (abx * ady * acz + aby * adz * acx + abz * adx * acy - abz * ady * acx - aby * adx * acz - abx * adz * acy)
        * (apx * ady * acz + apy * adz * acx + apz * adx * acy - apz * ady * acx - apy * adx * acz - apx * adz * acy)
        > 0.0;
    if !same_side_acd {
        return false;
    }

    let bax = -abx;
    let bay = -aby;
    let baz = -abz;
    let bcx = c.x - b.x;
    let bcy = c.y - b.y;
    let bcz = c.z - b.z;
    let bdx = d.x - b.x;
    let bdy = d.y - b.y;
    let bdz = d.z - b.z;
    let bpx = x - b.x;
    let bpy = y - b.y;
    let bpz = z - b.z;

    (bax * bcy * bdz + bay * bcz * bdx + baz * bcx * bdy - baz * bcy * bdx - bay * bcx * bdz - bax * bcz * bdy)
        * (bpx * bcy * bdz + bpy * bcz * bdx + bpz * bcx * bdy - bpz * bcy * bdx - bpy * bcx * bdz - bpx * bcz * bdy)
        > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_point_gives_same_altitude() {
        let mut oracle = Oracle::new(0.123, 6, Config::default(), None);
        let a = oracle.locate(0.3, 0.4, 0.5);
        let mut oracle2 = Oracle::new(0.123, 6, Config::default(), None);
        let b = oracle2.locate(0.3, 0.4, 0.5);
        assert_eq!(a.altitude, b.altitude);
    }

    #[test]
    fn cache_hit_matches_cold_descent() {
        let mut warm = Oracle::new(7.0, 13, Config::default(), None);
        let first = warm.locate(0.2, 0.2, 0.9);
        let second = warm.locate(0.2001, 0.2001, 0.9);

        let mut cold = Oracle::new(7.0, 13, Config::default(), None);
        let _ = cold.locate(0.2, 0.2, 0.9);
        cold.reset_cache();
        let second_cold = cold.locate(0.2001, 0.2001, 0.9);

        assert_eq!(second.altitude, second_cold.altitude);
        let _ = first;
    }

    #[test]
    fn different_seeds_usually_diverge() {
        let mut a = Oracle::new(1.0, 6, Config::default(), None);
        let mut b = Oracle::new(2.0, 6, Config::default(), None);
        assert_ne!(a.locate(0.3, 0.3, 0.3).altitude, b.locate(0.3, 0.3, 0.3).altitude);
    }
}
