/// Maps a raster pixel to a point on the unit sphere, in the oracle's own
/// coordinate frame. Returns `None` for pixels that fall outside the
/// projected globe (rendered as background) rather than inside it.
pub trait Projection {
    fn project(&self, i: u32, j: u32, width: u32, height: u32) -> Option<(f64, f64, f64)>;
}

/// Shared rotation state: the view is always centered on a chosen
/// latitude/longitude, computed once and reused by every pixel.
#[derive(Debug, Clone, Copy)]
struct ViewCenter {
    cla: f64,
    sla: f64,
    clo: f64,
    slo: f64,
}

impl ViewCenter {
    fn new(center_latitude: f64, center_longitude: f64) -> Self {
        Self {
            cla: center_latitude.cos(),
            sla: center_latitude.sin(),
            clo: center_longitude.cos(),
            slo: center_longitude.sin(),
        }
    }

    /// Rotates a point from "camera space" (pole at the view center) into
    /// the oracle's fixed coordinate frame.
    fn rotate(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let x1 = self.clo * x + self.slo * self.sla * y + self.slo * self.cla * z;
        let y1 = self.cla * y - self.sla * z;
        let z1 = -self.slo * x + self.clo * self.sla * y + self.clo * self.cla * z;
        (x1, y1, z1)
    }
}

/// Cylindrical equidistant projection: longitude maps linearly to columns,
/// latitude maps linearly to rows. Covers the whole sphere, so every pixel
/// resolves to a point — there is no background region.
pub struct Equirectangular {
    view: ViewCenter,
}

impl Equirectangular {
    pub fn new(center_latitude: f64, center_longitude: f64) -> Self {
        Self {
            view: ViewCenter::new(center_latitude, center_longitude),
        }
    }
}

impl Projection for Equirectangular {
    fn project(&self, i: u32, j: u32, width: u32, height: u32) -> Option<(f64, f64, f64)> {
        let longi = std::f64::consts::PI * (2.0 * i as f64 - width as f64) / width as f64;
        let lat = 0.5 * std::f64::consts::PI * (2.0 * j as f64 - height as f64) / height as f64;
        let cos2 = lat.cos();
        let (x, y, z) = (longi.sin() * cos2, lat.sin(), -longi.cos() * cos2);
        Some(self.view.rotate(x, y, z))
    }
}

/// Orthographic (parallel-rays) projection of one hemisphere, matching the
/// reference implementation's `orthographic()`: pixels outside the unit disc
/// in the projection plane are background.
pub struct Orthographic {
    view: ViewCenter,
    scale: f64,
}

impl Orthographic {
    pub fn new(center_latitude: f64, center_longitude: f64, scale: f64) -> Self {
        Self {
            view: ViewCenter::new(center_latitude, center_longitude),
            scale,
        }
    }
}

impl Projection for Orthographic {
    fn project(&self, i: u32, j: u32, width: u32, height: u32) -> Option<(f64, f64, f64)> {
        let x = (2.0 * i as f64 - width as f64) / height as f64 / self.scale;
        let y = (2.0 * j as f64 - height as f64) / height as f64 / self.scale;
        if x * x + y * y > 1.0 {
            return None;
        }
        let z = (1.0 - x * x - y * y).sqrt();
        Some(self.view.rotate(x, y, z))
    }
}

/// Stereographic projection, matching the reference implementation's
/// `stereo()`. Defined over the whole plane; distortion grows away from the
/// center, so this is normally combined with a scale that keeps the view to
/// one hemisphere.
pub struct Stereographic {
    view: ViewCenter,
    scale: f64,
}

impl Stereographic {
    pub fn new(center_latitude: f64, center_longitude: f64, scale: f64) -> Self {
        Self {
            view: ViewCenter::new(center_latitude, center_longitude),
            scale,
        }
    }
}

impl Projection for Stereographic {
    fn project(&self, i: u32, j: u32, width: u32, height: u32) -> Option<(f64, f64, f64)> {
        let mut x = (2.0 * i as f64 - width as f64) / height as f64 / self.scale;
        let mut y = (2.0 * j as f64 - height as f64) / height as f64 / self.scale;
        let z2 = x * x + y * y;
        let zz = 0.25 * (4.0 + z2);
        x /= zz;
        y /= zz;
        let z = (1.0 - 0.25 * z2) / zz;
        Some(self.view.rotate(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthographic_cuts_off_outside_disc() {
        let proj = Orthographic::new(0.0, 0.0, 1.0);
        assert!(proj.project(0, 0, 100, 100).is_none());
        assert!(proj.project(50, 50, 100, 100).is_some());
    }

    #[test]
    fn equirectangular_covers_every_pixel() {
        let proj = Equirectangular::new(0.0, 0.0);
        for j in [0, 25, 49] {
            for i in [0, 25, 49] {
                assert!(proj.project(i, j, 50, 50).is_some());
            }
        }
    }

    #[test]
    fn projected_points_land_near_unit_sphere() {
        let proj = Orthographic::new(0.3, 0.1, 1.0);
        let (x, y, z) = proj.project(50, 50, 100, 100).unwrap();
        let r = (x * x + y * y + z * z).sqrt();
        assert!((r - 1.0).abs() < 1e-6, "point not on unit sphere: r={r}");
    }
}
