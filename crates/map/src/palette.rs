use crate::error::PaletteParseError;
use crate::indices::{self, PaletteLayout};

/// A flat `index -> (r, g, b)` color table plus the derived altitude/biome
/// layout it was built with.
///
/// Two color tables exist in the reference tool (`-C` for the altitude ramp,
/// `-Z` for the biome ramp) because the same index range means something
/// different depending on whether `makeBiomes` is active. `Palette` keeps that
/// split as two constructors rather than one mode flag, so a caller can build
/// (and swap between) both tables up front.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<(u8, u8, u8)>,
    layout: PaletteLayout,
}

impl Palette {
    pub fn layout(&self) -> PaletteLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a palette index, clamped to the table's bounds.
    pub fn get(&self, index: usize) -> (u8, u8, u8) {
        self.colors[index.min(self.colors.len() - 1)]
    }

    /// Altitude-mode ramp: reserved slots, a blue sea ramp from `LOWEST` to
    /// `SEA`, and a green-to-white land ramp from `LAND` to `HIGHEST`.
    pub fn default_altitude_ramp(total_colors: usize) -> Self {
        let layout = PaletteLayout::new(total_colors);
        let mut colors = vec![(0u8, 0u8, 0u8); total_colors];
        set_reserved_slots(&mut colors);
        fill_ramp(&mut colors, layout.lowest, layout.sea, (5, 10, 60), (130, 190, 255));
        fill_ramp(&mut colors, layout.land, layout.highest, (30, 110, 40), (245, 245, 240));
        Self { colors, layout }
    }

    /// Biome-mode ramp: same reserved slots and sea ramp, but `LAND + 1 ..=
    /// LAND + 23` holds fixed biome colors addressed by
    /// [`PaletteLayout::biome_slot`] instead of an altitude gradient.
    pub fn default_biome_ramp(total_colors: usize) -> Self {
        let layout = PaletteLayout::new(total_colors);
        let mut colors = vec![(0u8, 0u8, 0u8); total_colors];
        set_reserved_slots(&mut colors);
        fill_ramp(&mut colors, layout.lowest, layout.sea, (5, 10, 60), (130, 190, 255));
        colors[layout.highest] = (255, 255, 255);

        for (letter, rgb) in BIOME_COLORS {
            colors[layout.biome_slot(*letter)] = *rgb;
        }
        Self { colors, layout }
    }

    /// Parses a line-oriented color-stop table: `"<index> <r> <g> <b>"` per
    /// line, `#`-prefixed comments and blank lines ignored. Any index not
    /// given an explicit stop is linearly interpolated between the nearest
    /// specified stops below and above it; indices before the first stop or
    /// after the last reuse that stop's color.
    pub fn parse(text: &str, total_colors: usize) -> Result<Self, PaletteParseError> {
        let layout = PaletteLayout::new(total_colors);
        let mut stops: Vec<(usize, (u8, u8, u8))> = Vec::new();

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(PaletteParseError {
                    line: lineno + 1,
                    message: format!("expected 4 fields, got {}", fields.len()),
                });
            }
            let parse_field = |s: &str| {
                s.parse::<i64>().map_err(|_| PaletteParseError {
                    line: lineno + 1,
                    message: format!("'{s}' is not an integer"),
                })
            };
            let index = parse_field(fields[0])?;
            if index < 0 || index as usize >= total_colors {
                return Err(PaletteParseError {
                    line: lineno + 1,
                    message: format!("index {index} out of range 0..{total_colors}"),
                });
            }
            let r = parse_field(fields[1])?;
            let g = parse_field(fields[2])?;
            let b = parse_field(fields[3])?;
            for (name, v) in [("r", r), ("g", g), ("b", b)] {
                if !(0..=255).contains(&v) {
                    return Err(PaletteParseError {
                        line: lineno + 1,
                        message: format!("channel {name}={v} out of range 0..=255"),
                    });
                }
            }
            stops.push((index as usize, (r as u8, g as u8, b as u8)));
        }

        if stops.is_empty() {
            return Err(PaletteParseError {
                line: 0,
                message: "no color stops found".to_string(),
            });
        }
        stops.sort_by_key(|(idx, _)| *idx);

        let mut colors = vec![(0u8, 0u8, 0u8); total_colors];
        set_reserved_slots(&mut colors);

        for window in stops.windows(2) {
            let (lo_idx, lo_rgb) = window[0];
            let (hi_idx, hi_rgb) = window[1];
            fill_ramp(&mut colors, lo_idx, hi_idx, lo_rgb, hi_rgb);
        }
        let (first_idx, first_rgb) = stops[0];
        for c in colors.iter_mut().take(first_idx) {
            *c = first_rgb;
        }
        let (last_idx, last_rgb) = *stops.last().unwrap();
        for c in colors.iter_mut().skip(last_idx) {
            *c = last_rgb;
        }

        Ok(Self { colors, layout })
    }
}

fn set_reserved_slots(colors: &mut [(u8, u8, u8)]) {
    colors[indices::BLACK] = (0, 0, 0);
    colors[indices::WHITE] = (255, 255, 255);
    colors[indices::BACK] = (0, 0, 0);
    colors[indices::GRID] = (190, 190, 190);
    colors[indices::OUTLINE1] = (0, 0, 0);
    colors[indices::OUTLINE2] = (255, 255, 255);
}

fn fill_ramp(
    colors: &mut [(u8, u8, u8)],
    lo: usize,
    hi: usize,
    lo_rgb: (u8, u8, u8),
    hi_rgb: (u8, u8, u8),
) {
    if hi <= lo {
        colors[lo] = lo_rgb;
        return;
    }
    let span = (hi - lo) as f32;
    for i in lo..=hi {
        let t = (i - lo) as f32 / span;
        colors[i] = lerp_rgb(lo_rgb, hi_rgb, t);
    }
}

fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Fixed colors for the eleven Whittaker biome letters, keyed by ASCII byte.
const BIOME_COLORS: &[(u8, (u8, u8, u8))] = &[
    (b'I', (240, 240, 250)), // icecap
    (b'T', (170, 190, 170)), // tundra
    (b'G', (140, 195, 105)), // grassland
    (b'B', (70, 115, 75)),   // boreal forest / taiga
    (b'D', (225, 195, 120)), // desert
    (b'S', (200, 180, 90)),  // savanna
    (b'F', (55, 130, 60)),   // temperate forest
    (b'R', (25, 100, 75)),   // temperate rainforest
    (b'W', (190, 140, 90)),  // xeric shrubland / dry forest
    (b'E', (80, 140, 40)),   // tropical dry forest
    (b'O', (15, 90, 40)),    // tropical rainforest
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_altitude_ramp_has_reserved_slots() {
        let palette = Palette::default_altitude_ramp(256);
        assert_eq!(palette.get(indices::WHITE), (255, 255, 255));
        assert_eq!(palette.get(indices::BLACK), (0, 0, 0));
    }

    #[test]
    fn altitude_ramp_is_monotonic_in_brightness() {
        let palette = Palette::default_altitude_ramp(256);
        let layout = palette.layout();
        let mut last_luma = -1.0f32;
        for i in layout.land..=layout.highest {
            let (r, g, b) = palette.get(i);
            let luma = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
            assert!(luma >= last_luma - 1e-6, "luma decreased at index {i}");
            last_luma = luma;
        }
    }

    #[test]
    fn parse_interpolates_between_stops() {
        let text = "6 0 0 0\n131 100 100 100\n255 255 255 255\n";
        let palette = Palette::parse(text, 256).unwrap();
        assert_eq!(palette.get(6), (0, 0, 0));
        assert_eq!(palette.get(255), (255, 255, 255));
        let (r, g, b) = palette.get(131);
        assert_abs_diff_eq!(r as f32, 100.0, epsilon = 1.0);
        assert_abs_diff_eq!(g as f32, 100.0, epsilon = 1.0);
        assert_abs_diff_eq!(b as f32, 100.0, epsilon = 1.0);
    }

    #[test]
    fn parse_rejects_out_of_range_index() {
        let text = "500 1 2 3\n";
        let err = Palette::parse(text, 256).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn biome_ramp_places_letters_at_expected_slots() {
        let palette = Palette::default_biome_ramp(256);
        let layout = palette.layout();
        assert_eq!(palette.get(layout.biome_slot(b'I')), (240, 240, 250));
    }
}
