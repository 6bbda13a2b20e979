use crate::error::HintMapParseError;

/// A small signed-integer grid in `[-8, 8]`, parsed from whitespace-separated
/// ASCII text, row-major with the top row first. This is the raw "seeded
/// altitude hint" asset before it is converted to real altitudes and
/// (optionally) upsampled to the resolution the oracle looks it up at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintGrid {
    width: usize,
    height: usize,
    cells: Vec<i8>,
}

impl HintGrid {
    pub fn parse(text: &str) -> Result<Self, HintMapParseError> {
        let mut rows: Vec<Vec<i8>> = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::new();
            for tok in line.split_whitespace() {
                let v: i64 = tok.parse().map_err(|_| HintMapParseError {
                    message: format!("line {}: '{tok}' is not an integer", lineno + 1),
                })?;
                if !(-8..=8).contains(&v) {
                    return Err(HintMapParseError {
                        message: format!("line {}: value {v} out of range -8..=8", lineno + 1),
                    });
                }
                row.push(v as i8);
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(HintMapParseError {
                message: "no rows found".to_string(),
            });
        }
        let width = rows[0].len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(HintMapParseError {
                message: "all rows must have the same non-zero width".to_string(),
            });
        }
        let height = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> i8 {
        self.cells[row * self.width + col]
    }
}

/// Altitude-ready hint map: a `width x height` grid of altitudes (already
/// divided by 80, matching the reference implementation's `* 0.1 / 8.0`
/// scaling), looked up by the oracle at the nearest cell to a query direction.
#[derive(Debug, Clone, PartialEq)]
pub struct HintMap {
    width: usize,
    height: usize,
    altitudes: Vec<f64>,
}

impl HintMap {
    /// Builds a hint map directly from a raw grid, with no resampling.
    pub fn from_grid(grid: &HintGrid) -> Self {
        let altitudes = grid.cells.iter().map(|&v| v as f64 / 80.0).collect();
        Self {
            width: grid.width,
            height: grid.height,
            altitudes,
        }
    }

    /// Builds a hint map by bilinearly upsampling `grid` to `target_width x
    /// target_height` (the canonical case being a 24x12 source upsampled to
    /// the 48x24 map this crate's consumers expect).
    pub fn from_grid_upsampled(grid: &HintGrid, target_width: usize, target_height: usize) -> Self {
        assert!(target_width >= 1 && target_height >= 1);
        let mut altitudes = vec![0.0f64; target_width * target_height];
        let src_w = grid.width.max(1);
        let src_h = grid.height.max(1);

        for ty in 0..target_height {
            let sy = if target_height <= 1 {
                0.0
            } else {
                ty as f64 * (src_h - 1).max(1) as f64 / (target_height - 1) as f64
            };
            let y0 = sy.floor() as usize;
            let y1 = (y0 + 1).min(src_h - 1);
            let fy = sy - y0 as f64;

            for tx in 0..target_width {
                let sx = if target_width <= 1 {
                    0.0
                } else {
                    tx as f64 * (src_w - 1).max(1) as f64 / (target_width - 1) as f64
                };
                let x0 = sx.floor() as usize;
                let x1 = (x0 + 1).min(src_w - 1);
                let fx = sx - x0 as f64;

                let v00 = grid.get(x0, y0) as f64;
                let v10 = grid.get(x1, y0) as f64;
                let v01 = grid.get(x0, y1) as f64;
                let v11 = grid.get(x1, y1) as f64;

                let top = v00 + (v10 - v00) * fx;
                let bottom = v01 + (v11 - v01) * fx;
                let value = top + (bottom - top) * fy;

                altitudes[ty * target_width + tx] = value / 80.0;
            }
        }

        Self {
            width: target_width,
            height: target_height,
            altitudes,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Altitude at the cell nearest `(col, row)`, both rounded to the nearest
    /// integer grid coordinate and clamped to the grid bounds.
    pub fn altitude_at_nearest(&self, col: f64, row: f64) -> f64 {
        let c = col.round().clamp(0.0, (self.width - 1) as f64) as usize;
        let r = row.round().clamp(0.0, (self.height - 1) as f64) as usize;
        self.altitudes[r * self.width + c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_simple_grid() {
        let grid = HintGrid::parse("1 2 3\n-4 -5 -6\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(2, 1), -6);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = HintGrid::parse("1 2 3\n4 5\n").unwrap_err();
        assert!(err.message.contains("same non-zero width"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = HintGrid::parse("1 9 3\n").unwrap_err();
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn direct_conversion_divides_by_eighty() {
        let grid = HintGrid::parse("8 -8\n").unwrap();
        let map = HintMap::from_grid(&grid);
        assert_abs_diff_eq!(map.altitude_at_nearest(0.0, 0.0), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(map.altitude_at_nearest(1.0, 0.0), -0.1, epsilon = 1e-9);
    }

    #[test]
    fn upsample_preserves_corner_values() {
        let grid = HintGrid::parse("0 8\n-8 0\n").unwrap();
        let map = HintMap::from_grid_upsampled(&grid, 4, 4);
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 4);
        assert_abs_diff_eq!(map.altitude_at_nearest(0.0, 0.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(map.altitude_at_nearest(3.0, 0.0), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(map.altitude_at_nearest(0.0, 3.0), -0.1, epsilon = 1e-9);
    }

    #[test]
    fn upsample_interpolates_midpoints() {
        let grid = HintGrid::parse("0 8\n").unwrap();
        let map = HintMap::from_grid_upsampled(&grid, 3, 1);
        assert_abs_diff_eq!(map.altitude_at_nearest(1.0, 0.0), 4.0 / 80.0, epsilon = 1e-9);
    }
}
