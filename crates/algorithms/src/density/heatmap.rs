//! Heatmap surfaces from weighted point samples
//!
//! Computes a density surface from a set of irregular data points, each
//! carrying a positive weight. A kernel radius controls how far each
//! point "spreads"; the Gaussian-like kernel is approximated with
//! iterated box blurs, which keeps the whole computation O(cells) per
//! pass.
//!
//! For stability the compute grid is expanded by the kernel radius on
//! all four sides, so points just outside the requested envelope still
//! contribute and the surface shows no edge fall-off inside the
//! requested area. Output values are normalized to [0, 1].

use ndarray::{s, Array2};

use crate::maybe_rayon::*;
use rastermap_core::{Envelope, Error, GridTransform, Result};

/// Number of box-blur iterations used to approximate a Gaussian blur
const GAUSSIAN_APPROX_ITERS: usize = 4;

/// Parameters for a heatmap surface
#[derive(Debug, Clone, Copy)]
pub struct HeatmapParams {
    /// Kernel radius in grid cells (default 10). Zero skips blurring
    /// entirely.
    pub kernel_radius: usize,
    /// Normalize so the minimum over the requested area maps to 0.0
    /// instead of keeping the zero level fixed (default false).
    pub normalize_minimum: bool,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            kernel_radius: 10,
            normalize_minimum: false,
        }
    }
}

/// Accumulates weighted point samples and computes a normalized density
/// grid.
///
/// The surface owns a grid sized `(x_size + 2r, y_size + 2r)` where `r`
/// is the kernel radius; samples are accumulated into it by
/// [`add_point`]/[`add_cell`], and [`compute_surface`] consumes the
/// surface to blur, normalize and extract the requested
/// `x_size x y_size` area. The output grid is indexed `[[i, j]]` with
/// `(0, 0)` at the south-west corner of the envelope.
///
/// [`add_point`]: HeatmapSurface::add_point
/// [`add_cell`]: HeatmapSurface::add_cell
/// [`compute_surface`]: HeatmapSurface::compute_surface
#[derive(Debug, Clone)]
pub struct HeatmapSurface {
    trans: GridTransform,
    grid: Array2<f64>,
    x_size: usize,
    y_size: usize,
    kernel_radius: usize,
    normalize_minimum: bool,
}

impl HeatmapSurface {
    /// Create an empty surface over `env` with an output resolution of
    /// `x_size` x `y_size` cells.
    pub fn new(env: Envelope, x_size: usize, y_size: usize, params: HeatmapParams) -> Result<Self> {
        let trans =
            GridTransform::new(env, x_size, y_size)?.expand_uniform(params.kernel_radius as isize)?;
        let grid = Array2::zeros((trans.x_size(), trans.y_size()));

        Ok(Self {
            trans,
            grid,
            x_size,
            y_size,
            kernel_radius: params.kernel_radius,
            normalize_minimum: params.normalize_minimum,
        })
    }

    /// Output grid width
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Output grid height
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    pub fn kernel_radius(&self) -> usize {
        self.kernel_radius
    }

    /// Add a data point in map space. Coincident points accumulate.
    ///
    /// Points outside the kernel-expanded envelope are silently
    /// ignored; points inside the margin (up to a kernel radius outside
    /// the requested envelope) are kept, since their spread reaches the
    /// requested area.
    pub fn add_point(&mut self, x: f64, y: f64, value: f64) {
        let i = self.trans.i(x);
        let j = self.trans.j(y);
        self.add_cell(i, j, value);
    }

    /// Add a data point in expanded-grid cell space. Out-of-bounds
    /// indices are silently ignored; in-bounds values accumulate.
    pub fn add_cell(&mut self, i: isize, j: isize, value: f64) {
        let (width, height) = self.grid.dim();
        if i < 0 || i as usize >= width || j < 0 || j as usize >= height {
            return;
        }
        self.grid[[i as usize, j as usize]] += value;
    }

    /// Blur, normalize and extract the surface, consuming the
    /// accumulator.
    ///
    /// Returns the `x_size` x `y_size` grid of values in [0, 1].
    /// If every accumulated cell in the requested area equals the
    /// normalization offset (e.g. no points were added), the rescaling
    /// divides by zero and the output is non-finite; callers that can
    /// feed an empty surface must guard for it themselves.
    pub fn compute_surface(mut self) -> Result<Array2<f64>> {
        if self.kernel_radius > 0 {
            let base_radius = self.kernel_radius / GAUSSIAN_APPROX_ITERS;
            let remainder = self.kernel_radius - base_radius * GAUSSIAN_APPROX_ITERS;

            // Box blur is separable: each iteration is two 1-D passes,
            // the first writing a transposed buffer and the second
            // transposing back. The remainder of the integer division
            // goes to the earliest iterations so the per-iteration
            // radii sum exactly to the kernel radius.
            for count in 0..GAUSSIAN_APPROX_ITERS {
                let radius = if count < remainder {
                    base_radius + 1
                } else {
                    base_radius
                };
                let flipped = box_blur(radius, &self.grid)?;
                self.grid = box_blur(radius, &flipped)?;
            }
        }

        self.normalize();

        let r = self.kernel_radius;
        let out = self
            .grid
            .slice(s![r..r + self.x_size, r..r + self.y_size])
            .to_owned();
        Ok(out)
    }

    /// Rescale the full grid so the requested area spans [0, 1].
    fn normalize(&mut self) {
        let r = self.kernel_radius;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        // min/max over just the visible portion
        for i in r..r + self.x_size {
            for j in r..r + self.y_size {
                let v = self.grid[[i, j]];
                if v > max {
                    max = v;
                }
                if v < min {
                    min = v;
                }
            }
        }

        let offset = if self.normalize_minimum { min } else { 0.0 };
        let factor = 1.0 / (max - offset);

        self.grid.mapv_inplace(|v| (v - offset) * factor);
    }
}

/// One 1-D box blur over every line of `input`, written transposed.
///
/// Each output value is the moving average of the `2 * radius + 1` taps
/// centered on it, with out-of-range taps contributing zero; the moving
/// sum makes the pass O(length) per line independent of the radius.
/// With a constant tap weight of `1 / (2 * radius + 1)` each pass
/// preserves total mass up to edge truncation.
fn box_blur(radius: usize, input: &Array2<f64>) -> Result<Array2<f64>> {
    let (width, height) = input.dim();
    let kernel_val = 1.0 / (2 * radius + 1) as f64;
    let r = radius as isize;

    let data: Vec<f64> = (0..height)
        .into_par_iter()
        .flat_map(|j| {
            let mut line = vec![0.0; width];

            let mut tot = 0.0;
            for i in -r..=r {
                if i < 0 || i as usize >= width {
                    continue;
                }
                tot += kernel_val * input[[i as usize, j]];
            }
            line[0] = tot;

            for i in 1..width {
                let leaving = i as isize - 1 - r;
                if leaving >= 0 {
                    tot -= kernel_val * input[[leaving as usize, j]];
                }
                let entering = i + radius;
                if entering < width {
                    tot += kernel_val * input[[entering, j]];
                }
                line[i] = tot;
            }

            line
        })
        .collect();

    // lines were produced per input column j, so the result is the
    // transposed orientation
    Array2::from_shape_vec((height, width), data).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn env_5x5() -> Envelope {
        Envelope::new(0.0, 0.0, 5.0, 5.0)
    }

    #[test]
    fn test_unblurred_single_point() {
        let mut surface = HeatmapSurface::new(
            env_5x5(),
            5,
            5,
            HeatmapParams {
                kernel_radius: 0,
                normalize_minimum: false,
            },
        )
        .unwrap();
        surface.add_point(2.5, 2.5, 3.0);

        let out = surface.compute_surface().unwrap();
        assert_eq!(out.dim(), (5, 5));

        for i in 0..5 {
            for j in 0..5 {
                let expected = if (i, j) == (2, 2) { 1.0 } else { 0.0 };
                assert_relative_eq!(out[[i, j]], expected);
            }
        }
    }

    #[test]
    fn test_coincident_points_accumulate() {
        let params = HeatmapParams {
            kernel_radius: 0,
            normalize_minimum: false,
        };
        let mut surface = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        surface.add_point(1.5, 1.5, 2.0);
        surface.add_point(1.5, 1.5, 2.0);
        surface.add_point(3.5, 3.5, 1.0);

        let out = surface.compute_surface().unwrap();
        // (1,1) accumulated 4.0 and is the max; (3,3) holds 1.0
        assert_relative_eq!(out[[1, 1]], 1.0);
        assert_relative_eq!(out[[3, 3]], 0.25);
    }

    #[test]
    fn test_out_of_bounds_points_are_ignored() {
        let params = HeatmapParams {
            kernel_radius: 0,
            normalize_minimum: false,
        };
        let mut surface = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        surface.add_point(-100.0, 2.5, 5.0);
        surface.add_point(2.5, 100.0, 5.0);
        surface.add_cell(-1, 2, 5.0);
        surface.add_cell(2, 99, 5.0);
        surface.add_point(2.5, 2.5, 1.0);

        let out = surface.compute_surface().unwrap();
        let total: f64 = out.sum();
        assert_relative_eq!(total, 1.0);
        assert_relative_eq!(out[[2, 2]], 1.0);
    }

    #[test]
    fn test_margin_point_survives_expansion() {
        // a point one cell outside the envelope lands in the expanded
        // margin and spreads back into the requested area
        let params = HeatmapParams {
            kernel_radius: 2,
            normalize_minimum: false,
        };
        let mut surface = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        surface.add_point(-0.5, 2.5, 10.0);

        let out = surface.compute_surface().unwrap();
        assert!(
            out[[0, 2]] > 0.0,
            "margin point must bleed into the requested area, got {}",
            out[[0, 2]]
        );
    }

    #[test]
    fn test_blur_spreads_and_peaks_at_source() {
        let params = HeatmapParams {
            kernel_radius: 3,
            normalize_minimum: false,
        };
        let mut surface = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        surface.add_point(2.5, 2.5, 7.0);

        let out = surface.compute_surface().unwrap();

        assert_relative_eq!(out[[2, 2]], 1.0);
        for (idx, &v) in out.indexed_iter() {
            assert!(v >= 0.0 && v <= 1.0, "value out of range at {:?}: {}", idx, v);
        }
        assert!(out[[1, 2]] > 0.0 && out[[1, 2]] < 1.0);
        assert!(out[[2, 3]] > 0.0 && out[[2, 3]] < 1.0);
        // the blur is monotone away from the peak along an axis
        assert!(out[[1, 2]] > out[[0, 2]]);
    }

    #[test]
    fn test_normalize_minimum_spans_unit_range() {
        let params = HeatmapParams {
            kernel_radius: 0,
            normalize_minimum: true,
        };
        let mut surface = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        // fill every visible cell with a known ramp
        for i in 0..5 {
            for j in 0..5 {
                surface.add_cell(i, j, (i * 5 + j + 2) as f64);
            }
        }

        let out = surface.compute_surface().unwrap();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in out.iter() {
            min = min.min(v);
            max = max.max(v);
        }
        assert_relative_eq!(min, 0.0);
        assert_relative_eq!(max, 1.0);
    }

    #[test]
    fn test_order_independence() {
        let params = HeatmapParams {
            kernel_radius: 4,
            normalize_minimum: false,
        };
        let points = [(0.5, 0.5, 1.0), (2.5, 3.5, 2.0), (4.5, 1.5, 0.5)];

        let mut a = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        for &(x, y, v) in &points {
            a.add_point(x, y, v);
        }
        let mut b = HeatmapSurface::new(env_5x5(), 5, 5, params).unwrap();
        for &(x, y, v) in points.iter().rev() {
            b.add_point(x, y, v);
        }

        let out_a = a.compute_surface().unwrap();
        let out_b = b.compute_surface().unwrap();
        for (va, vb) in out_a.iter().zip(out_b.iter()) {
            assert_relative_eq!(*va, *vb);
        }
    }

    #[test]
    fn test_box_blur_preserves_interior_mass() {
        // mass well away from the edges survives a pass exactly
        let mut grid = Array2::zeros((21, 21));
        grid[[10, 10]] = 8.0;
        grid[[9, 12]] = 2.0;

        let before: f64 = grid.sum();
        let blurred = box_blur(3, &grid).unwrap();
        let after: f64 = blurred.sum();

        assert_relative_eq!(after, before, epsilon = 1e-9);
    }

    #[test]
    fn test_box_blur_transposes() {
        let mut grid = Array2::zeros((4, 6));
        grid[[1, 2]] = 1.0;

        let blurred = box_blur(0, &grid).unwrap();
        // radius 0 is a pure transposed copy
        assert_eq!(blurred.dim(), (6, 4));
        assert_relative_eq!(blurred[[2, 1]], 1.0);
        assert_relative_eq!(blurred.sum(), 1.0);
    }

    #[test]
    fn test_box_blur_window_average() {
        let grid = Array2::from_elem((9, 1), 1.0);
        let blurred = box_blur(1, &grid).unwrap();

        // interior cells average a full window of ones
        assert_relative_eq!(blurred[[0, 4]], 1.0, epsilon = 1e-12);
        // edge cells lose the out-of-range tap
        assert_relative_eq!(blurred[[0, 0]], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(blurred[[0, 8]], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_radius_splits_across_iterations() {
        // radius 6 splits as 2+2+1+1; the blur support from a center
        // point must reach exactly 6 cells along an axis and no further
        let env = Envelope::new(0.0, 0.0, 15.0, 15.0);
        let params = HeatmapParams {
            kernel_radius: 6,
            normalize_minimum: false,
        };
        let mut surface = HeatmapSurface::new(env, 15, 15, params).unwrap();
        surface.add_point(7.5, 7.5, 1.0);

        let out = surface.compute_surface().unwrap();
        assert!(out[[7 - 6, 7]] > 0.0, "support must reach radius cells out");
        assert_relative_eq!(out[[7, 7 - 6]], out[[7, 7 + 6]], epsilon = 1e-12);
        assert_relative_eq!(out[[0, 7]], 0.0);
    }

    #[test]
    fn test_construction_errors_propagate() {
        let flat = Envelope::new(0.0, 0.0, 0.0, 5.0);
        assert!(HeatmapSurface::new(flat, 5, 5, HeatmapParams::default()).is_err());
        assert!(HeatmapSurface::new(env_5x5(), 0, 5, HeatmapParams::default()).is_err());
    }
}
